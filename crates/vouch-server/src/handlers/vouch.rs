use chrono::Utc;
use discord_client::{InteractionResponse, MessagePayload, Permissions};
use std::time::Duration;
use vouch_core::record::Author;
use vouch_core::VouchRecord;

use crate::command::{InteractionContext, VouchInvocation};
use crate::race::{race, TimedOut};
use crate::render::vouch_embed;
use crate::reply::Responder;
use crate::state::AppState;

/// How long the vouch-channel rename may take before it is abandoned.
pub const RENAME_TIMEOUT: Duration = Duration::from_secs(5);

/// What became of the best-effort channel rename after a vouch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(String),
    ChannelNotFound,
    MissingPermission,
    TimedOut,
    Failed(String),
}

/// Persist a new vouch, confirm it to the submitter, then try to rename the
/// vouch channel to `{id}-vouches`.
///
/// Store errors propagate before anything is sent. Rename problems are only
/// logged; the confirmation has already gone out by then.
pub async fn handle(
    app: &AppState,
    ctx: &InteractionContext,
    invocation: VouchInvocation,
    mut responder: Responder,
) -> anyhow::Result<RenameOutcome> {
    let author = Author {
        name: ctx.invoker.tag(),
        id: ctx.invoker.id.clone(),
        avatar: ctx.invoker.display_avatar_url(),
    };

    let store = app.store.clone();
    let record = tokio::task::spawn_blocking(move || {
        let id = store.next_id()?;
        let record = VouchRecord::new(
            id,
            author,
            invocation.stars,
            invocation.review,
            invocation.attachment,
            Utc::now(),
        );
        store.append(record.clone())?;
        Ok::<_, vouch_core::VouchError>(record)
    })
    .await
    .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;

    tracing::info!(
        id = record.id,
        author = %record.author,
        rating = %record.rating,
        "vouch stored"
    );

    let embed = vouch_embed(&record, Utc::now());
    responder.send(InteractionResponse::message(MessagePayload::embed(embed)))?;

    let guild_id = ctx
        .guild_id
        .as_deref()
        .unwrap_or(&app.config.guild_id)
        .to_string();
    let outcome = rename_vouch_channel(app, &guild_id, record.id).await;
    log_rename(&outcome);
    Ok(outcome)
}

async fn rename_vouch_channel(app: &AppState, guild_id: &str, id: u64) -> RenameOutcome {
    let channel_id = &app.config.vouch_channel_id;
    let channel = match app.api.get_channel(channel_id).await {
        Ok(Some(channel)) => channel,
        Ok(None) => return RenameOutcome::ChannelNotFound,
        Err(e) => return RenameOutcome::Failed(e.to_string()),
    };
    tracing::debug!(
        channel = %channel.id,
        name = channel.name.as_deref().unwrap_or(""),
        "vouch channel found"
    );

    match app.api.bot_guild_permissions(guild_id).await {
        Ok(perms) if perms.contains(Permissions::MANAGE_CHANNELS) => {}
        Ok(_) => return RenameOutcome::MissingPermission,
        Err(e) => return RenameOutcome::Failed(e.to_string()),
    }

    let name = format!("{id}-vouches");
    match race(app.api.rename_channel(channel_id, &name), RENAME_TIMEOUT).await {
        Ok(Ok(_)) => RenameOutcome::Renamed(name),
        Ok(Err(e)) => RenameOutcome::Failed(e.to_string()),
        Err(TimedOut(_)) => RenameOutcome::TimedOut,
    }
}

fn log_rename(outcome: &RenameOutcome) {
    match outcome {
        RenameOutcome::Renamed(name) => tracing::info!("updated channel name to {name}"),
        RenameOutcome::ChannelNotFound => tracing::error!("vouch channel not found"),
        RenameOutcome::MissingPermission => {
            tracing::error!("bot does not have Manage Channels permission")
        }
        RenameOutcome::TimedOut => tracing::error!("updating channel name timed out"),
        RenameOutcome::Failed(e) => tracing::error!("failed to update channel name: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fake::{test_state, Call, FakeDiscord, RenameBehaviour, VOUCH_CHANNEL_ID};
    use crate::render::VOUCH_TITLE;
    use discord_client::User;
    use std::sync::Arc;
    use tempfile::TempDir;
    use vouch_core::Rating;

    fn ctx() -> InteractionContext {
        InteractionContext {
            interaction_id: "1".into(),
            application_id: "1000".into(),
            token: "tok".into(),
            guild_id: Some("2000".into()),
            invoker: User {
                id: "42".into(),
                username: "nelly".into(),
                discriminator: Some("0".into()),
                global_name: None,
                avatar: Some("abc".into()),
                bot: false,
            },
        }
    }

    fn invocation(stars: i64, attachment: Option<&str>) -> VouchInvocation {
        VouchInvocation {
            review: "quick and friendly".into(),
            stars: Rating::try_from(stars).unwrap(),
            attachment: attachment.map(Into::into),
        }
    }

    #[tokio::test]
    async fn stores_record_and_replies_with_embed() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord::default());
        let app = test_state(&dir, api.clone());
        let (responder, rx) = Responder::channel();

        let outcome = handle(
            &app,
            &ctx(),
            invocation(3, Some("https://cdn.example/proof.png")),
            responder,
        )
        .await
        .unwrap();
        assert_eq!(outcome, RenameOutcome::Renamed("1-vouches".into()));

        let records = app.store.load().unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.author, "nelly");
        assert_eq!(r.author_id, "42");
        assert_eq!(r.avatar, "https://cdn.discordapp.com/avatars/42/abc.webp");
        assert_eq!(r.attachment.as_deref(), Some("https://cdn.example/proof.png"));

        let reply = rx.await.unwrap();
        assert_eq!(reply.kind, InteractionResponse::CHANNEL_MESSAGE);
        assert!(!reply.is_ephemeral());
        let embed = &reply.data.unwrap().embeds[0];
        assert_eq!(embed.title.as_deref(), Some(VOUCH_TITLE));
        assert!(embed.description.as_ref().unwrap().contains("<@42>"));
        assert!(embed.description.as_ref().unwrap().contains("⭐⭐⭐\n"));
        assert_eq!(embed.image.as_ref().unwrap().url, "https://cdn.example/proof.png");

        assert!(api.calls().contains(&Call::Rename {
            channel: VOUCH_CHANNEL_ID.into(),
            name: "1-vouches".into(),
        }));
    }

    #[tokio::test]
    async fn ids_follow_store_length() {
        let dir = TempDir::new().unwrap();
        let app = test_state(&dir, Arc::new(FakeDiscord::default()));
        for expected in 1..=3 {
            let (responder, _rx) = Responder::channel();
            let outcome = handle(&app, &ctx(), invocation(5, None), responder)
                .await
                .unwrap();
            assert_eq!(outcome, RenameOutcome::Renamed(format!("{expected}-vouches")));
        }
        let ids: Vec<_> = app.store.load().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn rename_timeout_happens_after_reply() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord {
            rename: RenameBehaviour::Hang,
            ..Default::default()
        });
        let app = test_state(&dir, api.clone());
        let (responder, rx) = Responder::channel();

        let task = {
            let app = app.clone();
            tokio::spawn(async move { handle(&app, &ctx(), invocation(4, None), responder).await })
        };

        // The confirmation arrives while the rename is still outstanding.
        let reply = rx.await.unwrap();
        assert_eq!(reply.kind, InteractionResponse::CHANNEL_MESSAGE);

        let started = tokio::time::Instant::now();
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, RenameOutcome::TimedOut);
        assert!(started.elapsed() <= RENAME_TIMEOUT);
        assert!(api
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Rename { .. })));
    }

    #[tokio::test]
    async fn missing_permission_skips_rename() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord {
            permissions: Permissions::SEND_MESSAGES,
            ..Default::default()
        });
        let app = test_state(&dir, api.clone());
        let (responder, rx) = Responder::channel();

        let outcome = handle(&app, &ctx(), invocation(2, None), responder)
            .await
            .unwrap();
        assert_eq!(outcome, RenameOutcome::MissingPermission);
        assert!(rx.await.is_ok());
        assert!(!api.calls().iter().any(|c| matches!(c, Call::Rename { .. })));
    }

    #[tokio::test]
    async fn missing_channel_is_logged_not_raised() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord {
            channel_exists: false,
            ..Default::default()
        });
        let app = test_state(&dir, api.clone());
        let (responder, _rx) = Responder::channel();

        let outcome = handle(&app, &ctx(), invocation(2, None), responder)
            .await
            .unwrap();
        assert_eq!(outcome, RenameOutcome::ChannelNotFound);
        assert_eq!(app.store.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rate_limited_rename_is_a_failure_not_a_timeout() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord {
            rename: RenameBehaviour::Fail(429),
            ..Default::default()
        });
        let app = test_state(&dir, api);
        let (responder, rx) = Responder::channel();

        let outcome = handle(&app, &ctx(), invocation(1, None), responder)
            .await
            .unwrap();
        assert!(matches!(outcome, RenameOutcome::Failed(_)));
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn corrupt_store_fails_without_reply() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord::default());
        let app = test_state(&dir, api.clone());
        std::fs::write(app.store.path(), "not json").unwrap();
        let (responder, rx) = Responder::channel();

        let result = handle(&app, &ctx(), invocation(5, None), responder).await;
        assert!(result.is_err());
        assert!(rx.await.is_err(), "no reply should have been sent");
        assert!(api.calls().is_empty());
    }
}
