pub mod restore;
pub mod vouch;

#[cfg(test)]
pub(crate) mod fake;

use discord_client::{Interaction, InteractionResponse, MessagePayload};

use crate::command::{Command, CommandError, InteractionContext};
use crate::reply::Responder;
use crate::state::AppState;

/// Route one application-command interaction to its handler.
///
/// Payload problems are answered with an ephemeral message. Errors returned
/// from here mean the handler itself failed; if that happened before a reply
/// was sent, the request side sees the responder dropped and fails the call.
pub async fn dispatch(
    app: &AppState,
    interaction: Interaction,
    mut responder: Responder,
) -> anyhow::Result<()> {
    let parsed = InteractionContext::from_interaction(&interaction)
        .and_then(|ctx| Command::try_from(&interaction).map(|cmd| (ctx, cmd)));

    let (ctx, command) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(interaction = %interaction.id, "rejected interaction: {e}");
            let text = match e {
                CommandError::Unknown(_) => "Unknown command.".to_string(),
                other => format!("Could not process this command: {other}"),
            };
            responder.send(InteractionResponse::message(
                MessagePayload::text(text).ephemeral(),
            ))?;
            return Ok(());
        }
    };

    tracing::info!(
        interaction = %ctx.interaction_id,
        user = %ctx.invoker.id,
        command = %command,
        "dispatching command"
    );

    match command {
        Command::Vouch(invocation) => {
            vouch::handle(app, &ctx, invocation, responder).await?;
        }
        Command::Restore => {
            restore::handle(app, &ctx, responder).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::fake::{test_state, FakeDiscord};
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn interaction(data: serde_json::Value) -> Interaction {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "application_id": "2",
            "type": 2,
            "token": "tok",
            "guild_id": "3",
            "member": { "roles": [], "user": { "id": "42", "username": "nelly" } },
            "data": data,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_command_gets_ephemeral_reply() {
        let dir = TempDir::new().unwrap();
        let api = Arc::new(FakeDiscord::default());
        let app = test_state(&dir, api.clone());
        let (responder, rx) = Responder::channel();

        dispatch(&app, interaction(serde_json::json!({"id": "9", "name": "ban"})), responder)
            .await
            .unwrap();

        let reply = rx.await.unwrap();
        assert!(reply.is_ephemeral());
        assert_eq!(
            reply.data.unwrap().content.as_deref(),
            Some("Unknown command.")
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_options_get_ephemeral_reply() {
        let dir = TempDir::new().unwrap();
        let app = test_state(&dir, Arc::new(FakeDiscord::default()));
        let (responder, rx) = Responder::channel();

        dispatch(
            &app,
            interaction(serde_json::json!({
                "id": "9", "name": "vouch",
                "options": [{ "name": "stars", "type": 4, "value": 3 }]
            })),
            responder,
        )
        .await
        .unwrap();

        let reply = rx.await.unwrap();
        assert!(reply.is_ephemeral());
        assert!(!app.store.exists());
    }

    #[tokio::test]
    async fn vouch_is_routed_and_persisted() {
        let dir = TempDir::new().unwrap();
        let app = test_state(&dir, Arc::new(FakeDiscord::default()));
        let (responder, rx) = Responder::channel();

        dispatch(
            &app,
            interaction(serde_json::json!({
                "id": "9", "name": "vouch",
                "options": [
                    { "name": "review", "type": 3, "value": "smooth" },
                    { "name": "stars", "type": 4, "value": 5 }
                ]
            })),
            responder,
        )
        .await
        .unwrap();

        assert_eq!(rx.await.unwrap().kind, InteractionResponse::CHANNEL_MESSAGE);
        assert_eq!(app.store.load().unwrap().len(), 1);
    }
}
