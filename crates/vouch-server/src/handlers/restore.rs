use discord_client::{InteractionResponse, MessagePayload};
use std::time::Duration;

use crate::command::InteractionContext;
use crate::render::vouch_embed;
use crate::reply::Responder;
use crate::state::AppState;

/// Pause after each replayed message.
pub const REPLAY_DELAY: Duration = Duration::from_millis(2500);

pub const NOT_OWNER: &str = "You do not have permission to use this command.";
pub const NO_DATA: &str = "No vouch data found to restore.";
pub const CHANNEL_NOT_FOUND: &str = "Vouch channel not found.";
pub const RESTORED: &str = "All vouches have been restored.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Rejected,
    NoData,
    ChannelNotFound,
    Restored(usize),
}

/// Replay every stored vouch into the vouch channel, oldest first.
///
/// Owner only. The reply is deferred before the store is read, and edited
/// once the replay finishes. A failed send stops the replay and the error
/// is returned; the deferred reply is left as is.
pub async fn handle(
    app: &AppState,
    ctx: &InteractionContext,
    mut responder: Responder,
) -> anyhow::Result<RestoreOutcome> {
    if ctx.invoker.id != app.config.owner_id {
        tracing::warn!(user = %ctx.invoker.id, "restore rejected: not the owner");
        responder.send(ephemeral(NOT_OWNER))?;
        return Ok(RestoreOutcome::Rejected);
    }

    if !app.store.exists() {
        responder.send(ephemeral(NO_DATA))?;
        return Ok(RestoreOutcome::NoData);
    }

    responder.send(InteractionResponse::deferred(true))?;

    let store = app.store.clone();
    let records = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;

    let channel_id = &app.config.vouch_channel_id;
    let channel = match app.api.get_channel(channel_id).await {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("failed to resolve vouch channel: {e}");
            None
        }
    };
    if channel.is_none() {
        tracing::error!(channel = %channel_id, "vouch channel not found");
        edit_reply(app, ctx, CHANNEL_NOT_FOUND).await?;
        return Ok(RestoreOutcome::ChannelNotFound);
    }

    tracing::info!(count = records.len(), channel = %channel_id, "restoring vouches");
    for record in &records {
        let message = MessagePayload::embed(vouch_embed(record, record.timestamp));
        app.api.send_message(channel_id, &message).await?;
        tracing::debug!(id = record.id, "replayed vouch");
        tokio::time::sleep(REPLAY_DELAY).await;
    }

    edit_reply(app, ctx, RESTORED).await?;
    tracing::info!(count = records.len(), "restore complete");
    Ok(RestoreOutcome::Restored(records.len()))
}

fn ephemeral(text: &str) -> InteractionResponse {
    InteractionResponse::message(MessagePayload::text(text).ephemeral())
}

async fn edit_reply(app: &AppState, ctx: &InteractionContext, text: &str) -> anyhow::Result<()> {
    app.api
        .edit_original_response(&ctx.application_id, &ctx.token, &MessagePayload::text(text))
        .await?;
    Ok(())
}
