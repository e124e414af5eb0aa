use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use discord_client::{Interaction, InteractionResponse, InteractionType};

use crate::error::AppError;
use crate::handlers;
use crate::reply::Responder;
use crate::state::AppState;

/// POST /interactions: Discord's outgoing webhook. The signature has
/// already been checked by the middleware in front of this route.
///
/// Commands run on their own task. This request waits only for the initial
/// response; anything the handler does afterwards (rename, replay) outlives
/// the request.
pub async fn receive(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<InteractionResponse>, AppError> {
    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("malformed interaction: {e}")))?;

    match interaction.kind {
        InteractionType::Ping => {
            tracing::debug!("answering ping");
            Ok(Json(InteractionResponse::pong()))
        }
        InteractionType::ApplicationCommand => {
            let (responder, rx) = Responder::channel();
            let id = interaction.id.clone();
            tokio::spawn(async move {
                if let Err(e) = handlers::dispatch(&app, interaction, responder).await {
                    tracing::error!(interaction = %id, "command failed: {e:#}");
                }
            });
            let response = rx.await.map_err(|_| {
                AppError(anyhow::anyhow!("command failed before sending a response"))
            })?;
            Ok(Json(response))
        }
        InteractionType::Other(kind) => Err(AppError::bad_request(format!(
            "unsupported interaction type {kind}"
        ))),
    }
}
