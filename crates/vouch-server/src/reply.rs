use discord_client::InteractionResponse;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("interaction was already answered")]
pub struct AlreadyReplied;

/// One-shot handle for the initial response to an interaction.
///
/// The HTTP request task holds the receiving end and returns whatever is sent
/// here as the response body. The handler task keeps running after replying,
/// which is how follow-up work (channel rename, replay) happens after the
/// user already has an answer.
#[derive(Debug)]
pub struct Responder {
    tx: Option<oneshot::Sender<InteractionResponse>>,
}

impl Responder {
    pub fn channel() -> (Responder, oneshot::Receiver<InteractionResponse>) {
        let (tx, rx) = oneshot::channel();
        (Responder { tx: Some(tx) }, rx)
    }

    #[cfg(test)]
    pub fn has_replied(&self) -> bool {
        self.tx.is_none()
    }

    /// Send the initial response. Only the first call goes through.
    ///
    /// If the HTTP side has already gone away the response is dropped with a
    /// warning; Discord will have shown the user an error by then.
    pub fn send(&mut self, response: InteractionResponse) -> Result<(), AlreadyReplied> {
        let tx = self.tx.take().ok_or(AlreadyReplied)?;
        if tx.send(response).is_err() {
            tracing::warn!("interaction response dropped: request no longer waiting");
        }
        Ok(())
    }
}
