use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API returned {status} for {endpoint}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("rate limited on {endpoint}, retry after {retry_after:.2}s")]
    RateLimited { endpoint: String, retry_after: f64 },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DiscordError {
    /// HTTP status carried by the error, if the request reached Discord.
    pub fn status(&self) -> Option<u16> {
        match self {
            DiscordError::Api { status, .. } => Some(*status),
            DiscordError::RateLimited { .. } => Some(429),
            DiscordError::Http(e) => e.status().map(|s| s.as_u16()),
            DiscordError::Decode { .. } => None,
        }
    }
}
