//! `discord-client`: the slice of the Discord API a slash-command bot needs.
//!
//! Two halves:
//!
//! ```text
//! inbound   Interaction ──► CommandData ──► typed options (string / integer / attachment)
//! outbound  DiscordApi (trait) ──► DiscordHttp (reqwest, REST v10)
//! ```
//!
//! Interactions arrive over the HTTP interactions endpoint and are
//! deserialized into [`Interaction`]. Everything the bot sends back, apart
//! from the immediate [`InteractionResponse`], goes through [`DiscordApi`]
//! so handlers can be exercised against a fake.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use discord_client::{DiscordApi, DiscordHttp, Embed, MessagePayload};
//!
//! let api = DiscordHttp::new(token);
//! let me = api.current_user().await?;
//! api.send_message(channel_id, &MessagePayload::embed(Embed::new().title("hi"))).await?;
//! ```

pub mod client;
pub mod error;
pub mod permissions;
pub mod types;


pub use client::{DiscordApi, DiscordHttp, DEFAULT_API_BASE};
pub use error::DiscordError;
pub use permissions::Permissions;
pub use types::{
    option_type, ApplicationCommand, Attachment, Channel, CommandChoice, CommandData,
    CommandOptionSpec, Embed, EmbedMedia, Interaction, InteractionResponse, InteractionType,
    Member, Message, MessagePayload, RegisteredCommand, User, EPHEMERAL,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, DiscordError>;
