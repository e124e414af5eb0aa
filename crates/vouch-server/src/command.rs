//! Typed slash-command payloads, validated where the interaction enters.
use discord_client::{Interaction, InteractionType, User};
use std::fmt;
use thiserror::Error;
use vouch_core::Rating;

pub const VOUCH: &str = "vouch";
pub const RESTORE: &str = "restore";

/// A parsed, validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Vouch(VouchInvocation),
    Restore,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Vouch(_) => write!(f, "{VOUCH}"),
            Command::Restore => write!(f, "{RESTORE}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchInvocation {
    pub review: String,
    pub stars: Rating,
    /// URL of the uploaded attachment, if one was given.
    pub attachment: Option<String>,
}

/// Who invoked a command and how to reach the interaction again later.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub interaction_id: String,
    pub application_id: String,
    pub token: String,
    pub guild_id: Option<String>,
    pub invoker: User,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("interaction is not an application command")]
    NotACommand,
    #[error("interaction has no invoking user")]
    NoInvoker,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing required option '{0}'")]
    MissingOption(&'static str),
    #[error("invalid value for option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl InteractionContext {
    pub fn from_interaction(interaction: &Interaction) -> Result<Self, CommandError> {
        let invoker = interaction.invoker().ok_or(CommandError::NoInvoker)?;
        Ok(InteractionContext {
            interaction_id: interaction.id.clone(),
            application_id: interaction.application_id.clone(),
            token: interaction.token.clone(),
            guild_id: interaction.guild_id.clone(),
            invoker: invoker.clone(),
        })
    }
}

impl TryFrom<&Interaction> for Command {
    type Error = CommandError;

    fn try_from(interaction: &Interaction) -> Result<Self, Self::Error> {
        if interaction.kind != InteractionType::ApplicationCommand {
            return Err(CommandError::NotACommand);
        }
        let data = interaction.data.as_ref().ok_or(CommandError::NotACommand)?;

        match data.name.as_str() {
            VOUCH => {
                let review = data
                    .string_option("review")
                    .ok_or(CommandError::MissingOption("review"))?
                    .to_string();
                let raw_stars = data
                    .integer_option("stars")
                    .ok_or(CommandError::MissingOption("stars"))?;
                let stars =
                    Rating::try_from(raw_stars).map_err(|e| CommandError::InvalidOption {
                        name: "stars",
                        reason: e.to_string(),
                    })?;
                let attachment = data.attachment_option("attachment").map(|a| a.url.clone());
                Ok(Command::Vouch(VouchInvocation {
                    review,
                    stars,
                    attachment,
                }))
            }
            RESTORE => Ok(Command::Restore),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
