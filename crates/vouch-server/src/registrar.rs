use discord_client::{
    option_type, ApplicationCommand, CommandChoice, CommandOptionSpec, DiscordApi, DiscordError,
    RegisteredCommand,
};
use vouch_core::config::Config;

use crate::command::{RESTORE, VOUCH};

/// The two slash commands the bot answers to.
pub fn command_schema() -> Vec<ApplicationCommand> {
    let choices = (1..=5)
        .rev()
        .map(|n: i64| CommandChoice {
            name: if n == 1 {
                "1 star".to_string()
            } else {
                format!("{n} stars")
            },
            value: n.into(),
        })
        .collect();

    vec![
        ApplicationCommand {
            name: VOUCH.into(),
            description: "Submit a vouch review".into(),
            options: vec![
                CommandOptionSpec {
                    kind: option_type::STRING,
                    name: "review".into(),
                    description: "Your review".into(),
                    required: true,
                    choices: vec![],
                },
                CommandOptionSpec {
                    kind: option_type::INTEGER,
                    name: "stars".into(),
                    description: "Rating in stars".into(),
                    required: true,
                    choices,
                },
                CommandOptionSpec {
                    kind: option_type::ATTACHMENT,
                    name: "attachment".into(),
                    description: "Optional attachment".into(),
                    required: false,
                    choices: vec![],
                },
            ],
        },
        ApplicationCommand {
            name: RESTORE.into(),
            description: "Restore all vouches from information.json".into(),
            options: vec![],
        },
    ]
}

/// Overwrite the guild's command set with [`command_schema`].
pub async fn register_commands(
    api: &dyn DiscordApi,
    config: &Config,
) -> Result<Vec<RegisteredCommand>, DiscordError> {
    api.register_guild_commands(&config.client_id, &config.guild_id, &command_schema())
        .await
}

/// Startup variant: failures are logged and the bot keeps running.
pub async fn register_commands_at_startup(api: &dyn DiscordApi, config: &Config) {
    match register_commands(api, config).await {
        Ok(registered) => tracing::info!(
            count = registered.len(),
            guild = %config.guild_id,
            "registered application commands"
        ),
        Err(e) => tracing::error!("error registering application commands: {e}"),
    }
}
