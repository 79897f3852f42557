/// Cog of general utility commands
use std::time::Duration;

use poise::Command;

use crate::bot::Data;
use crate::bot::cog::Cog;
use crate::bot::cog::Context;
use crate::bot::cog::Error;

pub struct GeneralCog;

impl GeneralCog {
    /// Check the bot's gateway latency
    #[poise::command(slash_command, prefix_command, user_cooldown = 3)]
    pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
        let latency = ctx.ping().await;
        ctx.reply(format!("🏓 Pong! `{}ms`", latency.as_millis()))
            .await?;
        Ok(())
    }

    /// Show information about the bot
    #[poise::command(slash_command, prefix_command)]
    pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
        let data = ctx.data();
        ctx.reply(format!(
            "repo-bot v{} — up for {}",
            env!("CARGO_PKG_VERSION"),
            format_uptime(data.started_at.elapsed())
        ))
        .await?;
        Ok(())
    }

    /// Help command to show all available commands
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(
        ctx: Context<'_>,
        #[description = "Specific command to show help about"]
        #[autocomplete = "poise::builtins::autocomplete_command"]
        command: Option<String>,
    ) -> Result<(), Error> {
        poise::builtins::help(
            ctx,
            command.as_deref(),
            poise::builtins::HelpConfiguration {
                ..Default::default()
            },
        )
        .await?;
        Ok(())
    }
}

impl Cog for GeneralCog {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        vec![Self::ping(), Self::about(), Self::help()]
    }
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}
