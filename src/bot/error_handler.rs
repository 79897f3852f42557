//! Error handling for Discord bot commands.
//!
//! Classifies command-dispatch failures into a closed taxonomy, replies to
//! the user with localized messages, and forwards diagnostics for anything
//! unclassified (and for unknown commands) to the operator channel.

use std::num::NonZeroU32;
use std::time::Duration;

use chrono::Utc;
use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use log::debug;
use log::error;
use log::warn;
use poise::FrameworkError;
use poise::serenity_prelude::Colour;
use poise::serenity_prelude::CreateEmbed;
use poise::serenity_prelude::CreateEmbedFooter;
use poise::serenity_prelude::CreateMessage;
use poise::serenity_prelude::GenericChannelId;
use poise::serenity_prelude::Http;
use poise::serenity_prelude::Message;
use poise::serenity_prelude::Permissions;

use crate::bot::Data;
use crate::bot::cog;
use crate::bot::cog::Context;
use crate::bot::cog::Error;
use crate::bot::error::BotError;
use crate::bot::suggestion;
use crate::bot::suggestion::SuggestionError;
use crate::config::Config;
use crate::locale::MessageFormatter;

/// Accent for "did you mean" suggestion embeds.
const SUGGESTION_COLOUR: Colour = Colour(0x0384FC);

/// Accent for operator diagnostics of failed commands.
const DIAGNOSTIC_COLOUR: Colour = Colour(0xDA4353);

/// Operator-channel forwards allowed per minute before diagnostics drop.
const FORWARDS_PER_MINUTE: u32 = 5;

/// Source-chain links included in a diagnostic, after the error itself.
const MAX_CHAIN_LINKS: usize = 5;

/// Closed set of user-visible command dispatch failures.
///
/// Every kind maps to a fixed message under the `errors` locale prefix, and
/// rendering is an exhaustive match: a kind cannot be added without deciding
/// its message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchErrorKind {
    MissingArgument,
    Cooldown { retry_after: Duration },
    MaxConcurrency { limit: usize },
    BotMissingPermissions { missing: Permissions },
    UserMissingPermissions { missing: Option<Permissions> },
    NoPrivateMessage,
    CommandNotFound { attempted: String },
}

impl DispatchErrorKind {
    /// Localized user-facing message. `fmt` must have the `errors` prefix
    /// set. For `CommandNotFound` this is the embed title; the full
    /// suggestion embed is assembled by the handler.
    pub fn user_message(&self, fmt: &MessageFormatter<'_>) -> String {
        match self {
            Self::MissingArgument => fmt.get("missing_required_argument"),
            Self::Cooldown { retry_after } => fmt.fmt(
                "command_on_cooldown",
                &[&format!("{:.2}", retry_after.as_secs_f64())],
            ),
            Self::MaxConcurrency { .. } => fmt.get("max_concurrency_reached"),
            Self::BotMissingPermissions { missing } => {
                fmt.fmt("bot_missing_permissions", &[&format_permissions(*missing)])
            }
            Self::UserMissingPermissions { missing } => {
                let rendered = match missing {
                    Some(perms) => format_permissions(*perms),
                    None => "`unknown`".to_string(),
                };
                fmt.fmt("missing_permissions", &[&rendered])
            }
            Self::NoPrivateMessage => fmt.get("no_private_message"),
            Self::CommandNotFound { .. } => fmt.get("command_not_found.title"),
        }
    }
}

/// Maps an error returned by a command body onto the taxonomy, when it
/// corresponds to a known dispatch failure. Everything else stays
/// unclassified.
fn classify_command_error(error: &Error) -> Option<DispatchErrorKind> {
    match error.downcast_ref::<BotError>()? {
        BotError::GuildOnlyCommand => Some(DispatchErrorKind::NoPrivateMessage),
        BotError::MaxConcurrencyReached { limit } => {
            Some(DispatchErrorKind::MaxConcurrency { limit: *limit })
        }
        _ => None,
    }
}

/// Handles framework errors: localized user replies for classified kinds,
/// operator-channel diagnostics for the rest.
pub struct ErrorHandler {
    production: bool,
    operator_channel: GenericChannelId,
    forward_limiter: RateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl ErrorHandler {
    pub fn new(config: &Config) -> Self {
        let forward_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(FORWARDS_PER_MINUTE).unwrap(),
        ));

        Self {
            production: config.production,
            operator_channel: GenericChannelId::new(config.operator_channel_id),
            forward_limiter,
        }
    }

    /// `on_error` entry point. Routes the framework error to the handler
    /// held in the shared bot data.
    pub async fn dispatch(error: FrameworkError<'_, Data, Error>) {
        match error {
            FrameworkError::Command { error, ctx, .. } => {
                let data = ctx.data();
                data.error_handler.on_command_error(ctx, error).await;
            }
            FrameworkError::ArgumentParse { ctx, .. } => {
                Self::reply_kind(ctx, DispatchErrorKind::MissingArgument).await;
            }
            FrameworkError::CooldownHit {
                remaining_cooldown, ctx, ..
            } => {
                Self::reply_kind(
                    ctx,
                    DispatchErrorKind::Cooldown {
                        retry_after: remaining_cooldown,
                    },
                )
                .await;
            }
            FrameworkError::MissingBotPermissions {
                missing_permissions, ctx, ..
            } => {
                Self::reply_kind(
                    ctx,
                    DispatchErrorKind::BotMissingPermissions {
                        missing: missing_permissions,
                    },
                )
                .await;
            }
            FrameworkError::MissingUserPermissions {
                missing_permissions, ctx, ..
            } => {
                Self::reply_kind(
                    ctx,
                    DispatchErrorKind::UserMissingPermissions {
                        missing: missing_permissions,
                    },
                )
                .await;
            }
            FrameworkError::GuildOnly { ctx, .. } => {
                Self::reply_kind(ctx, DispatchErrorKind::NoPrivateMessage).await;
            }
            FrameworkError::UnknownCommand {
                msg,
                prefix,
                msg_content,
                framework,
                ..
            } => {
                let data = framework.user_data();
                data.error_handler
                    .on_unknown_command(
                        &data,
                        &framework.serenity_context.http,
                        msg,
                        prefix,
                        msg_content,
                        &framework.options.commands,
                    )
                    .await;
            }
            error => {
                if let Err(e) = poise::builtins::on_error(error).await {
                    error!("Error while handling error: {}", e);
                }
            }
        }
    }

    async fn reply_kind(ctx: Context<'_>, kind: DispatchErrorKind) {
        let data = ctx.data();
        data.error_handler.reply_localized(ctx, &kind).await;
    }

    /// Command body returned an error: classified kinds get a localized
    /// reply; unclassified ones are logged and, in production, forwarded to
    /// the operator channel.
    async fn on_command_error(&self, ctx: Context<'_>, error: Error) {
        if let Some(kind) = classify_command_error(&error) {
            self.reply_localized(ctx, &kind).await;
            return;
        }

        error!(
            "Unhandled error in command `{}`: {}",
            ctx.command().qualified_name,
            format_error_chain(error.as_ref())
        );
        if self.production {
            self.forward_command_diagnostic(ctx, error.as_ref()).await;
        }
    }

    async fn reply_localized(&self, ctx: Context<'_>, kind: &DispatchErrorKind) {
        let data = ctx.data();
        let mut fmt = MessageFormatter::new(data.locales.default_locale());
        fmt.set_prefix("errors");

        if let Err(e) = ctx.reply(kind.user_message(&fmt)).await {
            error!("Failed to send error reply: {}", e);
        }
    }

    /// Unknown command: suggest the closest registered command, and in
    /// production also forward a diagnostic.
    async fn on_unknown_command(
        &self,
        data: &Data,
        http: &Http,
        msg: &Message,
        prefix: &str,
        msg_content: &str,
        commands: &[poise::Command<Data, Error>],
    ) {
        let attempted = extract_command_token(msg_content);
        let candidates = cog::walk_command_names(commands);

        let suggestion = match suggestion::closest_match(attempted, &candidates) {
            Ok(suggestion) => suggestion,
            Err(SuggestionError::EmptyCandidateSet) => {
                warn!(
                    "No suggestion for \"{}\": command registry is empty",
                    attempted
                );
                return;
            }
        };

        let mut fmt = MessageFormatter::new(data.locales.default_locale());
        fmt.set_prefix("errors.command_not_found");

        let embed = CreateEmbed::new()
            .colour(SUGGESTION_COLOUR)
            .title(fmt.get("title"))
            .description(fmt.fmt(
                "description",
                &[&format!("```haskell\n{} {}```", prefix.trim(), suggestion)],
            ))
            .footer(CreateEmbedFooter::new(fmt.get("footer")));

        if let Err(e) = msg
            .channel_id
            .send_message(http, CreateMessage::new().embed(embed))
            .await
        {
            error!("Failed to send command suggestion: {}", e);
        }

        if self.production {
            self.forward_unknown_command_diagnostic(http, msg, attempted, &suggestion)
                .await;
        }
    }

    /// Best-effort gate in front of operator-channel sends: rate limit
    /// first, then verify the channel can be fetched. A `false` means the
    /// diagnostic is dropped, never retried.
    async fn operator_channel_ready(&self, http: &Http) -> bool {
        if self.forward_limiter.check().is_err() {
            debug!("Operator diagnostic dropped: forward rate limit reached");
            return false;
        }
        if http.get_channel(self.operator_channel).await.is_err() {
            debug!(
                "Operator channel {} could not be fetched, diagnostic dropped",
                self.operator_channel
            );
            return false;
        }
        true
    }

    async fn forward_command_diagnostic(
        &self,
        ctx: Context<'_>,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) {
        if !self.operator_channel_ready(ctx.http()).await {
            return;
        }

        let guild_id = match ctx.guild_id() {
            Some(id) => id.to_string(),
            None => "DM".to_string(),
        };

        let embed = CreateEmbed::new()
            .colour(DIAGNOSTIC_COLOUR)
            .title(format!(
                "Error in `{}` command",
                ctx.command().qualified_name
            ))
            .field("Message", format!("```{}```", error), false)
            .field(
                "Error chain",
                format!("```{}```", format_error_chain(error)),
                false,
            )
            .field(
                "Arguments",
                format!(
                    "```properties\ninvocation={}```",
                    ctx.invocation_string()
                ),
                false,
            )
            .field(
                "Location",
                format!(
                    "**Guild ID:** `{}`\n**Author ID:** `{}`",
                    guild_id,
                    ctx.author().id
                ),
                false,
            )
            .footer(CreateEmbedFooter::new(format!(
                "Reported at {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )));

        if let Err(e) = self
            .operator_channel
            .send_message(ctx.http(), CreateMessage::new().embed(embed))
            .await
        {
            error!("Failed to forward diagnostic to operator channel: {}", e);
        }
    }

    async fn forward_unknown_command_diagnostic(
        &self,
        http: &Http,
        msg: &Message,
        attempted: &str,
        suggestion: &str,
    ) {
        if !self.operator_channel_ready(http).await {
            return;
        }

        let guild_id = match msg.guild_id {
            Some(id) => id.to_string(),
            None => "DM".to_string(),
        };

        let embed = CreateEmbed::new()
            .colour(SUGGESTION_COLOUR)
            .title("Nonexistent command!")
            .description(format!("```{}```", attempted))
            .field(
                "Location",
                format!(
                    "**Guild ID:** `{}`\n**Author ID:** `{}`",
                    guild_id, msg.author.id
                ),
                false,
            )
            .footer(CreateEmbedFooter::new(format!(
                "Closest existing command: \"{}\"",
                suggestion
            )));

        if let Err(e) = self
            .operator_channel
            .send_message(http, CreateMessage::new().embed(embed))
            .await
        {
            error!("Failed to forward diagnostic to operator channel: {}", e);
        }
    }
}

/// First whitespace-delimited token of the message body after the prefix.
fn extract_command_token(msg_content: &str) -> &str {
    msg_content.split_whitespace().next().unwrap_or("")
}

/// Formats the error and up to [`MAX_CHAIN_LINKS`] of its source chain,
/// the analogue of a trimmed traceback.
fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();

    while let Some(cause) = source {
        if parts.len() > MAX_CHAIN_LINKS {
            break;
        }
        parts.push(cause.to_string());
        source = cause.source();
    }

    parts.join("\n\n")
}

/// Renders a permission set as backticked lowercase names with underscores
/// replaced by spaces.
fn format_permissions(perms: Permissions) -> String {
    perms
        .iter_names()
        .map(|(name, _)| format!("`{}`", name.to_lowercase().replace('_', " ")))
        .collect::<Vec<_>>()
        .join(", ")
}
