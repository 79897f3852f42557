#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BotError {
    #[error("Invalid argument for {parameter}: {reason}")]
    InvalidCommandArgument { parameter: String, reason: String },

    #[error("This command cannot be used in private messages")]
    GuildOnlyCommand,

    #[error("Too many commands are running at once (limit: {limit})")]
    MaxConcurrencyReached { limit: usize },
}
