pub mod admin_cog;
pub mod general_cog;

use poise::Command;

use crate::bot::Data;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub use admin_cog::AdminCog;
pub use general_cog::GeneralCog;

pub trait Cog {
    fn commands(&self) -> Vec<Command<Data, Error>>;
}

pub struct Cogs;

impl Cog for Cogs {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        let general_cog = GeneralCog;
        let admin_cog = AdminCog;

        general_cog
            .commands()
            .into_iter()
            .chain(admin_cog.commands())
            .collect()
    }
}

/// Qualified names of every registered command, subcommands included.
///
/// This is the candidate set for closest-command suggestions, rebuilt fresh
/// on every call from the live registry.
pub fn walk_command_names(commands: &[Command<Data, Error>]) -> Vec<String> {
    let mut names = Vec::new();
    for command in commands {
        names.push(command.qualified_name.to_string());
        names.extend(walk_command_names(&command.subcommands));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_command_names_covers_all_cogs() {
        let commands = Cogs.commands();
        let names = walk_command_names(&commands);

        for expected in ["ping", "about", "help", "register", "unregister"] {
            assert!(
                names.contains(&expected.to_string()),
                "Expected command \"{expected}\" in {names:?}"
            );
        }
    }

    #[test]
    fn test_walk_command_names_unique() {
        let names = walk_command_names(&Cogs.commands());
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
