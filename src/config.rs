use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Channel receiving diagnostic forwards unless overridden.
const DEFAULT_OPERATOR_CHANNEL_ID: u64 = 853_247_229_036_593_164;

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub operator_channel_id: u64,
    pub production: bool,
    pub locale_path: PathBuf,
    pub default_locale: String,
    pub logs_path: PathBuf,
    pub admin_id: Option<String>,
    pub max_concurrent_commands: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            discord_token: require_var("DISCORD_TOKEN")?,
            command_prefix: std::env::var("COMMAND_PREFIX").unwrap_or("!".to_string()),
            operator_channel_id: parse_var("OPERATOR_CHANNEL_ID", DEFAULT_OPERATOR_CHANNEL_ID)?,
            production: parse_bool("PRODUCTION", false)?,
            locale_path: std::env::var("LOCALE_PATH")
                .unwrap_or("locales".to_string())
                .into(),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or("en".to_string()),
            logs_path: std::env::var("LOGS_PATH").unwrap_or("logs".to_string()).into(),
            admin_id: std::env::var("ADMIN_ID").ok(),
            max_concurrent_commands: parse_var("MAX_CONCURRENT_COMMANDS", 4)?,
        })
    }
}

fn require_var(key: &str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::MissingConfig {
        key: key.to_string(),
    })
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| AppError::ConfigurationError {
            msg: format!("Invalid value \"{raw}\" for {key}"),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool, AppError> {
    match std::env::var(key) {
        Ok(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            _ => Err(AppError::ConfigurationError {
                msg: format!("Invalid value \"{raw}\" for {key}"),
            }),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn set_var(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    fn remove_var(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token() {
        remove_var("DISCORD_TOKEN");
        let result = Config::from_env();
        match result.unwrap_err() {
            AppError::MissingConfig { key } => assert_eq!(key, "DISCORD_TOKEN"),
            other => panic!("Expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_applies_defaults() {
        set_var("DISCORD_TOKEN", "token");
        remove_var("COMMAND_PREFIX");
        remove_var("OPERATOR_CHANNEL_ID");
        remove_var("PRODUCTION");
        remove_var("MAX_CONCURRENT_COMMANDS");

        let config = Config::from_env().unwrap();
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.operator_channel_id, DEFAULT_OPERATOR_CHANNEL_ID);
        assert!(!config.production);
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.max_concurrent_commands, 4);
    }

    #[test]
    #[serial]
    fn test_from_env_parses_production_flag() {
        set_var("DISCORD_TOKEN", "token");
        set_var("PRODUCTION", "true");
        assert!(Config::from_env().unwrap().production);

        set_var("PRODUCTION", "0");
        assert!(!Config::from_env().unwrap().production);

        set_var("PRODUCTION", "maybe");
        assert!(Config::from_env().is_err());
        remove_var("PRODUCTION");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_channel_id() {
        set_var("DISCORD_TOKEN", "token");
        set_var("OPERATOR_CHANNEL_ID", "not-a-number");
        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            AppError::ConfigurationError { .. }
        ));
        remove_var("OPERATOR_CHANNEL_ID");
    }
}
