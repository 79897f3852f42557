//! Application entry point for repo-bot.
//!
//! Initializes all components and starts the Discord bot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;

use repo_bot::bot::Bot;
use repo_bot::config::Config;
use repo_bot::locale::LocaleStore;
use repo_bot::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config().await?;
    let locales = load_locales(&config, init_start)?;

    let _bot = setup_bot(&config, locales, init_start).await?;

    run(init_start).await
}

async fn load_config() -> Result<Arc<Config>> {
    debug!("Loading configuration...");
    let config = Arc::new(Config::from_env()?);
    setup_logging(&config)?;
    info!("Starting repo-bot...");
    Ok(config)
}

fn load_locales(config: &Config, init_start: Instant) -> Result<Arc<LocaleStore>> {
    debug!("Loading locale catalogs...");
    let locales = Arc::new(LocaleStore::load(
        &config.locale_path,
        &config.default_locale,
    )?);
    info!(
        "Locale catalogs loaded ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(locales)
}

async fn setup_bot(
    config: &Arc<Config>,
    locales: Arc<LocaleStore>,
    init_start: Instant,
) -> Result<Bot> {
    info!("Starting bot...");
    let mut bot = Bot::new(config.clone(), locales).await?;
    bot.start();
    info!(
        "Bot setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(bot)
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "repo-bot is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
