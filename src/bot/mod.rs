pub mod checks;
pub mod cog;
pub mod error;
pub mod error_handler;
pub mod suggestion;

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use anyhow;
use anyhow::Result;
use futures::lock::Mutex;
use log::info;
use poise::Framework;
use poise::FrameworkOptions;
use poise::serenity_prelude::Client;
use poise::serenity_prelude::ClientBuilder;
use poise::serenity_prelude::GatewayIntents;
use poise::serenity_prelude::Token;
use poise::serenity_prelude::UserId;
use tokio::sync::Semaphore;

type Error = Box<dyn std::error::Error + Send + Sync>;

use crate::bot::cog::Cog;
use crate::bot::cog::Cogs;
use crate::bot::error_handler::ErrorHandler;
use crate::config::Config;
use crate::locale::LocaleStore;

pub struct Data {
    pub config: Arc<Config>,
    pub locales: Arc<LocaleStore>,
    pub error_handler: ErrorHandler,
    pub command_slots: Arc<Semaphore>,
    pub started_at: Instant,
}

pub struct Bot {
    client_builder: Option<ClientBuilder>,
    client: Arc<Mutex<Option<Client>>>,
}

impl Bot {
    pub async fn new(config: Arc<Config>, locales: Arc<LocaleStore>) -> Result<Self> {
        info!("Initializing bot...");

        let framework = Self::create_framework(&config)?;
        let data = Arc::new(Data {
            error_handler: ErrorHandler::new(&config),
            command_slots: Arc::new(Semaphore::new(config.max_concurrent_commands)),
            started_at: Instant::now(),
            config: config.clone(),
            locales,
        });
        let (token, intents) = Self::create_client_config(&config)?;

        let client_builder = ClientBuilder::new(token, intents)
            .framework(framework)
            .data(data);

        Ok(Self {
            client_builder: Some(client_builder),
            client: Arc::new(Mutex::new(None)),
        })
    }

    pub fn start(&mut self) {
        info!("Starting bot client...");
        let client_builder = self.client_builder.take().expect("start() called twice");
        let client = self.client.clone();

        tokio::spawn(async move {
            info!("Connecting bot to Discord...");
            let built_client = client_builder
                .await
                .expect("Failed to build Discord client");

            *client.lock().await = Some(built_client);
            info!("Bot connected to Discord.");

            client
                .lock()
                .await
                .as_mut()
                .unwrap()
                .start()
                .await
                .expect("Bot client crashed");
        });

        info!("Bot client start initiated.");
    }

    fn create_framework(config: &Config) -> Result<Box<Framework<Data, Error>>> {
        let cogs = Cogs;
        let options = FrameworkOptions::<Data, Error> {
            commands: cogs.commands(),
            on_error: |error| Box::pin(Self::on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone().into()),
                edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                    Duration::from_secs(3600),
                ))),
                ..Default::default()
            },
            owners: Self::create_owners(config)?,
            ..Default::default()
        };

        Ok(Box::new(
            poise::Framework::builder().options(options).build(),
        ))
    }

    fn create_owners(config: &Config) -> Result<HashSet<UserId>> {
        let mut owners = HashSet::new();
        if let Some(admin_id) = &config.admin_id {
            owners.insert(
                UserId::from_str(admin_id).map_err(|_| anyhow::anyhow!("Invalid admin ID"))?,
            );
        }
        Ok(owners)
    }

    fn create_client_config(config: &Config) -> Result<(Token, GatewayIntents)> {
        let token = Token::from_str(&config.discord_token)?;
        let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
        Ok((token, intents))
    }

    async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
        ErrorHandler::dispatch(error).await;
    }
}
