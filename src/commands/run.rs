use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::decorate::Decorator;
use crate::discord::gateway::Gateway;
use crate::discord::DiscordClient;
use crate::handler::Handler;

/// Messages buffered between the gateway and the handlers.
const EVENT_BUFFER: usize = 64;

pub async fn run(cli: &Cli) -> Result<()> {
    let token = cli
        .token
        .clone()
        .ok_or_else(|| anyhow!("--token or DISCORD_TOKEN is required to run the bot"))?;

    let config = Config::load_or_default(&cli.config)?;
    let config_dir = cli.config.parent().unwrap_or(Path::new("."));
    let decorator = Arc::new(Decorator::from_config(&config, config_dir)?);

    let client = DiscordClient::new(token.clone())?;
    let handler = Arc::new(Handler::new(
        client,
        decorator,
        config.bot.prefix.clone(),
        config.render.bleed,
    ));

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let mut gateway = tokio::spawn(Gateway::new(token, config.bot.gateway_url.clone()).run(tx));
    info!(prefix = %config.bot.prefix, "Bot starting");

    loop {
        tokio::select! {
            Some(message) = rx.recv() => {
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    if let Err(e) = handler.handle(&message).await {
                        error!(message = %message.id, error = %format!("{:#}", e), "Failed to reply");
                    }
                });
            }
            result = &mut gateway => {
                return result.context("Gateway task failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                gateway.abort();
                return Ok(());
            }
        }
    }
}
