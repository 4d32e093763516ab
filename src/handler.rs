use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::chat::ChatApi;
use crate::codec;
use crate::command::{self, Command};
use crate::decorate::{Decoration, Decorator};
use crate::discord::models::Message;
use crate::source;

pub const OUTPUT_FILE_NAME: &str = "decorated.png";

/// Turns chat messages into decorated images.
pub struct Handler<A> {
    api: A,
    decorator: Arc<Decorator>,
    prefix: String,
    bleed: bool,
}

impl<A: ChatApi> Handler<A> {
    pub fn new(api: A, decorator: Arc<Decorator>, prefix: String, bleed: bool) -> Self {
        Self {
            api,
            decorator,
            prefix,
            bleed,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Handles one incoming message. Rendering failures are reported back to
    /// the channel; only failures to reply are returned.
    pub async fn handle(&self, message: &Message) -> Result<()> {
        if message.author.bot {
            return Ok(());
        }

        let Some(parsed) = command::parse(&message.content, &self.prefix) else {
            return Ok(());
        };

        match parsed {
            Err(e) => self.api.reply_text(message, &e.to_string()).await,
            Ok(Command::Help) => {
                self.api
                    .reply_text(message, &command::help_text(&self.prefix))
                    .await
            }
            Ok(Command::Decorate(decoration)) => {
                info!(
                    message = %message.id,
                    author = %message.author.username,
                    %decoration,
                    "Decorating"
                );

                if let Err(e) = self.api.trigger_typing(&message.channel_id).await {
                    warn!(error = %format!("{:#}", e), "Failed to trigger typing");
                }

                match self.render(message, decoration).await {
                    Ok(png) => {
                        self.api
                            .reply_file(message, OUTPUT_FILE_NAME, png)
                            .await
                    }
                    Err(e) => {
                        warn!(message = %message.id, error = %format!("{:#}", e), "Decoration failed");
                        self.api
                            .reply_text(
                                message,
                                &format!("An error occurred while processing the image: {:#}", e),
                            )
                            .await
                    }
                }
            }
        }
    }

    async fn render(&self, message: &Message, decoration: Decoration) -> Result<Vec<u8>> {
        let (source, bytes) = source::fetch_image(&self.api, message).await?;
        info!(message = %message.id, %source, bytes = bytes.len(), "Fetched image");

        let decorator = Arc::clone(&self.decorator);
        let display_name = message.display_name().to_string();
        let bleed = self.bleed;

        tokio::task::spawn_blocking(move || {
            let image = codec::decode(&bytes)?;
            let decorated = decorator.apply(&decoration, image, &display_name)?;
            codec::encode_png(decorated, bleed)
        })
        .await
        .context("Render task failed")?
    }
}
