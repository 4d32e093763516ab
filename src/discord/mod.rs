pub mod gateway;
pub mod models;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{multipart, Client, Response, StatusCode};

use crate::chat::ChatApi;
use models::{CreateMessage, Message};

pub const API_BASE: &str = "https://discord.com/api/v10";

/// Largest download accepted for an image source.
pub const MAX_DOWNLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct DiscordClient {
    pub client: Client,
    token: String,
}

impl DiscordClient {
    pub fn new(token: String) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .user_agent(concat!(
                "DiscordBot (https://github.com/decorbot/decorbot, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, token })
    }

    /// Authorization header value for REST endpoints.
    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    pub async fn execute_with_retry<F, Fut>(&self, mut make_request: F) -> Result<Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response>>,
    {
        let max_retries = 3;
        let mut attempt = 0;

        loop {
            let response = make_request().await?;
            let status = response.status();

            if status.is_success() || status == StatusCode::NO_CONTENT {
                return Ok(response);
            }

            let should_retry = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

            if !should_retry || attempt >= max_retries {
                let body = response.text().await.unwrap_or_default();
                bail!("Discord API error {}: {}", status, body);
            }

            // Discord sends fractional seconds.
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0);

            let delay = retry_after
                .map(Duration::from_secs_f64)
                .unwrap_or(Duration::from_secs(1 << attempt));
            tracing::debug!(%status, ?delay, attempt, "Retrying Discord request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    pub async fn execute_json<T: serde::de::DeserializeOwned, F, Fut>(
        &self,
        make_request: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response>>,
    {
        let response = self.execute_with_retry(make_request).await?;
        let body = response.text().await?;
        let parsed: T = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Failed to parse response: {}\nBody: {}", e, body))?;
        Ok(parsed)
    }
}

impl ChatApi for DiscordClient {
    async fn fetch_message(&self, channel_id: &str, message_id: &str) -> Result<Message> {
        let url = format!("{}/channels/{}/messages/{}", API_BASE, channel_id, message_id);
        let auth = self.auth_header();

        self.execute_json(|| async {
            Ok(self
                .client
                .get(&url)
                .header("Authorization", &auth)
                .send()
                .await?)
        })
        .await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .execute_with_retry(|| async { Ok(self.client.get(url).send().await?) })
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if let Some(len) = response.content_length() {
            if len as usize > MAX_DOWNLOAD_BYTES {
                bail!("Image is too large ({} bytes)", len);
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_DOWNLOAD_BYTES {
            bail!("Image is too large ({} bytes)", bytes.len());
        }
        Ok(bytes.to_vec())
    }

    async fn trigger_typing(&self, channel_id: &str) -> Result<()> {
        let url = format!("{}/channels/{}/typing", API_BASE, channel_id);
        let auth = self.auth_header();

        self.execute_with_retry(|| async {
            Ok(self
                .client
                .post(&url)
                .header("Authorization", &auth)
                .header("Content-Length", "0")
                .send()
                .await?)
        })
        .await?;
        Ok(())
    }

    async fn reply_text(&self, to: &Message, content: &str) -> Result<()> {
        let url = format!("{}/channels/{}/messages", API_BASE, to.channel_id);
        let auth = self.auth_header();
        let body = CreateMessage::reply(to, Some(content));

        self.execute_with_retry(|| async {
            Ok(self
                .client
                .post(&url)
                .header("Authorization", &auth)
                .json(&body)
                .send()
                .await?)
        })
        .await?;
        Ok(())
    }

    async fn reply_file(&self, to: &Message, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let url = format!("{}/channels/{}/messages", API_BASE, to.channel_id);
        let auth = self.auth_header();
        let payload = serde_json::to_string(&CreateMessage::reply(to, None))?;

        self.execute_with_retry(|| async {
            let part = multipart::Part::bytes(bytes.clone())
                .file_name(file_name.to_string())
                .mime_str("image/png")?;
            let form = multipart::Form::new()
                .text("payload_json", payload.clone())
                .part("files[0]", part);

            Ok(self
                .client
                .post(&url)
                .header("Authorization", &auth)
                .multipart(form)
                .send()
                .await?)
        })
        .await?;
        Ok(())
    }
}
