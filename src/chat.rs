use std::future::Future;

use anyhow::Result;

use crate::discord::models::Message;

/// The chat operations the command handler needs. Implemented over HTTP by
/// [`crate::discord::DiscordClient`].
pub trait ChatApi: Send + Sync {
    fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> impl Future<Output = Result<Message>> + Send;

    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    fn trigger_typing(&self, channel_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn reply_text(&self, to: &Message, content: &str) -> impl Future<Output = Result<()>> + Send;

    fn reply_file(
        &self,
        to: &Message,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<()>> + Send;
}
