use std::fmt;

use anyhow::Result;
use tracing::warn;

use crate::chat::ChatApi;
use crate::discord::models::Message;

/// Where the image for a command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Attachment(String),
    ReplyAttachment(String),
    Avatar(String),
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Attachment(url)
            | ImageSource::ReplyAttachment(url)
            | ImageSource::Avatar(url) => url,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ImageSource::Attachment(_) => "attachment",
            ImageSource::ReplyAttachment(_) => "reply attachment",
            ImageSource::Avatar(_) => "avatar",
        };
        f.write_str(kind)
    }
}

/// Picks the image for `message`: its own first image attachment, then the
/// first image attachment of the message it replies to, then the author's
/// avatar. Failing to fetch the replied-to message is not an error.
pub async fn locate_image<A: ChatApi>(api: &A, message: &Message) -> ImageSource {
    if let Some(attachment) = message.first_image() {
        return ImageSource::Attachment(attachment.url.clone());
    }

    match referenced_message(api, message).await {
        Ok(Some(reply)) => {
            if let Some(attachment) = reply.first_image() {
                return ImageSource::ReplyAttachment(attachment.url.clone());
            }
        }
        Ok(None) => {}
        Err(e) => warn!(
            message = %message.id,
            error = %format!("{:#}", e),
            "Could not fetch replied-to message"
        ),
    }

    ImageSource::Avatar(message.display_avatar_url())
}

pub async fn fetch_image<A: ChatApi>(api: &A, message: &Message) -> Result<(ImageSource, Vec<u8>)> {
    let source = locate_image(api, message).await;
    let bytes = api.download(source.url()).await?;
    Ok((source, bytes))
}

async fn referenced_message<A: ChatApi>(api: &A, message: &Message) -> Result<Option<Message>> {
    if let Some(embedded) = &message.referenced_message {
        return Ok(Some((**embedded).clone()));
    }

    let Some(reference) = &message.message_reference else {
        return Ok(None);
    };
    let Some(message_id) = &reference.message_id else {
        return Ok(None);
    };
    let channel_id = reference
        .channel_id
        .as_deref()
        .unwrap_or(&message.channel_id);

    api.fetch_message(channel_id, message_id).await.map(Some)
}
