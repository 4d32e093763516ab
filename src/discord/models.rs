use serde::{Deserialize, Serialize};

pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Avatar size requested from the CDN.
pub const AVATAR_SIZE: u32 = 512;

// ── Users ──

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Index of the stock avatar Discord shows for users without one.
    pub fn default_avatar_index(&self) -> u64 {
        self.id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0)
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!(
                "{}/avatars/{}/{}.png?size={}",
                CDN_BASE, self.id, hash, AVATAR_SIZE
            ),
            None => format!(
                "{}/embed/avatars/{}.png",
                CDN_BASE,
                self.default_avatar_index()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Member {
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

// ── Messages ──

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageReference {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub author: User,
    #[serde(default)]
    pub member: Option<Member>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub message_reference: Option<MessageReference>,
    #[serde(default)]
    pub referenced_message: Option<Box<Message>>,
}

impl Message {
    /// Server nickname, then global display name, then username.
    pub fn display_name(&self) -> &str {
        self.member
            .as_ref()
            .and_then(|m| m.nick.as_deref())
            .or(self.author.global_name.as_deref())
            .unwrap_or(&self.author.username)
    }

    /// The author's per-server avatar when set, otherwise their user avatar.
    pub fn display_avatar_url(&self) -> String {
        let member_avatar = self.member.as_ref().and_then(|m| m.avatar.as_deref());
        match (&self.guild_id, member_avatar) {
            (Some(guild_id), Some(hash)) => format!(
                "{}/guilds/{}/users/{}/avatars/{}.png?size={}",
                CDN_BASE, guild_id, self.author.id, hash, AVATAR_SIZE
            ),
            _ => self.author.avatar_url(),
        }
    }

    pub fn first_image(&self) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.is_image())
    }
}

// ── Outgoing ──

#[derive(Debug, Serialize)]
pub struct ReplyReference<'a> {
    pub message_id: &'a str,
    pub fail_if_not_exists: bool,
}

#[derive(Debug, Serialize)]
pub struct AllowedMentions {
    pub replied_user: bool,
    pub parse: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    pub message_reference: ReplyReference<'a>,
    pub allowed_mentions: AllowedMentions,
}

impl<'a> CreateMessage<'a> {
    /// A reply to `to` that does not ping anyone.
    pub fn reply(to: &'a Message, content: Option<&'a str>) -> Self {
        Self {
            content,
            message_reference: ReplyReference {
                message_id: &to.id,
                fail_if_not_exists: false,
            },
            allowed_mentions: AllowedMentions {
                replied_user: false,
                parse: Vec::new(),
            },
        }
    }
}

// ── Gateway ──

#[derive(Debug, Deserialize, Serialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(default)]
    pub d: serde_json::Value,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Hello {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct Ready {
    pub session_id: String,
    pub resume_gateway_url: String,
    pub user: User,
}
