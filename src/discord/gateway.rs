//! Minimal Discord gateway client: keeps a websocket session alive and
//! forwards `MESSAGE_CREATE` events to the bot.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use super::models::{GatewayPayload, Hello, Message, Ready};

pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RESUME: u8 = 6;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
    pub const DIRECT_MESSAGES: u64 = 1 << 12;
    pub const MESSAGE_CONTENT: u64 = 1 << 15;
}

pub const DEFAULT_INTENTS: u64 =
    intents::GUILDS | intents::GUILD_MESSAGES | intents::DIRECT_MESSAGES | intents::MESSAGE_CONTENT;

const GATEWAY_QUERY: &str = "?v=10&encoding=json";
const MAX_BACKOFF_SECS: u64 = 60;

#[derive(Debug)]
pub enum GatewayEvent {
    Hello { heartbeat_interval: u64 },
    Dispatch { seq: Option<u64>, event: DispatchEvent },
    HeartbeatRequest,
    Reconnect,
    InvalidSession { resumable: bool },
    HeartbeatAck,
    Unknown(u8),
}

#[derive(Debug)]
pub enum DispatchEvent {
    Ready(Box<Ready>),
    Resumed,
    MessageCreate(Box<Message>),
    Other(String),
}

impl GatewayEvent {
    pub fn parse(text: &str) -> Result<Self> {
        let payload: GatewayPayload =
            serde_json::from_str(text).context("Malformed gateway payload")?;

        Ok(match payload.op {
            opcode::HELLO => {
                let hello: Hello = serde_json::from_value(payload.d)?;
                GatewayEvent::Hello {
                    heartbeat_interval: hello.heartbeat_interval,
                }
            }
            opcode::DISPATCH => GatewayEvent::Dispatch {
                seq: payload.s,
                event: DispatchEvent::parse(payload.t.as_deref().unwrap_or(""), payload.d)?,
            },
            opcode::HEARTBEAT => GatewayEvent::HeartbeatRequest,
            opcode::RECONNECT => GatewayEvent::Reconnect,
            opcode::INVALID_SESSION => GatewayEvent::InvalidSession {
                resumable: payload.d.as_bool().unwrap_or(false),
            },
            opcode::HEARTBEAT_ACK => GatewayEvent::HeartbeatAck,
            other => GatewayEvent::Unknown(other),
        })
    }
}

impl DispatchEvent {
    fn parse(name: &str, data: Value) -> Result<Self> {
        Ok(match name {
            "READY" => DispatchEvent::Ready(Box::new(
                serde_json::from_value(data).context("Malformed READY")?,
            )),
            "RESUMED" => DispatchEvent::Resumed,
            "MESSAGE_CREATE" => DispatchEvent::MessageCreate(Box::new(
                serde_json::from_value(data).context("Malformed MESSAGE_CREATE")?,
            )),
            other => DispatchEvent::Other(other.to_string()),
        })
    }
}

pub fn identify_payload(token: &str, intents: u64) -> Value {
    json!({
        "op": opcode::IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": env!("CARGO_PKG_NAME"),
                "device": env!("CARGO_PKG_NAME"),
            },
        },
    })
}

pub fn resume_payload(token: &str, session_id: &str, seq: Option<u64>) -> Value {
    json!({
        "op": opcode::RESUME,
        "d": {
            "token": token,
            "session_id": session_id,
            "seq": seq,
        },
    })
}

pub fn heartbeat_payload(seq: Option<u64>) -> Value {
    json!({ "op": opcode::HEARTBEAT, "d": seq })
}

/// Close codes after which reconnecting cannot succeed (bad token, invalid
/// or disallowed intents, unsupported API version).
pub fn is_fatal_close(code: u16) -> bool {
    matches!(code, 4004 | 4010 | 4011 | 4012 | 4013 | 4014)
}

/// Close codes that invalidate the session, forcing a fresh identify.
fn clears_session(code: u16) -> bool {
    matches!(code, 4007 | 4009)
}

fn with_query(url: &str) -> String {
    if url.contains('?') {
        url.to_string()
    } else {
        format!("{}/{}", url.trim_end_matches('/'), GATEWAY_QUERY)
    }
}

#[derive(Debug)]
struct Session {
    id: String,
    resume_url: String,
}

#[derive(Debug, PartialEq)]
enum Disconnect {
    /// Reconnect, resuming the session when one exists.
    Reconnect,
    /// Reconnect and identify from scratch.
    Reidentify,
    /// The consumer went away.
    Shutdown,
    Fatal(u16, String),
}

pub struct Gateway {
    token: String,
    url: String,
    intents: u64,
    session: Option<Session>,
    seq: Option<u64>,
}

impl Gateway {
    pub fn new(token: String, url: String) -> Self {
        Self {
            token,
            url,
            intents: DEFAULT_INTENTS,
            session: None,
            seq: None,
        }
    }

    /// Runs until `events` is closed or the gateway rejects the bot.
    pub async fn run(mut self, events: mpsc::Sender<Message>) -> Result<()> {
        let mut backoff = 1;

        loop {
            match self.connect_once(&events).await {
                Ok(Disconnect::Shutdown) => return Ok(()),
                Ok(Disconnect::Fatal(code, reason)) => {
                    bail!("Gateway closed the connection ({}): {}", code, reason)
                }
                Ok(Disconnect::Reidentify) => {
                    self.session = None;
                    self.seq = None;
                    backoff = 1;
                }
                Ok(Disconnect::Reconnect) => backoff = 1,
                Err(e) => warn!(error = %format!("{:#}", e), "Gateway connection failed"),
            }

            debug!(backoff, "Reconnecting to gateway");
            tokio::time::sleep(Duration::from_secs(backoff)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
        }
    }

    async fn connect_once(&mut self, events: &mpsc::Sender<Message>) -> Result<Disconnect> {
        let url = match &self.session {
            Some(session) => with_query(&session.resume_url),
            None => with_query(&self.url),
        };

        let (socket, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        let (mut write, mut read) = socket.split();

        let heartbeat_interval = loop {
            let frame = read
                .next()
                .await
                .context("Gateway closed before HELLO")??;
            if let WsMessage::Text(text) = frame {
                if let GatewayEvent::Hello { heartbeat_interval } = GatewayEvent::parse(text.as_str())? {
                    break heartbeat_interval;
                }
            }
        };

        let handshake = match &self.session {
            Some(session) => resume_payload(&self.token, &session.id, self.seq),
            None => identify_payload(&self.token, self.intents),
        };
        write.send(WsMessage::text(handshake.to_string())).await?;

        let period = Duration::from_millis(heartbeat_interval.max(1));
        let mut heartbeat = interval_at(Instant::now() + period, period);
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        warn!("Heartbeat not acknowledged, reconnecting");
                        return Ok(Disconnect::Reconnect);
                    }
                    write.send(WsMessage::text(heartbeat_payload(self.seq).to_string())).await?;
                    awaiting_ack = true;
                }
                frame = read.next() => {
                    let Some(frame) = frame else {
                        return Ok(Disconnect::Reconnect);
                    };
                    match frame? {
                        WsMessage::Text(text) => {
                            let event = match GatewayEvent::parse(text.as_str()) {
                                Ok(event) => event,
                                Err(e) => {
                                    warn!(error = %format!("{:#}", e), "Skipping gateway payload");
                                    continue;
                                }
                            };
                            match event {
                                GatewayEvent::HeartbeatAck => awaiting_ack = false,
                                GatewayEvent::HeartbeatRequest => {
                                    write.send(WsMessage::text(heartbeat_payload(self.seq).to_string())).await?;
                                }
                                GatewayEvent::Reconnect => return Ok(Disconnect::Reconnect),
                                GatewayEvent::InvalidSession { resumable } => {
                                    info!(resumable, "Gateway invalidated the session");
                                    return Ok(if resumable {
                                        Disconnect::Reconnect
                                    } else {
                                        Disconnect::Reidentify
                                    });
                                }
                                GatewayEvent::Dispatch { seq, event } => {
                                    if seq.is_some() {
                                        self.seq = seq;
                                    }
                                    if !self.dispatch(event, events).await {
                                        return Ok(Disconnect::Shutdown);
                                    }
                                }
                                GatewayEvent::Hello { .. } | GatewayEvent::Unknown(_) => {}
                            }
                        }
                        WsMessage::Close(frame) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.as_str().to_string()))
                                .unwrap_or((1000, String::new()));
                            if is_fatal_close(code) {
                                return Ok(Disconnect::Fatal(code, reason));
                            }
                            info!(code, %reason, "Gateway closed the connection");
                            if clears_session(code) {
                                return Ok(Disconnect::Reidentify);
                            }
                            return Ok(Disconnect::Reconnect);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Returns `false` once the receiving side has gone away.
    async fn dispatch(&mut self, event: DispatchEvent, events: &mpsc::Sender<Message>) -> bool {
        match event {
            DispatchEvent::Ready(ready) => {
                info!(
                    user = %ready.user.username,
                    session = %ready.session_id,
                    "Connected to gateway"
                );
                self.session = Some(Session {
                    id: ready.session_id,
                    resume_url: ready.resume_gateway_url,
                });
                true
            }
            DispatchEvent::Resumed => {
                info!("Session resumed");
                true
            }
            DispatchEvent::MessageCreate(message) => events.send(*message).await.is_ok(),
            DispatchEvent::Other(name) => {
                debug!(event = %name, "Ignoring dispatch");
                true
            }
        }
    }
}
