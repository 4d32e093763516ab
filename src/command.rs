//! Parsing of chat messages into bot commands.
//!
//! ```text
//! !decorate                       ring in the default color
//! !decorate ring #ff00ff
//! !decorate gradient #5865f2 #00d4ff
//! !decorate glow blue
//! !decorate sticker star
//! !decorate profile
//! !decorate dotted pink 64
//! !decorate overlay butterfly.png 1.2
//! ```
//!
//! Portuguese aliases are accepted too: `decorar`, `anel`, `gradiente`,
//! `adesivo`, `perfil`, `duplo`, `pontilhado`, `ajuda`.

use thiserror::Error;

use crate::color::{parse_color, BLURPLE, CYAN_ACCENT, FALLBACK};
use crate::decorate::{Decoration, StickerKind};

pub const DEFAULT_DOT_COUNT: u32 = 48;
pub const MAX_DOT_COUNT: u32 = 256;
pub const MIN_OVERLAY_SCALE: f32 = 0.5;
pub const MAX_OVERLAY_SCALE: f32 = 1.5;

pub const SUBCOMMANDS: &str = "ring | gradient | glow | sticker | profile | double | dotted | overlay";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Decorate(Decoration),
    Help,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Invalid subcommand. Use: {list}", list = SUBCOMMANDS)]
    UnknownSubcommand(String),

    #[error("Name the overlay file from the overlays folder, e.g. {prefix}decorate overlay butterfly.png 1.0")]
    MissingOverlay { prefix: String },
}

/// Parses `content`. Returns `None` when the message is not addressed to
/// the bot (wrong prefix or an unrelated command).
pub fn parse(content: &str, prefix: &str) -> Option<Result<Command, CommandError>> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?.to_lowercase();
    let args: Vec<&str> = words.collect();

    match name.as_str() {
        "help" | "ajuda" => Some(Ok(Command::Help)),
        "decorate" | "decorar" => Some(parse_decoration(&args, prefix).map(Command::Decorate)),
        _ => None,
    }
}

pub fn parse_decoration(args: &[&str], prefix: &str) -> Result<Decoration, CommandError> {
    let sub = args.first().map(|s| s.to_lowercase());
    let opts = args.get(1..).unwrap_or_default();
    // A missing color uses the decoration's default; an unreadable one uses FALLBACK.
    let color_at = |i: usize, default| opts.get(i).map_or(default, |v| parse_color(v, FALLBACK));

    let decoration = match sub.as_deref().unwrap_or("ring") {
        "ring" | "anel" => Decoration::Ring {
            color: color_at(0, BLURPLE),
        },
        "gradient" | "gradiente" | "gradiente2" => Decoration::GradientRing {
            from: color_at(0, BLURPLE),
            to: color_at(1, CYAN_ACCENT),
        },
        "glow" => Decoration::Glow {
            color: color_at(0, BLURPLE),
        },
        "sticker" | "adesivo" => {
            Decoration::Sticker(StickerKind::from_name(opts.first().copied().unwrap_or("star")))
        }
        "profile" | "perfil" => Decoration::Profile,
        "double" | "duplo" => Decoration::DoubleRing {
            color: color_at(0, BLURPLE),
        },
        "dotted" | "pontilhado" => Decoration::DottedRing {
            color: color_at(0, BLURPLE),
            count: opts
                .get(1)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .map_or(DEFAULT_DOT_COUNT, |n| n.min(MAX_DOT_COUNT)),
        },
        "overlay" => {
            let file = opts.first().ok_or_else(|| CommandError::MissingOverlay {
                prefix: prefix.to_string(),
            })?;
            let scale = opts
                .get(1)
                .and_then(|v| v.parse::<f32>().ok())
                .filter(|s| s.is_finite() && *s != 0.0)
                .unwrap_or(1.0)
                .clamp(MIN_OVERLAY_SCALE, MAX_OVERLAY_SCALE);
            Decoration::Overlay {
                file: file.to_string(),
                scale,
            }
        }
        other => return Err(CommandError::UnknownSubcommand(other.to_string())),
    };

    Ok(decoration)
}

pub fn help_text(prefix: &str) -> String {
    [
        format!("Prefix: {}", prefix),
        "Commands:".to_string(),
        format!("{}decorate [{}] [options]", prefix, SUBCOMMANDS),
        format!("Ex.: {}decorate ring #ff00ff", prefix),
        format!("Ex.: {}decorate gradient #5865f2 #00d4ff", prefix),
        "Attach an image or reply to one; otherwise your avatar is used.".to_string(),
    ]
    .join("\n")
}
