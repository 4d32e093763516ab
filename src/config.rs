use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::decorate::glow::DEFAULT_GLOW_RADIUS;
use crate::decorate::profile::default_captions;

pub const CONFIG_NAME: &str = "decorbot.toml";

/// Fonts tried in order when `[render] font` is not set.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const MIN_AVATAR_SIZE: u32 = 32;
const MAX_AVATAR_SIZE: u32 = 2048;

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct BotConfig {
    /// Command prefix (default: "!")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Gateway websocket URL
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            gateway_url: default_gateway_url(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Side length of decorated avatars (default: 512)
    #[serde(default = "default_avatar_size")]
    pub avatar_size: u32,

    /// Apply alpha bleed before encoding (default: true)
    #[serde(default = "default_true")]
    pub bleed: bool,

    /// Blur radius of the glow decoration (default: 18)
    #[serde(default = "default_glow_radius")]
    pub glow_radius: u32,

    /// TrueType font for profile cards; system fonts are probed when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,

    /// Directory holding overlay frames (default: "assets/overlays")
    #[serde(default = "default_overlays_dir")]
    pub overlays_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            avatar_size: default_avatar_size(),
            bleed: true,
            glow_radius: default_glow_radius(),
            font: None,
            overlays_dir: default_overlays_dir(),
        }
    }
}

impl RenderConfig {
    /// The configured font relative to `config_dir`, or the first system
    /// candidate that exists.
    pub fn resolve_font(&self, config_dir: &Path) -> Option<PathBuf> {
        if let Some(font) = &self.font {
            return Some(config_dir.join(font));
        }
        FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    pub fn resolve_overlays_dir(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.overlays_dir)
    }
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct ProfileConfig {
    /// Static lines printed under the display name
    #[serde(default = "default_captions")]
    pub captions: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            captions: default_captions(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_avatar_size() -> u32 {
    512
}

fn default_glow_radius() -> u32 {
    DEFAULT_GLOW_RADIUS
}

fn default_overlays_dir() -> PathBuf {
    PathBuf::from("assets/overlays")
}

impl Config {
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.validate(config_dir)?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self, config_dir: &Path) -> Result<()> {
        if self.bot.prefix.trim().is_empty() || self.bot.prefix.contains(char::is_whitespace) {
            bail!("bot.prefix must be non-empty and contain no whitespace");
        }
        if !(MIN_AVATAR_SIZE..=MAX_AVATAR_SIZE).contains(&self.render.avatar_size) {
            bail!(
                "render.avatar_size must be between {} and {}, got {}",
                MIN_AVATAR_SIZE,
                MAX_AVATAR_SIZE,
                self.render.avatar_size
            );
        }
        if self.render.glow_radius == 0 {
            bail!("render.glow_radius must be positive");
        }
        if let Some(font) = &self.render.font {
            let full = config_dir.join(font);
            if !full.is_file() {
                bail!("render.font does not exist: {}", full.display());
            }
        }
        Ok(())
    }

    pub fn default_template() -> String {
        r#"# decorbot configuration

[bot]
prefix = "!"                  # Command prefix, e.g. !decorate ring #ff00ff
# gateway_url = "wss://gateway.discord.gg/?v=10&encoding=json"

[render]
avatar_size = 512             # Side length of decorated avatars
bleed = true                  # Alpha bleed transparent pixels (fixes resize fringes)
glow_radius = 18              # Blur radius of the glow decoration
overlays_dir = "assets/overlays"
# font = "fonts/DejaVuSans.ttf"  # Font for profile cards (system fonts are probed if unset)

# Lines shown under the display name on profile cards
# [profile]
# captions = [
#     "Look at me I'm a beautiful butterfly",
#     "Fluttering in the moonlight",
#     "Waiting for the day when",
#     "I get an avatar decoration",
# ]
"#
        .to_string()
    }
}
