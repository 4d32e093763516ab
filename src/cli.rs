use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "decorbot",
    about = "Discord bot that decorates avatars with rings, glows, stickers and profile cards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true, default_value = "decorbot.toml")]
    pub config: PathBuf,

    /// Discord bot token
    #[arg(
        long,
        global = true,
        env = "DISCORD_TOKEN",
        hide_env_values = true,
        long_help = "\
Discord bot token.
Create an application at: https://discord.com/developers/applications

The bot needs the Message Content privileged intent enabled and the
following channel permissions:
  View Channel, Send Messages, Attach Files, Read Message History"
    )]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to Discord and answer decoration commands
    Run,

    /// Decorate a local image file, without Discord
    Render {
        /// Input image
        input: PathBuf,

        /// Output PNG path
        output: PathBuf,

        /// Decoration and its options, as typed after `!decorate`
        /// (e.g. `ring #ff00ff`, `gradient red blue`, `sticker heart`)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        decoration: Vec<String>,

        /// Display name shown on profile cards
        #[arg(long, default_value = "Display Name")]
        name: String,
    },

    /// Create a new decorbot.toml config file
    Init,

    /// Check config validity, font and overlays
    Check,
}
