use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::Cli;
use crate::codec;
use crate::command::parse_decoration;
use crate::config::Config;
use crate::decorate::Decorator;

pub fn run(cli: &Cli, input: &Path, output: &Path, decoration: &[String], name: &str) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let config_dir = cli.config.parent().unwrap_or(Path::new("."));

    let args: Vec<&str> = decoration.iter().map(String::as_str).collect();
    let decoration = parse_decoration(&args, &config.bot.prefix)?;
    let decorator = Decorator::from_config(&config, config_dir)?;

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let image = codec::decode(&bytes)?;
    let decorated = decorator.apply(&decoration, image, name)?;
    let (w, h) = decorated.dimensions();
    let png = codec::encode_png(decorated, config.render.bleed)?;

    std::fs::write(output, png).with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{} Rendered {} ({}x{}) to {}",
        "✓".green(),
        decoration,
        w,
        h,
        output.display()
    );
    Ok(())
}
