use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::decorate::load_font;

pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    println!("{} Config is valid ({})", "✓".green(), cli.config.display());

    let config_dir = cli.config.parent().unwrap_or(Path::new("."));

    match config.render.resolve_font(config_dir) {
        Some(path) => match load_font(&path) {
            Ok(_) => println!("{} Font loaded ({})", "✓".green(), path.display()),
            Err(e) => println!("{} {:#}", "✗".red(), e),
        },
        None => println!(
            "{} No font found. Profile cards will have no text; set [render] font.",
            "!".yellow()
        ),
    }

    let overlays_dir = config.render.resolve_overlays_dir(config_dir);
    if overlays_dir.is_dir() {
        let count = std::fs::read_dir(&overlays_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .count();
        println!(
            "{} {} overlay(s) in {}",
            "✓".green(),
            count,
            overlays_dir.display()
        );
    } else {
        println!(
            "{} Overlays directory not found ({}). `overlay` commands will fail.",
            "!".yellow(),
            overlays_dir.display()
        );
    }

    if cli.token.is_none() {
        println!(
            "{} No token set. Pass --token or set DISCORD_TOKEN before `decorbot run`.",
            "!".yellow()
        );
    }

    Ok(())
}
