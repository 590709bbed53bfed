use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let defaults = config.defaults.unwrap_or_default();

    println!("{}", "Configuration".bold());
    match Config::path() {
        Ok(path) => println!("  {} {}", "file:".dimmed(), path.display()),
        Err(_) => println!("  {} {}", "file:".dimmed(), "(unavailable)"),
    }
    println!();
    println!(
        "  defaults.start_slide  {}",
        match defaults.start_slide {
            Some(n) => n.to_string().cyan(),
            None => "1 (default)".dimmed(),
        }
    );
    println!(
        "  defaults.windowed     {}",
        match defaults.windowed {
            Some(w) => w.to_string().cyan(),
            None => "false (default)".dimmed(),
        }
    );
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}
