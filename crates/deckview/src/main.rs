mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod engine;
mod parser;
mod render;
mod store;
mod theme;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = cli.run() {
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(1);
    }
}
