use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::store::{DirSource, DocumentSource, HttpSource};

#[derive(Parser)]
#[command(name = "deckview")]
#[command(author, version, about)]
#[command(long_about = "A slide presentation viewer.\n\n\
    Point it at a presentation document over HTTP, or at a local deck\n\
    directory with a template.json and one text file per slide.\n\n\
    Examples:\n  \
    deckview http://localhost:5000/presentation   Present a served document\n  \
    deckview ./talk                               Present a local deck directory\n  \
    deckview ./talk --windowed --slide 5          Start windowed on slide 5")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Presentation source: an http(s) URL or a deck directory
    pub source: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.windowed, defaults.start_slide)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            None => {
                if let Some(source) = self.source {
                    let source = make_source(&source)?;
                    let config = Config::load_or_default();
                    let defaults = config.defaults.unwrap_or_default();
                    let windowed = self.windowed || defaults.windowed.unwrap_or(false);
                    let slide = self.slide.or(defaults.start_slide);
                    crate::app::run(source, windowed, slide)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

fn make_source(source: &str) -> anyhow::Result<Box<dyn DocumentSource>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpSource::new(source)))
    } else {
        let path = std::path::PathBuf::from(source);
        if !path.is_dir() {
            anyhow::bail!("Deck directory not found: {}", path.display());
        }
        Ok(Box::new(DirSource::new(path)))
    }
}
