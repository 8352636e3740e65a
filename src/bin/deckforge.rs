//! Command-line front end for deckforge.
//!
//! # Usage
//!
//! Merge generator output into a deck:
//! ```sh
//! deckforge merge --deck deck.json --edits response.txt -o next.json
//! ```
//!
//! Render a deck with images for slides 2 and 4:
//! ```sh
//! deckforge render --deck deck.json -o deck.pptx --theme ocean \
//!     --image 2=img/rocket.png --image 4=img/chart.jpg
//! ```
//!
//! List themes:
//! ```sh
//! deckforge themes
//! ```
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use deckforge::{Deck, DeckConfig, DeckRenderer, EditSet, Error, Result, merge, theme};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Merge, version and render slide decks
#[derive(Parser, Debug)]
#[command(name = "deckforge", version, about)]
struct Cli {
    /// TOML configuration file (defaults plus environment overrides otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply an edit set to a deck and print the renumbered result as JSON
    Merge {
        /// Current deck (JSON array of slide records)
        #[arg(long, value_name = "FILE")]
        deck: PathBuf,

        /// Edit set: raw generator output containing a JSON array or object
        #[arg(long, value_name = "FILE")]
        edits: PathBuf,

        /// Write the merged deck here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a deck to a .pptx file
    Render {
        /// Deck to render (JSON array of slide records)
        #[arg(long, value_name = "FILE")]
        deck: PathBuf,

        /// Output .pptx path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Theme name; unknown names fall back to the default theme
        #[arg(long, default_value = "")]
        theme: String,

        /// Image for a slide, as SLIDE_NUMBER=PATH (repeatable)
        #[arg(long = "image", value_name = "N=PATH", value_parser = parse_image_arg)]
        images: Vec<(u32, PathBuf)>,
    },

    /// List available themes
    Themes,
}

fn parse_image_arg(raw: &str) -> std::result::Result<(u32, PathBuf), String> {
    let (number, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SLIDE_NUMBER=PATH, got {raw:?}"))?;
    let number: u32 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid slide number {number:?}"))?;
    if path.is_empty() {
        return Err("image path is empty".to_string());
    }
    Ok((number, PathBuf::from(path)))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.log_format) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DeckConfig::from_file(path)?,
        None => DeckConfig::from_env()?,
    };

    match cli.command {
        Command::Merge { deck, edits, output } => {
            let existing = read_deck(&deck)?;
            let raw = fs::read_to_string(&edits)?;
            let edit_set = EditSet::from_generated_text(&raw)?;
            let merged = merge(&existing, &edit_set);
            info!(before = existing.len(), after = merged.len(), "deck merged");

            let json = serde_json::to_string_pretty(&merged).map_err(|e| Error::Io(e.into()))?;
            match output {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }
        },
        Command::Render {
            deck,
            output,
            theme,
            images,
        } => {
            let deck = read_deck(&deck)?;
            let image_paths: HashMap<u32, PathBuf> = images.into_iter().collect();
            DeckRenderer::from_config(&config).render_to_file(&deck, &image_paths, &theme, &output)?;
            info!(path = %output.display(), "presentation written");
        },
        Command::Themes => {
            for name in theme::available_themes() {
                if *name == config.default_theme {
                    println!("{name} (default)");
                } else {
                    println!("{name}");
                }
            }
        },
    }
    Ok(())
}

fn read_deck(path: &Path) -> Result<Deck> {
    Deck::from_json(&fs::read_to_string(path)?)
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| Error::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| Error::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
