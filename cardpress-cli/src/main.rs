//! Cardpress — card deck build CLI.
//!
//! # Usage
//!
//! ```text
//! cardpress build [--dry-run] [--force] [--no-render] [--no-manifest]
//!                 [--dpi <n>] [--inkscape <path>] [--memory-budget <mib>]
//!                 [--save-name <name>]
//! cardpress check [--json]
//! cardpress diff
//! ```
//!
//! Every command takes `--data <csv>`, `--templates <dir>`, `--output <dir>`
//! and `--config <path>`. Unset flags fall back to `cardpress.yaml` in the
//! working directory, then to the conventional `deck.csv` / `templates` /
//! `build` layout.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cardpress_build::BuildPaths;
use cardpress_core::{load_config, load_config_if_present, DeckConfig, CONFIG_FILE};

use commands::{build::BuildArgs, check::CheckArgs, diff::DiffArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cardpress",
    version,
    about = "Build print-ready cards from SVG templates and a deck list",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bind, toggle and write every card, then rasterize and emit the
    /// deck manifest.
    Build(BuildArgs),

    /// Report each row's buildability without writing anything.
    Check(CheckArgs),

    /// Show unified diffs of what a build would change.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Shared deck arguments — flags first, then config file, then conventions
// ---------------------------------------------------------------------------

/// Path arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct DeckArgs {
    /// Config file (default: `cardpress.yaml` in the working directory,
    /// when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deck list CSV.
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Directory holding `<Template>.svg` files.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Directory receiving cards, PNGs and the manifest.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl DeckArgs {
    /// Load the config and settle the three deck paths.
    pub fn resolve(&self) -> Result<(DeckConfig, BuildPaths)> {
        let config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("cannot load config '{}'", path.display()))?,
            None => load_config_if_present(Path::new(CONFIG_FILE))
                .with_context(|| format!("cannot load '{CONFIG_FILE}'"))?,
        };

        let paths = BuildPaths {
            data: self
                .data
                .clone()
                .or_else(|| config.data.clone())
                .unwrap_or_else(|| PathBuf::from("deck.csv")),
            templates: self
                .templates
                .clone()
                .or_else(|| config.templates.clone())
                .unwrap_or_else(|| PathBuf::from("templates")),
            output: self
                .output
                .clone()
                .or_else(|| config.output.clone())
                .unwrap_or_else(|| PathBuf::from("build")),
        };
        Ok((config, paths))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
