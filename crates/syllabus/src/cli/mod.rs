pub mod analyze;
pub mod extract;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use syllabus_core::{Category, ExtractorConfig};

#[derive(Parser)]
#[command(
    name = "sylx",
    about = "Extract topics, deadlines and materials from course documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract course entities from plain document text
    Extract {
        /// Text file to read ('-' or omitted for stdin)
        path: Option<PathBuf>,
        /// Restrict to these categories (topics, deadlines, materials)
        #[arg(long, value_delimiter = ',')]
        only: Vec<Category>,
        /// Re-rate topic difficulty after extraction
        #[arg(long)]
        enrich: bool,
        /// Include a course overview in the output
        #[arg(long)]
        overview: bool,
        /// Config file to use instead of the default locations
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Show how each extraction strategy rates a document
    Analyze {
        /// Text file to read ('-' or omitted for stdin)
        path: Option<PathBuf>,
        /// Config file to use instead of the default locations
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    let config = match path {
        Some(path) => ExtractorConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ExtractorConfig::load().context("loading config")?,
    };
    Ok(config)
}

/// Reads the whole document from `path`, or stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
