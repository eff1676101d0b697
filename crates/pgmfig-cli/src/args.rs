//! Command-line argument definitions for the figure renderer.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control where the figures go, in which format,
//! at which resolution, plus configuration file selection and logging
//! verbosity.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// File format of the written figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Command-line arguments for the hierarchical Poisson figure renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory the figures are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output file format
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Raster resolution, overriding the configuration file
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
