//! CLI logic for the hierarchical Poisson figure renderer.
//!
//! This module declares, renders and saves the four figures in turn.

pub mod error_adapter;
pub mod figures;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use pgmfig::{DiagramRenderer, PgmError};

/// Run the figure renderer
///
/// Every figure is built, rendered and written before the next one starts.
/// The first failure aborts the run.
///
/// # Errors
///
/// Returns `PgmError` for:
/// - Configuration loading errors
/// - Invalid figure declarations
/// - Rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), PgmError> {
    info!(
        output_dir = args.output_dir.display().to_string(),
        format = args.format.extension();
        "Rendering figures"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(dpi) = args.dpi {
        app_config = app_config.with_dpi(dpi);
    }

    fs::create_dir_all(&args.output_dir)?;

    let renderer = DiagramRenderer::new(app_config);
    for figure in figures::all() {
        let pgm = figure.build()?;
        let rendering = renderer.render(&pgm)?;

        let path = args
            .output_dir
            .join(format!("{}.{}", figure.name(), args.format.extension()));
        rendering.save(&path)?;

        info!(figure = figure.name(), path = path.display().to_string(); "Figure written");
    }

    Ok(())
}
