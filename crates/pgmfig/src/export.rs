//! Turning a validated diagram into pixels and files.
//!
//! [`svg::SceneBuilder`] draws the vector scene, [`raster`] turns it into a
//! pixmap and PNG bytes, and [`Rendering`] keeps both until they are saved.

pub mod raster;
pub mod svg;

use std::{fs, path::Path};

use log::info;
use tiny_skia::Pixmap;

use crate::error::PgmError;

/// A rendered diagram, held in memory until saved.
#[derive(Debug, Clone)]
pub struct Rendering {
    svg: String,
    pixmap: Pixmap,
    dpi: u32,
}

impl Rendering {
    pub(crate) fn new(svg: String, pixmap: Pixmap, dpi: u32) -> Self {
        Self { svg, pixmap, dpi }
    }

    /// Returns the SVG scene.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Returns the raster image.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Encodes the raster image as PNG.
    ///
    /// # Errors
    ///
    /// [`PgmError::Export`] if encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>, PgmError> {
        raster::encode_png(&self.pixmap, self.dpi)
    }

    /// Writes the rendering to `path`.
    ///
    /// A `.svg` extension (any case) writes the vector scene; anything else
    /// writes a PNG.
    ///
    /// # Errors
    ///
    /// [`PgmError::Io`] if the file cannot be written, [`PgmError::Export`]
    /// if PNG encoding fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PgmError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("svg"));

        if is_svg {
            fs::write(path, &self.svg)?;
        } else {
            fs::write(path, self.to_png()?)?;
        }

        info!(path:? = path, svg = is_svg, width = self.width(), height = self.height(); "Diagram saved");
        Ok(())
    }
}
