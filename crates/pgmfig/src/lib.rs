//! pgmfig - probabilistic graphical model diagrams.
//!
//! Declare nodes at fixed grid coordinates, connect them with edges, group
//! them in plates, and render the result to SVG and PNG. There is no layout
//! step: every node sits exactly where it was declared.

pub mod config;

mod canvas;
mod error;
mod export;
mod pgm;

pub use pgmfig_core::{color, draw, geometry, markup};

pub use canvas::{Canvas, cm_to_pt};
pub use error::PgmError;
pub use export::Rendering;
pub use pgm::{Edge, LabelPosition, Node, ObservedStyle, Pgm, Plate};

use log::{info, trace};

use config::AppConfig;
use export::{raster, svg::SceneBuilder};

/// Renders [`Pgm`] diagrams with one configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use pgmfig::{DiagramRenderer, Node, Pgm, config::AppConfig};
///
/// let mut pgm = Pgm::new(3.2, 1.65);
/// pgm.add_node(Node::new("F", "$F$", 1.0, 0.75))?;
///
/// let renderer = DiagramRenderer::new(AppConfig::default());
/// let rendering = renderer.render(&pgm)?;
/// rendering.save("figure.png")?;
/// # Ok::<(), pgmfig::PgmError>(())
/// ```
#[derive(Debug, Default)]
pub struct DiagramRenderer {
    config: AppConfig,
}

impl DiagramRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render a diagram to an in-memory SVG scene and raster image.
    ///
    /// # Errors
    ///
    /// - [`PgmError::Config`] if a configured color is invalid.
    /// - [`PgmError::Render`] if the scene cannot be rasterized.
    pub fn render(&self, pgm: &Pgm) -> Result<Rendering, PgmError> {
        let render_config = self.config.render();
        let style = self.config.style();
        let background = render_config
            .background_color()
            .map_err(PgmError::Config)?;

        info!(nodes = pgm.node_count(), edges = pgm.edges().len(), plates = pgm.plate_count(); "Rendering diagram");

        let svg = SceneBuilder::new(style, background)?.build(pgm);
        trace!(svg:%; "SVG scene");

        let dpi = render_config.dpi();
        let pixel_size = pgm.canvas().pixel_size(dpi);
        let pixmap = raster::rasterize(&svg, pixel_size, dpi, background, style.font_family())?;

        info!(width = pixel_size.0, height = pixel_size.1, dpi; "Diagram rendered");
        Ok(Rendering::new(svg, pixmap, dpi))
    }
}
