//! Direct rasterization with resvg
//!
//! The SVG is parsed into a usvg tree, fitted into the canvas with
//! [`contain`](crate::fit::contain) and painted onto a transparent pixmap.

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::fit::{self, contain};
use crate::request::check_canvas;
use crate::{Error, Result, Strategy, SvgDocument, SvgRenderer, Viewport};

/// Configuration for the [`Rasterizer`]
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Make installed system fonts available to `<text>` elements
    pub load_system_fonts: bool,
    /// Extra font files to register (TTF/OTF/TTC)
    pub font_files: Vec<PathBuf>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_files: Vec::new(),
        }
    }
}

/// resvg-backed renderer producing exact-size PNGs
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl Rasterizer {
    /// Build a rasterizer, loading its font database once up front
    pub fn new(config: RasterConfig) -> Result<Self> {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for path in &config.font_files {
            db.load_font_file(path).map_err(|e| {
                Error::ConfigError(format!("Failed to load font {}: {}", path.display(), e))
            })?;
        }
        debug!("rasterizer font database holds {} faces", db.len());

        Ok(Self { fontdb: Arc::new(db) })
    }

    fn parse(&self, svg: &SvgDocument) -> Result<usvg::Tree> {
        let mut opt = usvg::Options::default();
        opt.resources_dir = svg.resources_dir();
        opt.fontdb = Arc::clone(&self.fontdb);

        usvg::Tree::from_data(&svg.data, &opt).map_err(|e| Error::ParseError(e.to_string()))
    }

    /// Render into a pixmap of exactly `viewport` pixels
    pub fn render_pixmap(&self, svg: &SvgDocument, viewport: Viewport) -> Result<Pixmap> {
        check_canvas(viewport)?;
        let tree = self.parse(svg)?;

        let size = tree.size();
        let source = (size.width(), size.height());
        if !fit::is_usable(source) {
            return Err(Error::ParseError(format!(
                "document has no usable size ({}x{})",
                source.0, source.1
            )));
        }

        let placement = contain(source, viewport);
        let (sx, sy) = placement.scale_for(source);
        debug!("placing {}x{} document at {:?} on {}", source.0, source.1, placement, viewport);

        // Freshly allocated pixmaps are transparent black, which is the letterbox color
        let mut pixmap = Pixmap::new(viewport.width, viewport.height).ok_or_else(|| {
            Error::RenderError(format!("Cannot allocate a {} canvas", viewport))
        })?;

        let transform = Transform::from_row(sx, 0.0, 0.0, sy, placement.x as f32, placement.y as f32);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl SvgRenderer for Rasterizer {
    fn strategy(&self) -> Strategy {
        Strategy::Rasterize
    }

    fn render(&self, svg: &SvgDocument, viewport: Viewport) -> Result<Vec<u8>> {
        let pixmap = self.render_pixmap(svg, viewport)?;
        pixmap.encode_png().map_err(|e| Error::EncodeError(e.to_string()))
    }
}
