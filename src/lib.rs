//! svgshot
//!
//! Turns SVG assets into PNG files through one of two rendering strategies:
//!
//! - **Rasterize** (`raster` feature): parses the SVG with resvg and paints it
//!   onto an exact pixel canvas using "contain" fitting over a transparent
//!   background. Fast and deterministic.
//! - **Screenshot** (`cdp` feature): embeds the SVG in a small HTML page,
//!   loads it in headless Chrome and captures the viewport. Slower, but it
//!   matches real browser output (webfonts, CSS centering, anti-aliasing).
//!
//! Both strategies implement [`SvgRenderer`], so argument handling, source
//! loading and output writing are shared through [`render_to_file`].
//!
//! # Example
//!
//! ```no_run
//! use svgshot::{RenderConfig, RenderRequest, Strategy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RenderRequest::rasterize("logo.svg", "200", "200", "logo.png")?;
//! let renderer = Strategy::Rasterize.build(&RenderConfig::default())?;
//! let result = svgshot::render_to_file(renderer.as_ref(), &request)?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;

use log::debug;

pub mod error;
pub use error::{Error, Result};

pub mod fit;
pub mod output;
pub mod page;
pub mod request;

pub use page::PageTemplate;
pub use request::{RenderRequest, SvgDocument};

// resvg-backed direct rasterizer
#[cfg(feature = "raster")]
pub mod raster;

// Headless Chrome screenshot backend
#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly facade over a renderer owned by a worker thread
pub mod async_api;

pub mod cli;

#[cfg(feature = "raster")]
pub use raster::{RasterConfig, Rasterizer};

#[cfg(feature = "cdp")]
pub use cdp::{FontWait, ScreenshotConfig, ScreenshotRenderer};

/// Pixel dimensions of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square viewport, as used by the screenshot renderer
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::square(request::DEFAULT_SCREENSHOT_SIZE)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which rendering pipeline turns the SVG into pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Library-level SVG rasterization (resvg)
    Rasterize,
    /// Browser layout/paint pipeline (headless Chrome)
    Screenshot,
}

impl Strategy {
    /// Construct the renderer for this strategy.
    ///
    /// Fails with [`Error::ConfigError`] when the backing feature was compiled
    /// out, or when the backend rejects its configuration.
    pub fn build(self, config: &RenderConfig) -> Result<Box<dyn SvgRenderer>> {
        match self {
            #[cfg(feature = "raster")]
            Strategy::Rasterize => Ok(Box::new(raster::Rasterizer::new(config.raster.clone())?)),
            #[cfg(feature = "cdp")]
            Strategy::Screenshot => Ok(Box::new(cdp::ScreenshotRenderer::new(
                config.screenshot.clone(),
            )?)),
            #[allow(unreachable_patterns)]
            other => Err(Error::ConfigError(format!(
                "{:?} support was not compiled into this build",
                other
            ))),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Strategy::Rasterize => "Rasterized",
            Strategy::Screenshot => "Captured",
        }
    }
}

/// Configuration for every backend, grouped so one value can build either
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    #[cfg(feature = "raster")]
    pub raster: RasterConfig,
    #[cfg(feature = "cdp")]
    pub screenshot: ScreenshotConfig,
}

/// Outcome of a successful render
///
/// The `Display` impl is the one-line confirmation printed by the CLI.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Size that was asked for
    pub requested: Viewport,
    /// Size read back from the PNG header, if it could be parsed
    pub actual: Option<Viewport>,
    pub bytes_written: usize,
    pub strategy: Strategy,
}

impl fmt::Display for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} ({})",
            self.strategy.verb(),
            self.source.display(),
            self.output.display(),
            self.actual.unwrap_or(self.requested)
        )
    }
}

/// Capability shared by both rendering strategies: SVG bytes in, PNG bytes out.
pub trait SvgRenderer {
    /// The strategy this renderer implements
    fn strategy(&self) -> Strategy;

    /// Render `svg` into a PNG sized for `viewport`
    fn render(&self, svg: &SvgDocument, viewport: Viewport) -> Result<Vec<u8>>;
}

/// Load the request's source, render it and write the PNG atomically.
///
/// The source is read before the renderer does any work, so an unreadable
/// input never launches a browser or allocates a canvas.
pub fn render_to_file(renderer: &dyn SvgRenderer, request: &RenderRequest) -> Result<RenderResult> {
    let svg = SvgDocument::load(&request.source)?;
    debug!(
        "rendering {} ({} bytes) at {} via {:?}",
        request.source.display(),
        svg.data.len(),
        request.viewport,
        renderer.strategy()
    );

    let png = renderer.render(&svg, request.viewport)?;
    output::write_atomic(&request.output, &png)?;

    Ok(RenderResult {
        source: request.source.clone(),
        output: request.output.clone(),
        requested: request.viewport,
        actual: output::png_dimensions(&png),
        bytes_written: png.len(),
        strategy: renderer.strategy(),
    })
}
