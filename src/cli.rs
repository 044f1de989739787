//! Command-line front ends shared by the `svg-rasterize` and `svg-screenshot`
//! binaries.
//!
//! Both binaries parse positional arguments into a [`RenderRequest`], apply any
//! optional flags on top of [`RenderConfig::default`], and hand the request to a
//! [`RenderWorker`].

use std::path::PathBuf;

use clap::Parser;

use crate::async_api::RenderWorker;
use crate::{RenderConfig, RenderRequest, RenderResult, Result, Strategy};

/// Initialize `env_logger`; `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Rasterize an SVG into an exact-size PNG with a transparent letterbox
#[derive(Parser, Debug)]
#[command(name = "svg-rasterize", version)]
pub struct RasterizeArgs {
    /// SVG file to render
    pub source: PathBuf,
    /// Output width in pixels
    #[arg(allow_negative_numbers = true)]
    pub width: String,
    /// Output height in pixels
    #[arg(allow_negative_numbers = true)]
    pub height: String,
    /// PNG file to write (overwritten if present)
    pub output: PathBuf,
    /// Do not load installed system fonts for <text> elements
    #[arg(long)]
    pub no_system_fonts: bool,
    /// Extra font file to make available (repeatable)
    #[arg(long = "font", value_name = "FILE")]
    pub fonts: Vec<PathBuf>,
}

#[cfg(feature = "raster")]
impl RasterizeArgs {
    pub fn request(&self) -> Result<RenderRequest> {
        RenderRequest::rasterize(&self.source, &self.width, &self.height, &self.output)
    }

    pub fn config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        config.raster.load_system_fonts = !self.no_system_fonts;
        config.raster.font_files = self.fonts.clone();
        config
    }
}

/// Render an SVG through headless Chrome and save a PNG screenshot
#[derive(Parser, Debug)]
#[command(name = "svg-screenshot", version)]
pub struct ScreenshotArgs {
    /// SVG file to render
    pub source: PathBuf,
    /// Square viewport size in pixels (invalid or missing values use 512)
    #[arg(allow_negative_numbers = true)]
    pub width: Option<String>,
    /// PNG file to write (defaults to screenshot.png)
    pub output: Option<PathBuf>,
    /// Largest share of the viewport the image may fill, in percent
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub fill_percent: u8,
    /// Webfont stylesheet to load before capturing
    #[arg(long, value_name = "URL", conflicts_with = "no_webfont")]
    pub font_stylesheet: Option<String>,
    /// Skip the webfont stylesheet entirely
    #[arg(long)]
    pub no_webfont: bool,
    /// Page background color (any CSS color)
    #[arg(long, default_value = "white")]
    pub background: String,
    /// Upper bound on waiting for webfonts; 0 always uses the fixed delay
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    pub font_timeout_ms: u64,
    /// Fixed delay used when the page cannot report font readiness
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub settle_ms: u64,
    /// Chrome/Chromium executable to launch
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,
    /// Disable the Chrome sandbox (needed when running as root)
    #[arg(long)]
    pub no_sandbox: bool,
}

#[cfg(feature = "cdp")]
impl ScreenshotArgs {
    pub fn request(&self) -> RenderRequest {
        RenderRequest::screenshot(&self.source, self.width.as_deref(), self.output.clone())
    }

    pub fn config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        let shot = &mut config.screenshot;
        shot.page.fill_percent = self.fill_percent;
        shot.page.background = self.background.clone();
        if self.no_webfont {
            shot.page.font_stylesheet = None;
        } else if let Some(url) = &self.font_stylesheet {
            shot.page.font_stylesheet = Some(url.clone());
        }
        shot.font_wait.timeout_ms = self.font_timeout_ms;
        shot.font_wait.fallback_delay_ms = self.settle_ms;
        shot.chrome_path = self.chrome.clone();
        shot.sandbox = !self.no_sandbox;
        config
    }
}

/// Run one rasterization. Dimensions are validated before anything else.
#[cfg(feature = "raster")]
pub async fn rasterize(args: RasterizeArgs) -> Result<RenderResult> {
    let request = args.request()?;
    run(Strategy::Rasterize, args.config(), request).await
}

/// Run one screenshot render. The source is read before any browser is launched.
#[cfg(feature = "cdp")]
pub async fn screenshot(args: ScreenshotArgs) -> Result<RenderResult> {
    let request = args.request();
    let result = run(Strategy::Screenshot, args.config(), request).await?;
    log::info!("{} ({} bytes)", result, result.bytes_written);
    Ok(result)
}

async fn run(strategy: Strategy, config: RenderConfig, request: RenderRequest) -> Result<RenderResult> {
    let worker = RenderWorker::spawn(strategy, config).await?;
    let result = worker.render(request).await;
    worker.close().await?;
    result
}
