//! Chrome DevTools Protocol screenshot renderer
//!
//! Each render launches its own headless Chrome, loads the SVG through a
//! [`PageTemplate`], waits for webfonts to settle and captures the viewport.
//! The browser lives in a [`BrowserSession`] guard, so the child process is
//! torn down on every exit path, including errors halfway through.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, warn};

use crate::page::{PageTemplate, SETTLED_ATTR};
use crate::{Error, Result, Strategy, SvgDocument, SvgRenderer, Viewport};

/// How long to wait for webfonts before capturing
///
/// The wait polls the page until stylesheets have settled, images are decoded
/// and `document.fonts` reports `loaded`, giving up after `timeout_ms`. When
/// the page cannot answer the readiness check the renderer sleeps `fallback_delay_ms`
/// instead. `timeout_ms == 0` skips probing entirely and always sleeps the
/// fallback delay.
///
/// A slow font host can still outlast the timeout, in which case the capture
/// shows fallback fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontWait {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub fallback_delay_ms: u64,
}

impl Default for FontWait {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_interval_ms: 50,
            fallback_delay_ms: 1000,
        }
    }
}

/// What the page reported when checked for readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending,
    Unsupported,
}

/// How a [`FontWait`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The check reported ready
    Ready,
    /// The check never reported ready before the timeout
    TimedOut,
    /// Checking was unavailable; the fixed delay was used
    FixedDelay,
}

impl FontWait {
    /// Block until `check` reports ready, the timeout passes, or checking
    /// turns out to be unavailable.
    pub fn settle<F>(&self, mut check: F) -> Settled
    where
        F: FnMut() -> Result<Readiness>,
    {
        if self.timeout_ms == 0 {
            thread::sleep(Duration::from_millis(self.fallback_delay_ms));
            return Settled::FixedDelay;
        }

        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        loop {
            match check() {
                Ok(Readiness::Ready) => return Settled::Ready,
                Ok(Readiness::Pending) => {}
                Ok(Readiness::Unsupported) => {
                    debug!("page cannot report font state; sleeping {}ms", self.fallback_delay_ms);
                    thread::sleep(Duration::from_millis(self.fallback_delay_ms));
                    return Settled::FixedDelay;
                }
                Err(e) => {
                    warn!("font readiness check failed ({}); sleeping {}ms", e, self.fallback_delay_ms);
                    thread::sleep(Duration::from_millis(self.fallback_delay_ms));
                    return Settled::FixedDelay;
                }
            }

            if Instant::now() >= deadline {
                return Settled::TimedOut;
            }
            thread::sleep(Duration::from_millis(self.poll_interval_ms));
        }
    }
}

/// Configuration for the [`ScreenshotRenderer`]
#[derive(Debug, Clone)]
pub struct ScreenshotConfig {
    pub page: PageTemplate,
    pub font_wait: FontWait,
    /// Chrome/Chromium executable; `None` lets headless_chrome search for one
    pub chrome_path: Option<PathBuf>,
    /// Run Chrome with its sandbox (must be off when running as root)
    pub sandbox: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            page: PageTemplate::default(),
            font_wait: FontWait::default(),
            chrome_path: None,
            sandbox: true,
        }
    }
}

// Evaluated in the page; returns "ready", "pending" or "unsupported".
fn readiness_script() -> String {
    format!(
        r#"(function() {{
            if (!document.fonts) {{ return 'unsupported'; }}
            var links = document.querySelectorAll('link[rel=stylesheet]');
            for (var i = 0; i < links.length; i++) {{
                if (!links[i].hasAttribute('{attr}')) {{ return 'pending'; }}
            }}
            for (var j = 0; j < document.images.length; j++) {{
                if (!document.images[j].complete) {{ return 'pending'; }}
            }}
            return document.fonts.status === 'loaded' ? 'ready' : 'pending';
        }})()"#,
        attr = SETTLED_ATTR
    )
}

/// Page the tab sits on before its document is replaced
const BLANK_PAGE: &str = "about:blank";

fn set_content_command(frame_id: String, html: String) -> Page::SetDocumentContent {
    Page::SetDocumentContent { frame_id, html }
}

/// A launched browser with one open tab.
///
/// Dropping the session closes the tab and the browser process.
pub struct BrowserSession {
    tab: Arc<Tab>,
    // Dropping the browser kills the child process
    _browser: Browser,
}

impl BrowserSession {
    /// Launch a fresh headless browser sized to `viewport` and open a tab
    pub fn launch(config: &ScreenshotConfig, viewport: Viewport) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(config.sandbox)
            .window_size(Some((viewport.width, viewport.height)))
            .path(config.chrome_path.clone())
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;
        debug!("browser launched with a {} window", viewport);

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    /// Open a blank page and replace its document with `html`.
    ///
    /// The markup travels as a DevTools message rather than a URL, so
    /// documents of any size load the same way.
    fn load(&self, html: String) -> Result<()> {
        self.tab
            .navigate_to(BLANK_PAGE)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        let tree = self
            .tab
            .call_method(Page::GetFrameTree(None))
            .map_err(|e| Error::LoadError(format!("Failed to get frame tree: {}", e)))?;
        self.tab
            .call_method(set_content_command(tree.frame_tree.frame.id, html))
            .map_err(|e| Error::LoadError(format!("Failed to set page content: {}", e)))?;
        Ok(())
    }

    fn check_readiness(&self) -> Result<Readiness> {
        let result = self.tab.evaluate(&readiness_script(), false)?;
        Ok(match result.value.as_ref().and_then(|v| v.as_str()) {
            Some("ready") => Readiness::Ready,
            Some("pending") => Readiness::Pending,
            _ => Readiness::Unsupported,
        })
    }

    fn capture(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            debug!("closing tab failed during teardown: {}", e);
        }
        debug!("releasing browser process");
    }
}

/// Renders SVGs through a real browser layout/paint pipeline
pub struct ScreenshotRenderer {
    config: ScreenshotConfig,
}

impl ScreenshotRenderer {
    pub fn new(config: ScreenshotConfig) -> Result<Self> {
        config.page.validate()?;
        Ok(Self { config })
    }
}

impl SvgRenderer for ScreenshotRenderer {
    fn strategy(&self) -> Strategy {
        Strategy::Screenshot
    }

    fn render(&self, svg: &SvgDocument, viewport: Viewport) -> Result<Vec<u8>> {
        let session = BrowserSession::launch(&self.config, viewport)?;

        session.load(self.config.page.document(&svg.data))?;
        debug!("page content injected");

        match self.config.font_wait.settle(|| session.check_readiness()) {
            Settled::Ready => debug!("fonts settled"),
            Settled::FixedDelay => {}
            Settled::TimedOut => warn!(
                "fonts not settled after {}ms; capturing anyway",
                self.config.font_wait.timeout_ms
            ),
        }

        let png = session.capture()?;
        drop(session);
        Ok(png)
    }
}
