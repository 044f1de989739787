//! Render requests and argument validation

use std::path::{Path, PathBuf};

use log::warn;

use crate::{Error, Result, Viewport};

/// Viewport size used by the screenshot renderer when none (or garbage) is given
pub const DEFAULT_SCREENSHOT_SIZE: u32 = 512;

/// Output file used by the screenshot renderer when none is given
pub const DEFAULT_SCREENSHOT_OUTPUT: &str = "screenshot.png";

/// Largest canvas a render may allocate, in pixels (16384 x 16384, 1 GiB of RGBA)
pub const MAX_CANVAS_PIXELS: u64 = 16384 * 16384;

/// Raw SVG bytes together with where they were read from
#[derive(Debug, Clone)]
pub struct SvgDocument {
    pub data: Vec<u8>,
    /// Path the bytes came from; relative resources resolve against its parent
    pub origin: PathBuf,
}

impl SvgDocument {
    /// Read an SVG document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            data,
            origin: path.to_path_buf(),
        })
    }

    /// Wrap in-memory bytes (used by tests and benches)
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            origin: PathBuf::new(),
        }
    }

    /// Directory relative `href`s resolve against, if the origin has one
    pub fn resources_dir(&self) -> Option<PathBuf> {
        let parent = self.origin.parent()?;
        if parent.as_os_str().is_empty() {
            Some(PathBuf::from("."))
        } else {
            Some(parent.to_path_buf())
        }
    }
}

/// One SVG -> PNG conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub source: PathBuf,
    pub viewport: Viewport,
    pub output: PathBuf,
}

impl RenderRequest {
    /// Request for the rasterizer. Both dimensions are validated strictly.
    pub fn rasterize(
        source: impl Into<PathBuf>,
        width: &str,
        height: &str,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        let width = parse_dimension("width", width)?;
        let height = parse_dimension("height", height)?;
        let viewport = Viewport::new(width, height);
        check_canvas(viewport)?;
        Ok(Self {
            source: source.into(),
            viewport,
            output: output.into(),
        })
    }

    /// Request for the screenshot renderer. Width falls back to 512 and the
    /// output to `screenshot.png`.
    pub fn screenshot(source: impl Into<PathBuf>, width: Option<&str>, output: Option<PathBuf>) -> Self {
        let size = parse_dimension_or(width, DEFAULT_SCREENSHOT_SIZE);
        Self {
            source: source.into(),
            viewport: Viewport::square(size),
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_SCREENSHOT_OUTPUT)),
        }
    }
}

/// Parse a positive pixel dimension, rejecting anything else.
pub fn parse_dimension(name: &'static str, text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::InvalidDimension {
            name,
            value: text.to_string(),
        }),
    }
}

/// Reject canvases above [`MAX_CANVAS_PIXELS`] before anything is allocated
pub fn check_canvas(viewport: Viewport) -> Result<()> {
    if u64::from(viewport.width) * u64::from(viewport.height) > MAX_CANVAS_PIXELS {
        return Err(Error::CanvasTooLarge {
            width: viewport.width,
            height: viewport.height,
            max: MAX_CANVAS_PIXELS,
        });
    }
    Ok(())
}

/// Parse a positive pixel dimension, falling back to `default` when the input
/// is missing or unusable.
pub fn parse_dimension_or(text: Option<&str>, default: u32) -> u32 {
    match text {
        None => default,
        Some(raw) => parse_dimension("size", raw).unwrap_or_else(|_| {
            warn!("ignoring invalid size '{}', using {}", raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_dimension_accepts_positive_integers() {
        assert_eq!(parse_dimension("width", "200").unwrap(), 200);
        assert_eq!(parse_dimension("width", " 64 ").unwrap(), 64);
    }

    #[test]
    fn strict_dimension_rejects_garbage() {
        for bad in ["abc", "", "0", "-5", "12.5", "3e2", "100px"] {
            let err = parse_dimension("height", bad).unwrap_err();
            match err {
                Error::InvalidDimension { name, value } => {
                    assert_eq!(name, "height");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {:?}: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn lenient_dimension_falls_back() {
        assert_eq!(parse_dimension_or(None, 512), 512);
        assert_eq!(parse_dimension_or(Some("abc"), 512), 512);
        assert_eq!(parse_dimension_or(Some("0"), 512), 512);
        assert_eq!(parse_dimension_or(Some("-1"), 512), 512);
        assert_eq!(parse_dimension_or(Some("256"), 512), 256);
    }

    #[test]
    fn rasterize_request_validates_before_touching_files() {
        let err = RenderRequest::rasterize("does/not/exist.svg", "abc", "10", "out.png").unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { name: "width", .. }));

        let req = RenderRequest::rasterize("logo.svg", "200", "100", "logo.png").unwrap();
        assert_eq!(req.viewport, Viewport::new(200, 100));
    }

    #[test]
    fn rasterize_request_rejects_oversized_canvas() {
        let err = RenderRequest::rasterize("logo.svg", "50000", "50000", "out.png").unwrap_err();
        match err {
            Error::CanvasTooLarge { width, height, max } => {
                assert_eq!((width, height), (50000, 50000));
                assert_eq!(max, MAX_CANVAS_PIXELS);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // The product matters, not either side alone
        assert!(RenderRequest::rasterize("logo.svg", "16384", "16384", "out.png").is_ok());
        assert!(RenderRequest::rasterize("logo.svg", "1000000", "1", "out.png").is_ok());
        assert!(RenderRequest::rasterize("logo.svg", "16385", "16384", "out.png").is_err());
    }

    #[test]
    fn screenshot_request_defaults() {
        let req = RenderRequest::screenshot("logo.svg", None, None);
        assert_eq!(req.viewport, Viewport::square(512));
        assert_eq!(req.output, PathBuf::from("screenshot.png"));

        let req = RenderRequest::screenshot("logo.svg", Some("256"), Some(PathBuf::from("a.png")));
        assert_eq!(req.viewport, Viewport::square(256));
        assert_eq!(req.output, PathBuf::from("a.png"));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = SvgDocument::load("definitely/missing.svg").unwrap_err();
        match err {
            Error::Io { path, source } => {
                assert_eq!(path, PathBuf::from("definitely/missing.svg"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn resources_dir_for_bare_file_name_is_cwd() {
        let doc = SvgDocument {
            data: Vec::new(),
            origin: PathBuf::from("logo.svg"),
        };
        assert_eq!(doc.resources_dir(), Some(PathBuf::from(".")));
        assert_eq!(SvgDocument::from_bytes(Vec::new()).resources_dir(), None);
    }
}
