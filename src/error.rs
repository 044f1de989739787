//! Error types for the SVG renderers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning an SVG into a PNG
#[derive(Error, Debug)]
pub enum Error {
    /// A dimension argument was not a positive integer
    #[error("Invalid {name} '{value}': expected a positive integer")]
    InvalidDimension { name: &'static str, value: String },

    /// The requested canvas holds more pixels than a render may allocate
    #[error("Canvas {width}x{height} exceeds the limit of {max} pixels")]
    CanvasTooLarge { width: u32, height: u32, max: u64 },

    /// Reading the source or writing the output failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document is not a usable SVG
    #[error("Failed to parse SVG: {0}")]
    ParseError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to launch the browser or open a page
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    /// Failed to inject the page content
    #[error("Failed to load page content: {0}")]
    LoadError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the rendered pixels
    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}
