//! HTML shell the screenshot renderer loads into the browser.
//!
//! The SVG is never parsed here: its raw bytes are base64-encoded into a
//! `data:image/svg+xml` URI and shown through a single centered `<img>`, so
//! the browser alone decides how it renders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::{Error, Result};

/// Webfont stylesheet requested by default (Space Grotesk 500/700)
pub const DEFAULT_FONT_STYLESHEET: &str =
    "https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@500;700&display=swap";

/// Attribute set on `<link>` elements once their stylesheet loaded or failed
pub const SETTLED_ATTR: &str = "data-settled";

/// Layout of the page the SVG is embedded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    /// External stylesheet to request before capture (`None` skips the fetch)
    pub font_stylesheet: Option<String>,
    /// Maximum share of the viewport width/height the image may take, in percent
    /// (applied as `vw`/`vh`)
    pub fill_percent: u8,
    /// CSS color painted behind the image
    pub background: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self {
            font_stylesheet: Some(DEFAULT_FONT_STYLESHEET.to_string()),
            fill_percent: 90,
            background: "white".to_string(),
        }
    }
}

impl PageTemplate {
    /// Check the template before a browser is launched for it
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.fill_percent) {
            return Err(Error::ConfigError(format!(
                "fill percent must be between 1 and 100, got {}",
                self.fill_percent
            )));
        }
        if self.background.trim().is_empty() || self.background.contains(['<', '>', ';', '{', '}']) {
            return Err(Error::ConfigError(format!(
                "background '{}' is not a CSS color",
                self.background
            )));
        }
        Ok(())
    }

    /// Build the HTML document embedding `svg`
    pub fn document(&self, svg: &[u8]) -> String {
        let font_link = match &self.font_stylesheet {
            Some(href) => format!(
                r#"<link href="{href}" rel="stylesheet" onload="this.setAttribute('{attr}', 'load')" onerror="this.setAttribute('{attr}', 'error')">"#,
                href = escape_attr(href),
                attr = SETTLED_ATTR,
            ),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    {font_link}
    <style>
      body {{ margin: 0; display: flex; justify-content: center; align-items: center;
             min-height: 100vh; background: {background}; }}
      img {{ max-width: {fill}vw; max-height: {fill}vh; }}
    </style>
  </head>
  <body>
    <img src="data:image/svg+xml;base64,{svg}" />
  </body>
</html>
"#,
            font_link = font_link,
            background = self.background,
            fill = self.fill_percent,
            svg = STANDARD.encode(svg),
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
