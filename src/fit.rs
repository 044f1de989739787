//! Pure "contain" fit geometry.
//!
//! Nothing here touches pixels or files, so every case is unit testable.

use crate::Viewport;

/// Where the scaled source lands on the canvas, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Per-axis scale factors mapping `source` onto this placement.
    ///
    /// The two factors differ by at most the rounding of the placed size.
    pub fn scale_for(&self, source: (f32, f32)) -> (f32, f32) {
        (self.width as f32 / source.0, self.height as f32 / source.1)
    }

    /// True when the placement covers the whole canvas
    pub fn fills(&self, canvas: Viewport) -> bool {
        self.x == 0 && self.y == 0 && self.width == canvas.width && self.height == canvas.height
    }
}

/// Scale `source` to the largest size that fits entirely inside `canvas`
/// while keeping its aspect ratio, centered.
///
/// The larger relative dimension matches the canvas exactly; the other axis
/// is padded equally on both sides (the extra pixel of an odd margin goes to
/// the far side).
///
/// # Examples
/// ```
/// # use svgshot::{fit::contain, Viewport};
/// // 100x50 into a 200x200 square: letterboxed vertically
/// let p = contain((100.0, 50.0), Viewport::new(200, 200));
/// assert_eq!((p.x, p.y, p.width, p.height), (0, 50, 200, 100));
/// ```
pub fn contain(source: (f32, f32), canvas: Viewport) -> Placement {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let (cw, ch) = (canvas.width as f64, canvas.height as f64);

    let scale = (cw / src_w).min(ch / src_h);

    let width = ((src_w * scale).round() as u32).clamp(1, canvas.width.max(1));
    let height = ((src_h * scale).round() as u32).clamp(1, canvas.height.max(1));

    Placement {
        x: (canvas.width - width) / 2,
        y: (canvas.height - height) / 2,
        width,
        height,
    }
}

/// Whether `source` is a size `contain` can work with
pub fn is_usable(source: (f32, f32)) -> bool {
    source.0.is_finite() && source.1.is_finite() && source.0 > 0.0 && source.1 > 0.0
}
