//! Crop geometry
//!
//! The crop region is a fixed set of margins applied to every page relative
//! to that page's own dimensions. The left and bottom edges are absolute
//! offsets from the page origin; the right and top edges are insets from the
//! page's width and height.

/// Fixed crop margins, in page-space units (points).
///
/// These are configuration constants, not request parameters. A page smaller
/// than the insets produces a degenerate (inverted) rectangle; that is
/// accepted and written as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct CropMargins {
    /// Left edge of the crop region, offset from the page origin.
    pub left: f64,
    /// Bottom edge of the crop region, offset from the page origin.
    pub bottom: f64,
    /// Inset of the right edge from the page width.
    pub right_inset: f64,
    /// Inset of the top edge from the page height.
    pub top_inset: f64,
}

impl Default for CropMargins {
    fn default() -> Self {
        CropMargins {
            left: 67.0,
            bottom: 555.0,
            right_inset: 332.0,
            top_inset: 630.0,
        }
    }
}

/// A computed crop rectangle: `[left, bottom, right, top]` in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl CropMargins {
    /// Compute the crop rectangle for a page of the given dimensions.
    pub fn rect_for(&self, width: f64, height: f64) -> CropRect {
        CropRect {
            left: self.left,
            bottom: self.bottom,
            right: width - self.right_inset,
            top: height - self.top_inset,
        }
    }
}
