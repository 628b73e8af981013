//! Host element abstraction
//!
//! Vela never holds host element objects directly. The host hands each bound
//! element a stable [`ElementKey`] and a bounding-box source; once the element
//! leaves the visible tree the source reports `None` and every operation on it
//! degrades to a silent no-op.

use crate::geometry::Rect;

/// Host-assigned stable identity for a bound element
///
/// Keys must be unique among live elements and must not be reused while any
/// binding for the old element is still registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub u64);

impl ElementKey {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Bounding-box source for a host element
///
/// `bounds()` returns the element rectangle in document coordinates (i.e.
/// unaffected by the current scroll offset), or `None` once the element has
/// been removed from the visible tree.
pub trait ElementBounds: Send {
    fn key(&self) -> ElementKey;
    fn bounds(&self) -> Option<Rect>;
}

/// Current viewport state, sampled by the host on scroll/resize
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Document offset of the viewport top
    pub scroll_y: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, scroll_y: f32) -> Self {
        Self {
            width,
            height,
            scroll_y,
        }
    }

    /// Convert a document-space y coordinate to viewport space
    pub fn document_to_viewport(&self, document_y: f32) -> f32 {
        document_y - self.scroll_y
    }

    /// The document-space y coordinate currently at `fraction` of the
    /// viewport height (0.0 = top edge, 1.0 = bottom edge)
    pub fn line_at(&self, fraction: f32) -> f32 {
        self.scroll_y + self.height * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_lines() {
        let vp = Viewport::new(1280.0, 800.0, 400.0);
        assert_eq!(vp.line_at(0.0), 400.0);
        assert_eq!(vp.line_at(1.0), 1200.0);
        assert_eq!(vp.line_at(0.8), 1040.0);
        assert_eq!(vp.document_to_viewport(1000.0), 600.0);
    }
}
