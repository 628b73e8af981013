//! Trigger ranges
//!
//! A range says when a binding is "inside" its trigger window, phrased the
//! way designers phrase it: the window opens when the element's top crosses
//! 80% of the viewport height and closes when its bottom crosses 20%. Both
//! ends resolve to scroll offsets once an element rectangle is known.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vela_core::Rect;

use crate::error::BindError;

/// Which edge of the element a trigger point watches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEdge {
    Top,
    Center,
    Bottom,
}

impl TriggerEdge {
    /// Position of this edge within the element as a fraction of its height
    fn coeff(&self) -> f32 {
        match self {
            TriggerEdge::Top => 0.0,
            TriggerEdge::Center => 0.5,
            TriggerEdge::Bottom => 1.0,
        }
    }

    /// Document-space y of this edge for a concrete element rect
    pub fn resolve(&self, element: Rect) -> f32 {
        element.top() + element.height * self.coeff()
    }
}

/// One end of a trigger range: an element edge crossing a viewport line
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerPoint {
    pub edge: TriggerEdge,
    /// The viewport line as a fraction of viewport height
    /// (0.0 = top edge of the viewport, 1.0 = bottom edge)
    pub viewport_fraction: f32,
}

impl TriggerPoint {
    pub const fn new(edge: TriggerEdge, viewport_fraction: f32) -> Self {
        Self {
            edge,
            viewport_fraction,
        }
    }

    /// The scroll offset at which this point fires for a concrete element
    pub fn resolve(&self, element: Rect, viewport_height: f32) -> f32 {
        self.edge.resolve(element) - viewport_height * self.viewport_fraction
    }
}

impl FromStr for TriggerPoint {
    type Err = BindError;

    /// Parse the `"top 80%"` shorthand: an edge name followed by a viewport
    /// percentage
    fn from_str(s: &str) -> Result<Self, BindError> {
        let mut parts = s.split_whitespace();
        let edge = match parts.next() {
            Some("top") => TriggerEdge::Top,
            Some("center") => TriggerEdge::Center,
            Some("bottom") => TriggerEdge::Bottom,
            _ => return Err(BindError::ParseTriggerPoint(s.to_string())),
        };
        let fraction = parts
            .next()
            .and_then(|p| p.strip_suffix('%'))
            .and_then(|p| p.parse::<f32>().ok())
            .map(|p| p / 100.0)
            .ok_or_else(|| BindError::ParseTriggerPoint(s.to_string()))?;
        if parts.next().is_some() {
            return Err(BindError::ParseTriggerPoint(s.to_string()));
        }
        Ok(TriggerPoint::new(edge, fraction))
    }
}

/// A trigger window between two points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub start: TriggerPoint,
    pub end: TriggerPoint,
}

impl RangeSpec {
    pub const fn new(start: TriggerPoint, end: TriggerPoint) -> Self {
        Self { start, end }
    }

    /// The house reveal window: element top crosses 80% of the viewport,
    /// until its bottom crosses 20%
    pub fn reveal() -> Self {
        Self::new(
            TriggerPoint::new(TriggerEdge::Top, 0.8),
            TriggerPoint::new(TriggerEdge::Bottom, 0.2),
        )
    }

    /// Parse both ends from the `"top 80%"` shorthand
    pub fn parse(start: &str, end: &str) -> Result<Self, BindError> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    /// Reject ranges whose end fires at or before their start regardless of
    /// element size
    ///
    /// The end offset minus the start offset is
    /// `element_height * (end_coeff - start_coeff)
    ///  + viewport_height * (start_fraction - end_fraction)`.
    /// When the edge term is non-positive and the fraction term is too, the
    /// window is empty or backwards for every element, which is a
    /// configuration error. Mixed-sign cases depend on sizes and are resolved per
    /// evaluation instead.
    pub fn validate(&self) -> Result<(), BindError> {
        let edge_term = self.end.edge.coeff() - self.start.edge.coeff();
        let fraction_term = self.start.viewport_fraction - self.end.viewport_fraction;
        if edge_term <= 0.0 && fraction_term <= 0.0 {
            return Err(BindError::InvalidRange(format!(
                "{:?} -> {:?}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}
