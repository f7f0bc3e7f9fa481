//! # Dimension Resolution
//!
//! Normalizes order geometry into one canonical outer width/height.
//!
//! ## Two Ways to Describe a Frame
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  A) Outer size given directly        B) Motif + passepartout borders   │
//! │                                                                         │
//! │     ┌───────────────────┐               ┌───────────────────┐          │
//! │     │                   │               │      top          │          │
//! │     │                   │ outer         │   ┌───────────┐   │          │
//! │     │                   │ height        │ l │   motif   │ r │          │
//! │     │                   │               │   └───────────┘   │          │
//! │     └───────────────────┘               │      bottom       │          │
//! │        outer width                      └───────────────────┘          │
//! │                                                                         │
//! │  outer_w = motif_w + left + right    outer_h = motif_h + top + bottom   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Outer dimensions win when both are provided. Otherwise they are derived
//! from the motif and the first passepartout layer's edges.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Border Edges
// =============================================================================

/// Passepartout border widths in millimetres, one set per layer.
///
/// Each edge is optional: `None` means "not entered".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BorderEdges {
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

impl BorderEdges {
    /// Same border on all four sides.
    pub fn uniform(width_mm: f64) -> Self {
        BorderEdges {
            left: Some(width_mm),
            right: Some(width_mm),
            top: Some(width_mm),
            bottom: Some(width_mm),
        }
    }

    /// Creates edges from four explicit values.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        BorderEdges {
            left: Some(left),
            right: Some(right),
            top: Some(top),
            bottom: Some(bottom),
        }
    }

    /// Left + right, unset edges counting as 0.
    pub fn horizontal_mm(&self) -> f64 {
        self.left.unwrap_or(0.0) + self.right.unwrap_or(0.0)
    }

    /// Top + bottom, unset edges counting as 0.
    pub fn vertical_mm(&self) -> f64 {
        self.top.unwrap_or(0.0) + self.bottom.unwrap_or(0.0)
    }

    /// True when at least one edge is a non-zero width.
    ///
    /// Decides whether a passepartout layer exists at all.
    pub fn has_border(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .any(|edge| matches!(edge, Some(v) if *v != 0.0))
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// Resolved outer size of one framed piece, in millimetres. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimension {
    pub outer_width_mm: f64,
    pub outer_height_mm: f64,
}

impl Dimension {
    /// Creates a dimension, clamping negative or non-finite values to 0.
    pub fn new(outer_width_mm: f64, outer_height_mm: f64) -> Self {
        Dimension {
            outer_width_mm: clamp_mm(outer_width_mm),
            outer_height_mm: clamp_mm(outer_height_mm),
        }
    }
}

fn clamp_mm(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Dimension Input
// =============================================================================

/// Raw geometry as entered on the order form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionInput {
    #[serde(default)]
    pub outer_width_mm: Option<f64>,
    #[serde(default)]
    pub outer_height_mm: Option<f64>,
    #[serde(default)]
    pub motif_width_mm: Option<f64>,
    #[serde(default)]
    pub motif_height_mm: Option<f64>,
    /// First passepartout layer; also used to derive the outer size.
    #[serde(default)]
    pub edges: BorderEdges,
}

impl DimensionInput {
    /// Outer size given directly.
    pub fn outer(width_mm: f64, height_mm: f64) -> Self {
        DimensionInput {
            outer_width_mm: Some(width_mm),
            outer_height_mm: Some(height_mm),
            ..DimensionInput::default()
        }
    }

    /// Motif size plus passepartout borders.
    pub fn motif(width_mm: f64, height_mm: f64, edges: BorderEdges) -> Self {
        DimensionInput {
            motif_width_mm: Some(width_mm),
            motif_height_mm: Some(height_mm),
            edges,
            ..DimensionInput::default()
        }
    }

    /// Resolves the canonical outer dimension.
    ///
    /// ## Rules
    /// 1. Both outer values provided → used as-is.
    /// 2. Otherwise → motif + edges of the first passepartout layer
    ///    (missing values count as 0).
    ///
    /// With `zero_is_unset` an outer value of exactly 0 counts as not
    /// provided, which is how historical orders were resolved. Without it a
    /// provided 0 is honoured.
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::dimension::{BorderEdges, DimensionInput};
    ///
    /// let input = DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0));
    /// let dim = input.resolve(false);
    /// assert_eq!(dim.outer_width_mm, 400.0);
    /// assert_eq!(dim.outer_height_mm, 500.0);
    /// ```
    pub fn resolve(&self, zero_is_unset: bool) -> Dimension {
        let provided = |value: Option<f64>| match value {
            Some(v) if zero_is_unset => v != 0.0,
            Some(_) => true,
            None => false,
        };

        if provided(self.outer_width_mm) && provided(self.outer_height_mm) {
            return Dimension::new(
                self.outer_width_mm.unwrap_or(0.0),
                self.outer_height_mm.unwrap_or(0.0),
            );
        }

        Dimension::new(
            self.motif_width_mm.unwrap_or(0.0) + self.edges.horizontal_mm(),
            self.motif_height_mm.unwrap_or(0.0) + self.edges.vertical_mm(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
