//! # Geometry
//!
//! Pure functions deriving material consumption from resolved dimensions.
//!
//! ## Units
//! Inputs are millimetres. Lengths come out in millimetres or metres,
//! areas in square metres.
//!
//! ## Mitered Frame Length
//! ```text
//!   ╲───────────────────────╱   Each leg is cut at 45°, so its long edge
//!    ╲                     ╱    is the inner size plus one profile width
//!     ╲___________________╱     at each end.
//!
//!   total = 2·(w + 2·profile) + 2·(h + 2·profile)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dimension::{BorderEdges, Dimension};
use crate::types::RoundingPolicy;

/// Rounds `value` half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Perimeter in millimetres: `2·(w + h)`.
#[inline]
pub fn perimeter_mm(width_mm: f64, height_mm: f64) -> f64 {
    2.0 * (width_mm + height_mm)
}

/// Outer area in square metres.
#[inline]
pub fn outer_area_sqm(width_mm: f64, height_mm: f64) -> f64 {
    (width_mm / 1000.0) * (height_mm / 1000.0)
}

/// Passepartout material consumption in square metres: the outer area
/// minus the window cut out by the edges.
///
/// An axis whose edges add up to more than the outer size has no window
/// on that axis, so the board is fully covered. Never negative.
///
/// ## Example
/// ```rust
/// use framing_core::dimension::BorderEdges;
/// use framing_core::geometry::passepartout_area_sqm;
///
/// // 400×500 outer, 50 mm all round → 300×400 window
/// let area = passepartout_area_sqm(400.0, 500.0, &BorderEdges::uniform(50.0));
/// assert!((area - 0.08).abs() < 1e-12);
/// ```
pub fn passepartout_area_sqm(
    outer_width_mm: f64,
    outer_height_mm: f64,
    edges: &BorderEdges,
) -> f64 {
    let inner = outer_area_sqm(
        (outer_width_mm - edges.horizontal_mm()).max(0.0),
        (outer_height_mm - edges.vertical_mm()).max(0.0),
    );
    (outer_area_sqm(outer_width_mm, outer_height_mm) - inner).max(0.0)
}

/// Passepartout area as historical invoices computed it: the window is
/// `outer - edges` per axis taken as-is, only the result is clamped.
///
/// Identical to [`passepartout_area_sqm`] while the edges fit the board.
/// Edges wider than the board give a negative window side, e.g. 0.09 m²
/// instead of 0.06 m² for 150 + 150 mm edges on a 200×300 board.
pub fn legacy_passepartout_area_sqm(
    outer_width_mm: f64,
    outer_height_mm: f64,
    edges: &BorderEdges,
) -> f64 {
    let inner = outer_area_sqm(
        outer_width_mm - edges.horizontal_mm(),
        outer_height_mm - edges.vertical_mm(),
    );
    (outer_area_sqm(outer_width_mm, outer_height_mm) - inner).max(0.0)
}

/// Moulding length in millimetres including miter allowance, unrounded.
pub fn standard_frame_length_mm(width_mm: f64, height_mm: f64, profile_width_mm: f64) -> f64 {
    let horizontal = 2.0 * (width_mm + 2.0 * profile_width_mm);
    let vertical = 2.0 * (height_mm + 2.0 * profile_width_mm);
    horizontal + vertical
}

/// Moulding length in metres including miter allowance, rounded to two
/// decimals (whole centimetres).
pub fn standard_frame_length_meters(width_mm: f64, height_mm: f64, profile_width_mm: f64) -> f64 {
    round_to(
        standard_frame_length_mm(width_mm, height_mm, profile_width_mm) / 1000.0,
        2,
    )
}

// =============================================================================
// Geometry Bundle
// =============================================================================

/// Per-unit geometry of one framed piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Geometry {
    pub dimension: Dimension,
    pub perimeter_mm: f64,
    pub outer_area_sqm: f64,
}

impl Geometry {
    /// Computes perimeter and area for a resolved dimension.
    pub fn of(dimension: Dimension) -> Self {
        Geometry {
            dimension,
            perimeter_mm: perimeter_mm(dimension.outer_width_mm, dimension.outer_height_mm),
            outer_area_sqm: outer_area_sqm(dimension.outer_width_mm, dimension.outer_height_mm),
        }
    }

    /// Perimeter in metres.
    #[inline]
    pub fn perimeter_meters(&self) -> f64 {
        self.perimeter_mm / 1000.0
    }

    /// Passepartout area for one layer of `edges` on this piece.
    pub fn passepartout_area_sqm(&self, edges: &BorderEdges, rounding: RoundingPolicy) -> f64 {
        let (w, h) = (self.dimension.outer_width_mm, self.dimension.outer_height_mm);
        match rounding {
            RoundingPolicy::PerLine => passepartout_area_sqm(w, h, edges),
            RoundingPolicy::Legacy => legacy_passepartout_area_sqm(w, h, edges),
        }
    }

    /// Mitered moulding length in metres (two decimals).
    pub fn standard_frame_length_meters(&self, profile_width_mm: f64) -> f64 {
        standard_frame_length_meters(
            self.dimension.outer_width_mm,
            self.dimension.outer_height_mm,
            profile_width_mm,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_perimeter() {
        assert_eq!(perimeter_mm(400.0, 500.0), 1800.0);
        assert_eq!(perimeter_mm(0.0, 0.0), 0.0);
        for (w, h) in [(1.0, 2.0), (123.4, 567.8), (1000.0, 0.0)] {
            assert!((perimeter_mm(w, h) - 2.0 * (w + h)).abs() < EPS);
        }
    }

    #[test]
    fn test_outer_area() {
        assert!((outer_area_sqm(400.0, 500.0) - 0.2).abs() < EPS);
        assert!((outer_area_sqm(1000.0, 1000.0) - 1.0).abs() < EPS);
        assert_eq!(outer_area_sqm(0.0, 700.0), 0.0);
    }

    #[test]
    fn test_passepartout_area_uneven_edges() {
        // 380×520 outer, window 300×400
        let edges = BorderEdges::new(40.0, 40.0, 50.0, 70.0);
        let area = passepartout_area_sqm(380.0, 520.0, &edges);
        assert!((area - (0.1976 - 0.12)).abs() < EPS);
    }

    #[test]
    fn test_passepartout_area_clamps_when_edges_exceed_outer() {
        // 300 mm of horizontal edges on a 200 mm wide board: no window
        // width, so the passepartout covers the whole 0.06 m² board.
        let edges = BorderEdges::new(150.0, 150.0, 0.0, 0.0);
        let area = passepartout_area_sqm(200.0, 300.0, &edges);
        assert!((area - 0.06).abs() < EPS);

        // Both axes exceeded
        let area = passepartout_area_sqm(200.0, 200.0, &BorderEdges::uniform(1000.0));
        assert!((area - 0.04).abs() < EPS);
    }

    #[test]
    fn test_legacy_passepartout_area_keeps_negative_window() {
        // Window -100×300: 0.06 - (-0.03) = 0.09
        let edges = BorderEdges::new(150.0, 150.0, 0.0, 0.0);
        let area = legacy_passepartout_area_sqm(200.0, 300.0, &edges);
        assert!((area - 0.09).abs() < EPS);

        // Window -1800×-1800 is larger than the board
        let area = legacy_passepartout_area_sqm(200.0, 200.0, &BorderEdges::uniform(1000.0));
        assert_eq!(area, 0.0);

        // Same as the default while the edges fit
        let edges = BorderEdges::new(40.0, 40.0, 50.0, 70.0);
        assert_eq!(
            legacy_passepartout_area_sqm(380.0, 520.0, &edges),
            passepartout_area_sqm(380.0, 520.0, &edges)
        );
    }

    #[test]
    fn test_geometry_picks_area_by_policy() {
        let geometry = Geometry::of(Dimension::new(200.0, 300.0));
        let edges = BorderEdges::new(150.0, 150.0, 0.0, 0.0);
        assert!((geometry.passepartout_area_sqm(&edges, RoundingPolicy::PerLine) - 0.06).abs() < EPS);
        assert!((geometry.passepartout_area_sqm(&edges, RoundingPolicy::Legacy) - 0.09).abs() < EPS);
    }

    #[test]
    fn test_passepartout_area_never_negative() {
        // Negative edge widths would enlarge the window beyond the board.
        let edges = BorderEdges::new(-50.0, -50.0, -50.0, -50.0);
        assert_eq!(passepartout_area_sqm(400.0, 500.0, &edges), 0.0);
        assert_eq!(passepartout_area_sqm(0.0, 0.0, &BorderEdges::default()), 0.0);
    }

    #[test]
    fn test_standard_frame_length() {
        // No profile: plain perimeter
        assert_eq!(standard_frame_length_meters(400.0, 500.0, 0.0), 1.8);
        // 20 mm profile adds 8 × 20 mm = 160 mm
        assert_eq!(standard_frame_length_meters(400.0, 500.0, 20.0), 1.96);
        // rounded to whole centimetres
        assert_eq!(standard_frame_length_meters(401.0, 500.0, 0.0), 1.8);
        assert_eq!(standard_frame_length_meters(403.0, 500.0, 0.0), 1.81);
        assert!((standard_frame_length_mm(403.0, 500.0, 0.0) - 1806.0).abs() < EPS);
    }

    #[test]
    fn test_geometry_bundle() {
        let geo = Geometry::of(Dimension::new(400.0, 500.0));
        assert_eq!(geo.perimeter_mm, 1800.0);
        assert!((geo.outer_area_sqm - 0.2).abs() < EPS);
        assert!((geo.perimeter_meters() - 1.8).abs() < EPS);
        assert!((geo.passepartout_area_sqm(&BorderEdges::uniform(50.0), RoundingPolicy::PerLine) - 0.08).abs() < EPS);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(562.5, 2), 562.5);
    }
}
