//! # Pricing Strategies
//!
//! Two interchangeable cost models operating on the same geometry.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    calculate_frame_order_price                          │
//! │                                                                         │
//! │  FrameOrderInput                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DimensionInput::resolve ──► Dimension ──► Geometry::of                 │
//! │                                               │                         │
//! │                      ┌────────────────────────┴──────────┐              │
//! │                      ▼                                   ▼              │
//! │               SimpleStrategy                     StandardStrategy       │
//! │          perimeter × manual price/m       frame, glass, backing,        │
//! │                      │                    passepartout ×2, labour       │
//! │                      └────────────────┬──────────────────┘              │
//! │                                       ▼                                 │
//! │                              UnitBreakdown (one piece, unrounded)       │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                          OrderCostAggregator (quantity, VAT, rounding)  │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                            PriceCalculationResult                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: identical input gives bit-identical output.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::{OrderCostAggregator, PriceCalculationResult};
use crate::dimension::{BorderEdges, DimensionInput};
use crate::geometry::{round_to, standard_frame_length_mm, Geometry};
use crate::money::Money;
use crate::types::{CalculationMethod, MaterialSlot, MaterialSlots, PricingParams, RoundingPolicy};

// =============================================================================
// Input
// =============================================================================

/// Everything needed to price one frame order line.
///
/// Material prices arrive already resolved from the catalog; the engine
/// never looks anything up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrameOrderInput {
    /// Number of identical framed pieces. Values below 1 count as 1.
    pub quantity: u32,
    pub method: CalculationMethod,
    pub dimensions: DimensionInput,
    /// Uniform first-layer border used when no first-layer edge is set.
    #[serde(default)]
    pub passepartout_width_mm: Option<f64>,
    /// Second passepartout layer. Only priced when it has a border.
    #[serde(default)]
    pub second_passepartout_edges: BorderEdges,
    /// Moulding profile width for the miter allowance.
    #[serde(default)]
    pub frame_profile_width_mm: f64,
    /// Price per metre of perimeter for the simple method.
    #[serde(default)]
    pub manual_price_per_meter: Option<Money>,
    #[serde(default)]
    pub materials: MaterialSlots,
}

impl FrameOrderInput {
    /// Edges of the first passepartout layer, falling back to the uniform
    /// width when no edge was entered.
    pub fn first_passepartout_edges(&self) -> Option<BorderEdges> {
        if self.dimensions.edges.has_border() {
            return Some(self.dimensions.edges);
        }
        match self.passepartout_width_mm {
            Some(width) if width > 0.0 => Some(BorderEdges::uniform(width)),
            _ => None,
        }
    }

    /// Quantity normalised to at least one piece.
    #[inline]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }
}

// =============================================================================
// Unit Breakdown
// =============================================================================

/// Consumption and cost of ONE framed piece before quantity, VAT and
/// final rounding.
///
/// Costs are unrounded minor units (öre) so the aggregator decides where
/// rounding happens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitBreakdown {
    pub frame_length_meters: f64,
    pub frame_cost: f64,
    pub glass_area_sqm: f64,
    pub glass_cost: f64,
    pub backing_area_sqm: f64,
    pub backing_cost: f64,
    pub passepartout_area_sqm: f64,
    pub passepartout_cost: f64,
    pub passepartout2_area_sqm: f64,
    pub passepartout2_cost: f64,
    pub labor_cost: f64,
}

// =============================================================================
// Strategies
// =============================================================================

/// A cost model turning geometry and materials into a per-piece breakdown.
pub trait PricingStrategy {
    fn price_unit(
        &self,
        geometry: &Geometry,
        input: &FrameOrderInput,
        rounding: RoundingPolicy,
    ) -> UnitBreakdown;
}

/// Perimeter × one manual price per metre.
///
/// Nothing else is priced, labour included: the manual price is an
/// all-in moulding price.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStrategy;

impl PricingStrategy for SimpleStrategy {
    fn price_unit(
        &self,
        geometry: &Geometry,
        input: &FrameOrderInput,
        rounding: RoundingPolicy,
    ) -> UnitBreakdown {
        let perimeter_m = match rounding {
            RoundingPolicy::PerLine => geometry.perimeter_meters(),
            RoundingPolicy::Legacy => round_to(geometry.perimeter_mm, 2) / 1000.0,
        };
        let price = input.manual_price_per_meter.unwrap_or_default();

        UnitBreakdown {
            frame_length_meters: perimeter_m,
            frame_cost: price.raw_scaled(perimeter_m),
            ..UnitBreakdown::default()
        }
    }
}

/// Itemised material consumption, every slot priced independently.
///
/// | slot          | consumption                                 |
/// |---------------|---------------------------------------------|
/// | frame         | mitered length (m, two decimals)            |
/// | glass/backing | outer area (m²)                             |
/// | passepartout  | board minus window (m²), per layer          |
/// | labour        | same length as the frame, priced per metre  |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStrategy;

impl PricingStrategy for StandardStrategy {
    fn price_unit(
        &self,
        geometry: &Geometry,
        input: &FrameOrderInput,
        rounding: RoundingPolicy,
    ) -> UnitBreakdown {
        let materials = &input.materials;
        let profile = input.frame_profile_width_mm;

        // Length is reported even when no moulding is selected; labour
        // reuses it.
        let mut unit = UnitBreakdown {
            frame_length_meters: geometry.standard_frame_length_meters(profile),
            ..UnitBreakdown::default()
        };

        if let Some(price) = materials.price(MaterialSlot::Frame) {
            unit.frame_cost = match rounding {
                RoundingPolicy::PerLine => price.raw_scaled(unit.frame_length_meters),
                RoundingPolicy::Legacy => {
                    let raw_length_m = standard_frame_length_mm(
                        geometry.dimension.outer_width_mm,
                        geometry.dimension.outer_height_mm,
                        profile,
                    ) / 1000.0;
                    price.scale(raw_length_m).minor() as f64
                }
            };
        }

        if let Some(price) = materials.price(MaterialSlot::Glass) {
            unit.glass_area_sqm = geometry.outer_area_sqm;
            unit.glass_cost = price.raw_scaled(unit.glass_area_sqm);
        }

        if let Some(price) = materials.price(MaterialSlot::Backing) {
            unit.backing_area_sqm = geometry.outer_area_sqm;
            unit.backing_cost = price.raw_scaled(unit.backing_area_sqm);
        }

        if let Some(price) = materials.price(MaterialSlot::Passepartout) {
            if let Some(edges) = input.first_passepartout_edges() {
                unit.passepartout_area_sqm = geometry.passepartout_area_sqm(&edges, rounding);
            }
            unit.passepartout_cost = price.raw_scaled(unit.passepartout_area_sqm);
        }

        if let Some(price) = materials.price(MaterialSlot::Passepartout2) {
            let edges = &input.second_passepartout_edges;
            if edges.has_border() {
                let area = geometry.passepartout_area_sqm(edges, rounding);
                unit.passepartout2_area_sqm = match rounding {
                    RoundingPolicy::PerLine => area,
                    RoundingPolicy::Legacy => round_to(area, 4),
                };
                unit.passepartout2_cost = price.raw_scaled(unit.passepartout2_area_sqm);
            }
        }

        if let Some(price) = materials.price(MaterialSlot::Labor) {
            unit.labor_cost = price.raw_scaled(unit.frame_length_meters);
        }

        unit
    }
}

impl CalculationMethod {
    /// The strategy implementing this method.
    pub fn strategy(&self) -> &'static dyn PricingStrategy {
        match self {
            CalculationMethod::Simple => &SimpleStrategy,
            CalculationMethod::Standard => &StandardStrategy,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Prices one frame order line.
///
/// Never fails: missing dimensions resolve to 0 and missing prices yield
/// zero-cost lines.
///
/// ## Example
/// ```rust
/// use framing_core::dimension::{BorderEdges, DimensionInput};
/// use framing_core::money::Money;
/// use framing_core::pricing::{calculate_frame_order_price, FrameOrderInput};
/// use framing_core::types::{CalculationMethod, PricingParams};
///
/// let input = FrameOrderInput {
///     quantity: 1,
///     method: CalculationMethod::Simple,
///     dimensions: DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0)),
///     manual_price_per_meter: Some(Money::from_major_minor(250, 0)),
///     ..FrameOrderInput::default()
/// };
///
/// let result = calculate_frame_order_price(&input, &PricingParams::default());
/// assert_eq!(result.perimeter_mm, 1800.0);
/// assert_eq!(result.frame_cost.to_string(), "450.00");
/// assert_eq!(result.total_incl_vat.to_string(), "562.50");
/// ```
pub fn calculate_frame_order_price(
    input: &FrameOrderInput,
    params: &PricingParams,
) -> PriceCalculationResult {
    let dimension = input.dimensions.resolve(params.zero_dimension_is_unset);
    let geometry = Geometry::of(dimension);
    let unit = input
        .method
        .strategy()
        .price_unit(&geometry, input, params.rounding);

    OrderCostAggregator::new(input.effective_quantity(), params).aggregate(&geometry, &unit, input)
}

// =============================================================================
// Unit Tests
// =============================================================================
