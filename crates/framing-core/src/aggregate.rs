//! # Order Cost Aggregation
//!
//! Turns a per-piece [`UnitBreakdown`] into the final, quantity-scaled and
//! VAT-inclusive [`PriceCalculationResult`].
//!
//! ## Rounding Disciplines
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PerLine (default)                                                      │
//! │    cost_i  = round_öre(unit_cost_i) × quantity                          │
//! │    excl    = Σ cost_i                      (exact, no drift)            │
//! │    vat     = round_öre(excl × rate)                                     │
//! │    incl    = excl + vat                                                 │
//! │                                                                         │
//! │  Legacy                                                                 │
//! │    cost_i  = round_öre(unit_cost_i × quantity)                          │
//! │    excl    = round_öre(Σ unit_cost_i × quantity)                        │
//! │    incl    = round_öre(Σ unit_cost_i × quantity × (1 + rate))           │
//! │    vat     = incl − excl                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Under `Legacy` the reported lines can differ from the total by an öre,
//! exactly as on historical invoices.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::{round_to, Geometry};
use crate::money::Money;
use crate::pricing::{FrameOrderInput, UnitBreakdown};
use crate::types::{
    CalculationMethod, MaterialSlot, MaterialSlots, PricingParams, RoundingPolicy, TaxRate,
};

// =============================================================================
// Result
// =============================================================================

/// Price of one frame order line.
///
/// Dimensions, perimeter and outer area are per piece. Every consumption
/// and cost field is for the whole line (already multiplied by
/// `quantity`). Consumption is rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceCalculationResult {
    pub quantity: u32,
    pub calculation_method: CalculationMethod,

    pub outer_width_mm: f64,
    pub outer_height_mm: f64,
    pub perimeter_mm: f64,
    pub outer_area_sqm: f64,

    pub frame_length_meters: f64,
    pub frame_cost: Money,
    pub glass_area_sqm: f64,
    pub glass_cost: Money,
    pub backing_area_sqm: f64,
    pub backing_cost: Money,
    pub passepartout_area_sqm: f64,
    pub passepartout_cost: Money,
    pub passepartout2_area_sqm: f64,
    pub passepartout2_cost: Money,
    pub labor_cost: Money,

    pub total_excl_vat: Money,
    pub vat_amount: Money,
    pub total_incl_vat: Money,
    pub vat_rate: TaxRate,
    pub currency: String,

    /// Manual price per metre used by the simple method.
    pub manual_price_per_meter: Option<Money>,
    /// Locked snapshot of every selected material.
    pub materials: MaterialSlots,
}

impl PriceCalculationResult {
    /// Cost of `slot` for the whole line.
    pub fn cost(&self, slot: MaterialSlot) -> Money {
        match slot {
            MaterialSlot::Frame => self.frame_cost,
            MaterialSlot::Glass => self.glass_cost,
            MaterialSlot::Backing => self.backing_cost,
            MaterialSlot::Passepartout => self.passepartout_cost,
            MaterialSlot::Passepartout2 => self.passepartout2_cost,
            MaterialSlot::Labor => self.labor_cost,
        }
    }

    /// Sum of all material cost fields.
    pub fn cost_sum(&self) -> Money {
        MaterialSlot::ALL.iter().map(|slot| self.cost(*slot)).sum()
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Combines per-piece costs into the line result for one quantity and one
/// set of pricing parameters.
#[derive(Debug, Clone, Copy)]
pub struct OrderCostAggregator<'a> {
    quantity: u32,
    params: &'a PricingParams,
}

impl<'a> OrderCostAggregator<'a> {
    /// Quantities below 1 are treated as 1.
    pub fn new(quantity: u32, params: &'a PricingParams) -> Self {
        OrderCostAggregator {
            quantity: quantity.max(1),
            params,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn aggregate(
        &self,
        geometry: &Geometry,
        unit: &UnitBreakdown,
        input: &FrameOrderInput,
    ) -> PriceCalculationResult {
        match self.params.rounding {
            RoundingPolicy::PerLine => self.aggregate_per_line(geometry, unit, input),
            RoundingPolicy::Legacy => self.aggregate_legacy(geometry, unit, input),
        }
    }

    fn aggregate_per_line(
        &self,
        geometry: &Geometry,
        unit: &UnitBreakdown,
        input: &FrameOrderInput,
    ) -> PriceCalculationResult {
        let qty = self.quantity;
        let cost = |raw: f64| Money::from_raw_minor(raw) * qty;
        let amount = |value: f64| round_to(round_to(value, 2) * qty as f64, 2);

        let mut result = self.skeleton(geometry, input, round_to(geometry.outer_area_sqm, 2));

        result.frame_length_meters = amount(unit.frame_length_meters);
        result.frame_cost = cost(unit.frame_cost);
        result.glass_area_sqm = amount(unit.glass_area_sqm);
        result.glass_cost = cost(unit.glass_cost);
        result.backing_area_sqm = amount(unit.backing_area_sqm);
        result.backing_cost = cost(unit.backing_cost);
        result.passepartout_area_sqm = amount(unit.passepartout_area_sqm);
        result.passepartout_cost = cost(unit.passepartout_cost);
        result.passepartout2_area_sqm = amount(unit.passepartout2_area_sqm);
        result.passepartout2_cost = cost(unit.passepartout2_cost);
        result.labor_cost = cost(unit.labor_cost);

        result.total_excl_vat = result.cost_sum();
        result.vat_amount = result.total_excl_vat.calculate_tax(self.params.vat);
        result.total_incl_vat = result.total_excl_vat + result.vat_amount;
        result
    }

    fn aggregate_legacy(
        &self,
        geometry: &Geometry,
        unit: &UnitBreakdown,
        input: &FrameOrderInput,
    ) -> PriceCalculationResult {
        let qty = self.quantity as f64;
        let cost = |raw: f64| Money::from_raw_minor(raw * qty);
        let amount = |value: f64| round_to(value * qty, 2);

        // outer area was historically rounded to four decimals first
        let outer_area = round_to(round_to(geometry.outer_area_sqm, 4), 2);
        let mut result = self.skeleton(geometry, input, outer_area);

        result.frame_length_meters = amount(unit.frame_length_meters);
        result.frame_cost = cost(unit.frame_cost);
        result.glass_area_sqm = amount(unit.glass_area_sqm);
        result.glass_cost = cost(unit.glass_cost);
        result.backing_area_sqm = amount(unit.backing_area_sqm);
        result.backing_cost = cost(unit.backing_cost);
        result.passepartout_area_sqm = amount(unit.passepartout_area_sqm);
        result.passepartout_cost = cost(unit.passepartout_cost);
        result.passepartout2_area_sqm = amount(unit.passepartout2_area_sqm);
        result.passepartout2_cost = cost(unit.passepartout2_cost);
        result.labor_cost = cost(unit.labor_cost);

        let raw_total = (unit.frame_cost
            + unit.glass_cost
            + unit.backing_cost
            + unit.passepartout_cost
            + unit.passepartout2_cost
            + unit.labor_cost)
            * qty;
        let multiplier = (10_000 + self.params.vat.bps()) as f64 / 10_000.0;

        result.total_excl_vat = Money::from_raw_minor(raw_total);
        result.total_incl_vat = Money::from_raw_minor(raw_total * multiplier);
        result.vat_amount = result.total_incl_vat - result.total_excl_vat;
        result
    }

    /// Result with the per-piece fields filled and every cost at zero.
    fn skeleton(
        &self,
        geometry: &Geometry,
        input: &FrameOrderInput,
        outer_area_sqm: f64,
    ) -> PriceCalculationResult {
        PriceCalculationResult {
            quantity: self.quantity,
            calculation_method: input.method,
            outer_width_mm: round_to(geometry.dimension.outer_width_mm, 2),
            outer_height_mm: round_to(geometry.dimension.outer_height_mm, 2),
            perimeter_mm: round_to(geometry.perimeter_mm, 2),
            outer_area_sqm,
            frame_length_meters: 0.0,
            frame_cost: Money::zero(),
            glass_area_sqm: 0.0,
            glass_cost: Money::zero(),
            backing_area_sqm: 0.0,
            backing_cost: Money::zero(),
            passepartout_area_sqm: 0.0,
            passepartout_cost: Money::zero(),
            passepartout2_area_sqm: 0.0,
            passepartout2_cost: Money::zero(),
            labor_cost: Money::zero(),
            total_excl_vat: Money::zero(),
            vat_amount: Money::zero(),
            total_incl_vat: Money::zero(),
            vat_rate: self.params.vat,
            currency: self.params.currency.clone(),
            manual_price_per_meter: match input.method {
                CalculationMethod::Simple => input.manual_price_per_meter,
                CalculationMethod::Standard => None,
            },
            materials: input.materials.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{BorderEdges, DimensionInput};
    use crate::pricing::calculate_frame_order_price;
    use crate::types::MaterialSelection;

    const EPS: f64 = 1e-9;

    fn material(id: &str, price: Money) -> Option<MaterialSelection> {
        Some(MaterialSelection::new(id, format!("Material {}", id), format!("SKU-{}", id), price))
    }

    fn simple_250() -> FrameOrderInput {
        FrameOrderInput {
            quantity: 1,
            method: CalculationMethod::Simple,
            dimensions: DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0)),
            manual_price_per_meter: Some(Money::from_major_minor(250, 0)),
            ..FrameOrderInput::default()
        }
    }

    fn standard_frame_and_glass(quantity: u32) -> FrameOrderInput {
        FrameOrderInput {
            quantity,
            method: CalculationMethod::Standard,
            dimensions: DimensionInput::outer(400.0, 500.0),
            materials: MaterialSlots {
                frame: material("f", Money::from_major_minor(100, 0)),
                glass: material("g", Money::from_major_minor(200, 0)),
                ..MaterialSlots::default()
            },
            ..FrameOrderInput::default()
        }
    }

    fn assert_scaled(one: &PriceCalculationResult, many: &PriceCalculationResult, n: u32) {
        let n_f = n as f64;
        assert_eq!(many.frame_cost, one.frame_cost * n);
        assert_eq!(many.glass_cost, one.glass_cost * n);
        assert_eq!(many.backing_cost, one.backing_cost * n);
        assert_eq!(many.passepartout_cost, one.passepartout_cost * n);
        assert_eq!(many.passepartout2_cost, one.passepartout2_cost * n);
        assert_eq!(many.labor_cost, one.labor_cost * n);
        assert_eq!(many.total_excl_vat, one.total_excl_vat * n);
        assert!((many.frame_length_meters - one.frame_length_meters * n_f).abs() < EPS);
        assert!((many.glass_area_sqm - one.glass_area_sqm * n_f).abs() < EPS);
        assert!((many.passepartout_area_sqm - one.passepartout_area_sqm * n_f).abs() < EPS);
        // per-piece geometry is not rescaled
        assert_eq!(many.perimeter_mm, one.perimeter_mm);
        assert_eq!(many.outer_area_sqm, one.outer_area_sqm);
        assert_eq!(many.outer_width_mm, one.outer_width_mm);
    }

    #[test]
    fn test_simple_method_totals() {
        let result = calculate_frame_order_price(&simple_250(), &PricingParams::default());

        assert_eq!(result.outer_width_mm, 400.0);
        assert_eq!(result.outer_height_mm, 500.0);
        assert_eq!(result.perimeter_mm, 1800.0);
        assert_eq!(result.outer_area_sqm, 0.2);
        assert_eq!(result.frame_length_meters, 1.8);
        assert_eq!(result.frame_cost, Money::from_major_minor(450, 0));
        assert_eq!(result.total_excl_vat, Money::from_major_minor(450, 0));
        assert_eq!(result.vat_amount, Money::from_major_minor(112, 50));
        assert_eq!(result.total_incl_vat, Money::from_major_minor(562, 50));
        assert_eq!(result.glass_cost, Money::zero());
        assert_eq!(result.labor_cost, Money::zero());
        assert_eq!(result.manual_price_per_meter, Some(Money::from_major_minor(250, 0)));
        assert_eq!(result.currency, "SEK");
    }

    #[test]
    fn test_quantity_doubles_every_line() {
        let params = PricingParams::default();
        let one = calculate_frame_order_price(&standard_frame_and_glass(1), &params);
        let two = calculate_frame_order_price(&standard_frame_and_glass(2), &params);

        assert_eq!(one.frame_cost, Money::from_major_minor(180, 0));
        assert_eq!(one.glass_cost, Money::from_major_minor(40, 0));
        assert_eq!(two.quantity, 2);
        assert_eq!(two.frame_length_meters, 3.6);
        assert_eq!(two.glass_area_sqm, 0.4);
        assert_scaled(&one, &two, 2);
    }

    #[test]
    fn test_linearity_with_awkward_prices() {
        let mut input = standard_frame_and_glass(1);
        input.dimensions = DimensionInput::motif(287.0, 411.0, BorderEdges::new(33.0, 35.0, 41.0, 47.0));
        input.frame_profile_width_mm = 17.0;
        input.materials.frame = material("f", Money::from_minor(13_337));
        input.materials.passepartout = material("p", Money::from_minor(33_333));
        input.materials.labor = material("l", Money::from_minor(4_999));

        let params = PricingParams::default();
        let one = calculate_frame_order_price(&input, &params);
        for n in [2u32, 3, 7, 13] {
            input.quantity = n;
            let many = calculate_frame_order_price(&input, &params);
            assert_scaled(&one, &many, n);
        }
    }

    #[test]
    fn test_total_is_exact_sum_of_lines() {
        let mut input = standard_frame_and_glass(3);
        input.dimensions = DimensionInput::motif(287.0, 411.0, BorderEdges::uniform(45.0));
        input.materials.backing = material("b", Money::from_minor(8_999));
        input.materials.passepartout = material("p", Money::from_minor(33_333));
        input.materials.passepartout2 = material("p2", Money::from_minor(21_111));
        input.second_passepartout_edges = BorderEdges::uniform(12.0);
        input.materials.labor = material("l", Money::from_minor(4_999));

        let result = calculate_frame_order_price(&input, &PricingParams::default());
        assert_eq!(result.total_excl_vat, result.cost_sum());
        assert_eq!(result.total_incl_vat, result.total_excl_vat + result.vat_amount);
        assert!(result.passepartout2_cost.is_positive());
    }

    #[test]
    fn test_vat_rate_is_applied_on_excl() {
        let params = PricingParams::with_vat(TaxRate::from_bps(1200));
        let result = calculate_frame_order_price(&simple_250(), &params);
        assert_eq!(result.vat_amount, Money::from_major_minor(54, 0));
        assert_eq!(result.total_incl_vat, Money::from_major_minor(504, 0));
        assert_eq!(result.vat_rate.bps(), 1200);

        let zero = PricingParams::with_vat(TaxRate::zero());
        let result = calculate_frame_order_price(&simple_250(), &zero);
        assert_eq!(result.total_incl_vat, result.total_excl_vat);
    }

    #[test]
    fn test_zero_quantity_counts_as_one() {
        let mut input = simple_250();
        input.quantity = 0;
        let result = calculate_frame_order_price(&input, &PricingParams::default());
        assert_eq!(result.quantity, 1);
        assert_eq!(result.frame_cost, Money::from_major_minor(450, 0));
    }

    #[test]
    fn test_degenerate_input_never_fails() {
        let input = FrameOrderInput {
            method: CalculationMethod::Standard,
            materials: MaterialSlots {
                frame: material("f", Money::from_major_minor(100, 0)),
                glass: material("g", Money::from_major_minor(200, 0)),
                ..MaterialSlots::default()
            },
            ..FrameOrderInput::default()
        };
        let result = calculate_frame_order_price(&input, &PricingParams::default());
        assert_eq!(result.perimeter_mm, 0.0);
        assert_eq!(result.total_incl_vat, Money::zero());
    }

    #[test]
    fn test_oversized_passepartout_area_by_policy() {
        // 200×300 board with 300 mm of side edges. Per line: no window,
        // whole board 0.06 m². Legacy: window -100×280, 0.06 + 0.028 m².
        let cases = [
            (RoundingPolicy::PerLine, 0.06, Money::from_major_minor(18, 0)),
            (RoundingPolicy::Legacy, 0.09, Money::from_major_minor(26, 40)),
        ];
        for (rounding, area, cost) in cases {
            let mut input = standard_frame_and_glass(1);
            input.dimensions = DimensionInput::outer(200.0, 300.0);
            input.dimensions.edges = BorderEdges::new(150.0, 150.0, 10.0, 10.0);
            input.materials.passepartout = material("p", Money::from_major_minor(300, 0));
            let params = PricingParams {
                rounding,
                ..PricingParams::default()
            };

            let result = calculate_frame_order_price(&input, &params);
            assert_eq!(result.passepartout_area_sqm, area);
            assert_eq!(result.passepartout_cost, cost);
        }

        let cases = [
            (RoundingPolicy::PerLine, 0.04, Money::from_major_minor(12, 0)),
            (RoundingPolicy::Legacy, 0.0, Money::zero()),
        ];
        for (rounding, area, cost) in cases {
            let mut input = standard_frame_and_glass(1);
            input.dimensions = DimensionInput::outer(200.0, 200.0);
            input.dimensions.edges = BorderEdges::uniform(1000.0);
            input.materials.passepartout = material("p", Money::from_major_minor(300, 0));
            let params = PricingParams {
                rounding,
                ..PricingParams::default()
            };

            let result = calculate_frame_order_price(&input, &params);
            assert!(result.passepartout_area_sqm >= 0.0);
            assert_eq!(result.passepartout_area_sqm, area);
            assert_eq!(result.passepartout_cost, cost);
        }
    }

    #[test]
    fn test_pure_and_deterministic() {
        let mut input = standard_frame_and_glass(4);
        input.materials.labor = material("l", Money::from_minor(4_999));
        let params = PricingParams::default();

        let first = calculate_frame_order_price(&input, &params);
        let second = calculate_frame_order_price(&input, &params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_locked_material_snapshot() {
        let input = standard_frame_and_glass(1);
        let result = calculate_frame_order_price(&input, &PricingParams::default());
        let frame = result.materials.frame.as_ref().unwrap();
        assert_eq!(frame.sku, "SKU-f");
        assert_eq!(frame.unit_price, Money::from_major_minor(100, 0));
        // standard orders do not carry a manual simple price
        assert_eq!(result.manual_price_per_meter, None);
    }

    #[test]
    fn test_legacy_rounds_once_at_the_end() {
        // 50×50 mm glass: 0.0025 m² per piece at 333.33/m²
        let input = FrameOrderInput {
            quantity: 3,
            method: CalculationMethod::Standard,
            dimensions: DimensionInput::outer(50.0, 50.0),
            materials: MaterialSlots {
                glass: material("g", Money::from_minor(33_333)),
                ..MaterialSlots::default()
            },
            ..FrameOrderInput::default()
        };

        let legacy = PricingParams {
            rounding: RoundingPolicy::Legacy,
            ..PricingParams::default()
        };
        let legacy_result = calculate_frame_order_price(&input, &legacy);
        let per_line_result = calculate_frame_order_price(&input, &PricingParams::default());

        // per piece 83.3325 öre
        // legacy: 83.3325 × 3 = 249.9975 → 250
        assert_eq!(legacy_result.glass_cost.minor(), 250);
        assert_eq!(legacy_result.glass_area_sqm, 0.01);
        // per line: round(83.3325) = 83, × 3 = 249
        assert_eq!(per_line_result.glass_cost.minor(), 249);
        assert_eq!(per_line_result.glass_area_sqm, 0.0);

        // legacy incl is rounded from the raw total
        // 249.9975 × 1.25 = 312.496875 → 312
        assert_eq!(legacy_result.total_excl_vat.minor(), 250);
        assert_eq!(legacy_result.total_incl_vat.minor(), 312);
        assert_eq!(legacy_result.vat_amount.minor(), 62);
    }

    #[test]
    fn test_legacy_matches_per_line_on_round_numbers() {
        let legacy = PricingParams {
            rounding: RoundingPolicy::Legacy,
            ..PricingParams::default()
        };
        let a = calculate_frame_order_price(&simple_250(), &legacy);
        let b = calculate_frame_order_price(&simple_250(), &PricingParams::default());
        assert_eq!(a.total_incl_vat, b.total_incl_vat);
        assert_eq!(a.frame_cost, b.frame_cost);
    }
}
