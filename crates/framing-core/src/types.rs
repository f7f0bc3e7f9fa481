//! # Domain Types
//!
//! Core domain types shared by every pricing path.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────┐  ┌───────────────────┐  ┌─────────────────────┐ │
//! │  │ MaterialSelection │  │  MaterialSlots    │  │   PricingParams     │ │
//! │  │ ───────────────── │  │ ───────────────── │  │ ─────────────────── │ │
//! │  │ id, name, sku     │  │ frame, glass,     │  │ vat (TaxRate)       │ │
//! │  │ unit_price (lock) │  │ backing, pp, pp2, │  │ currency            │ │
//! │  └───────────────────┘  │ labor             │  │ rounding policy     │ │
//! │                         └───────────────────┘  │ zero-dimension rule │ │
//! │  ┌───────────────────┐  ┌───────────────────┐  └─────────────────────┘ │
//! │  │ CalculationMethod │  │  RoundingPolicy   │                          │
//! │  │ Simple | Standard │  │ PerLine | Legacy  │                          │
//! │  └───────────────────┘  └───────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `MaterialSelection` is a frozen copy of a catalog item taken when the
//! order is priced. Later catalog price changes never reach a saved order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_VAT_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT (moms) rate in basis points.
///
/// 1 basis point = 0.01%, so 2500 bps = 25% (Swedish standard rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage such as `25.0`.
    ///
    /// Negative or non-finite percentages clamp to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if pct.is_finite() && pct > 0.0 {
            TaxRate((pct * 100.0).round() as u32)
        } else {
            TaxRate(0)
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    /// 25% moms.
    fn default() -> Self {
        TaxRate(DEFAULT_VAT_BPS)
    }
}

// =============================================================================
// Materials
// =============================================================================

/// The fixed material slots of a frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSlot {
    /// Moulding, priced per metre.
    Frame,
    /// Glazing, priced per m².
    Glass,
    /// Backing board, priced per m².
    Backing,
    /// First passepartout layer, priced per m².
    Passepartout,
    /// Optional second passepartout layer, priced per m².
    Passepartout2,
    /// Framing labour, priced per metre of moulding.
    Labor,
}

impl MaterialSlot {
    /// All slots in display order.
    pub const ALL: [MaterialSlot; 6] = [
        MaterialSlot::Frame,
        MaterialSlot::Glass,
        MaterialSlot::Backing,
        MaterialSlot::Passepartout,
        MaterialSlot::Passepartout2,
        MaterialSlot::Labor,
    ];

    /// Snake-case name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialSlot::Frame => "frame",
            MaterialSlot::Glass => "glass",
            MaterialSlot::Backing => "backing",
            MaterialSlot::Passepartout => "passepartout",
            MaterialSlot::Passepartout2 => "passepartout2",
            MaterialSlot::Labor => "labor",
        }
    }
}

impl fmt::Display for MaterialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item resolved at calculation time.
///
/// Once attached to a priced order this is a locked snapshot: name, SKU
/// and unit price are frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialSelection {
    /// Catalog identifier.
    pub id: String,
    /// Name at time of pricing (frozen).
    pub name: String,
    /// SKU at time of pricing (frozen).
    pub sku: String,
    /// Sales price per unit (metre or m²) at time of pricing (frozen).
    pub unit_price: Money,
}

impl MaterialSelection {
    /// Creates a selection snapshot.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        MaterialSelection {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            unit_price,
        }
    }

    /// Whether this material contributes to the price.
    ///
    /// A zero price behaves like an absent material: no cost, no
    /// consumption reported.
    #[inline]
    pub fn is_priced(&self) -> bool {
        self.unit_price.is_positive()
    }
}

/// The materials chosen for one frame order, one optional entry per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialSlots {
    #[serde(default)]
    pub frame: Option<MaterialSelection>,
    #[serde(default)]
    pub glass: Option<MaterialSelection>,
    #[serde(default)]
    pub backing: Option<MaterialSelection>,
    #[serde(default)]
    pub passepartout: Option<MaterialSelection>,
    #[serde(default)]
    pub passepartout2: Option<MaterialSelection>,
    #[serde(default)]
    pub labor: Option<MaterialSelection>,
}

impl MaterialSlots {
    /// Returns the selection in `slot`, if any.
    pub fn get(&self, slot: MaterialSlot) -> Option<&MaterialSelection> {
        match slot {
            MaterialSlot::Frame => self.frame.as_ref(),
            MaterialSlot::Glass => self.glass.as_ref(),
            MaterialSlot::Backing => self.backing.as_ref(),
            MaterialSlot::Passepartout => self.passepartout.as_ref(),
            MaterialSlot::Passepartout2 => self.passepartout2.as_ref(),
            MaterialSlot::Labor => self.labor.as_ref(),
        }
    }

    /// Puts `selection` into `slot`, replacing what was there.
    pub fn set(&mut self, slot: MaterialSlot, selection: Option<MaterialSelection>) {
        let target = match slot {
            MaterialSlot::Frame => &mut self.frame,
            MaterialSlot::Glass => &mut self.glass,
            MaterialSlot::Backing => &mut self.backing,
            MaterialSlot::Passepartout => &mut self.passepartout,
            MaterialSlot::Passepartout2 => &mut self.passepartout2,
            MaterialSlot::Labor => &mut self.labor,
        };
        *target = selection;
    }

    /// Unit price of the material in `slot`, when it is priced.
    pub fn price(&self, slot: MaterialSlot) -> Option<Money> {
        self.get(slot)
            .filter(|m| m.is_priced())
            .map(|m| m.unit_price)
    }
}

// =============================================================================
// Calculation Method
// =============================================================================

/// How a frame order is priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Perimeter × one manual price per metre. Nothing else is priced.
    #[default]
    Simple,
    /// Itemised material consumption for every selected slot.
    Standard,
}

impl CalculationMethod {
    /// Normalises free-form form input: `"standard"` (any case, trimmed)
    /// selects the standard method, everything else is simple.
    pub fn from_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("standard") {
            CalculationMethod::Standard
        } else {
            CalculationMethod::Simple
        }
    }
}

impl FromStr for CalculationMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CalculationMethod::from_lenient(s))
    }
}

// =============================================================================
// Rounding Policy
// =============================================================================

/// Where intermediate values are rounded.
///
/// The two policies are NOT numerically interchangeable; pick one per
/// tenant and keep it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Each material's per-unit cost is rounded once to öre and then
    /// multiplied by the order quantity. Totals are exact sums of the
    /// reported lines and scale linearly with quantity.
    #[default]
    PerLine,
    /// Reproduces historical invoices: frame length rounded before labour,
    /// frame cost rounded per unit, second passepartout area rounded to
    /// four decimals, everything else kept unrounded until the final
    /// two-decimal rounding of every field.
    Legacy,
}

impl FromStr for RoundingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per_line" | "per-line" | "perline" => Ok(RoundingPolicy::PerLine),
            "legacy" => Ok(RoundingPolicy::Legacy),
            other => Err(format!("unknown rounding policy: {}", other)),
        }
    }
}

// =============================================================================
// Pricing Parameters
// =============================================================================

/// Per-call pricing parameters.
///
/// Passed explicitly on every call so concurrent quotes for tenants with
/// different VAT rates or currencies never share state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingParams {
    /// VAT applied on top of the tax-exclusive subtotal.
    pub vat: TaxRate,
    /// ISO 4217 currency code of every monetary field.
    pub currency: String,
    /// Rounding discipline.
    pub rounding: RoundingPolicy,
    /// Treat a set-but-zero outer dimension as "not provided".
    pub zero_dimension_is_unset: bool,
}

impl Default for PricingParams {
    /// 25% VAT, SEK, per-line rounding, explicit zero dimensions.
    fn default() -> Self {
        PricingParams {
            vat: TaxRate::default(),
            currency: "SEK".to_string(),
            rounding: RoundingPolicy::PerLine,
            zero_dimension_is_unset: false,
        }
    }
}

impl PricingParams {
    /// Default parameters with the given VAT rate.
    pub fn with_vat(vat: TaxRate) -> Self {
        PricingParams {
            vat,
            ..PricingParams::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
