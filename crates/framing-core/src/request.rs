//! # Frame Order Requests
//!
//! The JSON body the order form posts for both "save frame" and "live
//! preview", decoded leniently.
//!
//! ## Lenient Decoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON value          →  decoded as                                      │
//! │  ──────────             ──────────                                      │
//! │  120 / 120.5            Some(120.0) / Some(120.5)                       │
//! │  "120,5" / " 120.5 "    Some(120.5)                                     │
//! │  "" / null / missing    None                                            │
//! │  "abc" / true / [..]    None                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A half-typed form must still produce a preview, so nothing here is an
//! error. Field names follow the stored column names; `*_cm` spellings
//! from older clients are accepted as aliases and carry millimetres too.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dimension::{BorderEdges, DimensionInput};
use crate::money::Money;
use crate::pricing::FrameOrderInput;
use crate::types::{CalculationMethod, MaterialSlot, MaterialSlots};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Lenient Field Decoders
// =============================================================================

/// `deserialize_with` helpers for form input.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Parses `"12,5"` or `"12.5"` into a finite number.
    pub fn parse_number(raw: &str) -> Option<f64> {
        let cleaned = raw.trim().replace(',', ".");
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Leading integer of a string, e.g. `"3 st"` → 3, `"2.7"` → 2.
    pub fn parse_leading_int(raw: &str) -> Option<i64> {
        let trimmed = raw.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<i64>().ok().map(|n| sign * n)
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
            Some(Value::String(s)) => parse_number(&s),
            _ => None,
        })
    }

    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
            Some(Value::String(s)) => parse_leading_int(&s),
            _ => None,
        })
    }

    /// Catalog ids arrive as numbers or strings; blank means "none".
    pub fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
    }
}

// =============================================================================
// Request
// =============================================================================

/// Frame order form body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrameOrderRequest {
    #[serde(rename = "motiv", default)]
    pub motif: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "antal", default, deserialize_with = "lenient::integer")]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub calculation_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub simple_price_per_meter: Option<f64>,

    #[serde(alias = "width_cm", default, deserialize_with = "lenient::number")]
    pub width_mm: Option<f64>,
    #[serde(alias = "height_cm", default, deserialize_with = "lenient::number")]
    pub height_mm: Option<f64>,
    #[serde(rename = "motiv_bredd_mm", alias = "motiv_bredd_cm", default, deserialize_with = "lenient::number")]
    pub motif_width_mm: Option<f64>,
    #[serde(rename = "motiv_hojd_mm", alias = "motiv_hojd_cm", default, deserialize_with = "lenient::number")]
    pub motif_height_mm: Option<f64>,

    #[serde(rename = "pp_vanster_mm", alias = "pp_vanster_cm", default, deserialize_with = "lenient::number")]
    pub pp_left_mm: Option<f64>,
    #[serde(rename = "pp_hoger_mm", alias = "pp_hoger_cm", default, deserialize_with = "lenient::number")]
    pub pp_right_mm: Option<f64>,
    #[serde(rename = "pp_topp_mm", alias = "pp_topp_cm", default, deserialize_with = "lenient::number")]
    pub pp_top_mm: Option<f64>,
    #[serde(rename = "pp_botten_mm", alias = "pp_botten_cm", default, deserialize_with = "lenient::number")]
    pub pp_bottom_mm: Option<f64>,
    #[serde(alias = "passepartout_width_cm", default, deserialize_with = "lenient::number")]
    pub passepartout_width_mm: Option<f64>,

    #[serde(rename = "pp2_vanster_mm", alias = "pp2_vanster_cm", default, deserialize_with = "lenient::number")]
    pub pp2_left_mm: Option<f64>,
    #[serde(rename = "pp2_hoger_mm", alias = "pp2_hoger_cm", default, deserialize_with = "lenient::number")]
    pub pp2_right_mm: Option<f64>,
    #[serde(rename = "pp2_topp_mm", alias = "pp2_topp_cm", default, deserialize_with = "lenient::number")]
    pub pp2_top_mm: Option<f64>,
    #[serde(rename = "pp2_botten_mm", alias = "pp2_botten_cm", default, deserialize_with = "lenient::number")]
    pub pp2_bottom_mm: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub frame_profile_width_mm: Option<f64>,

    #[serde(default, deserialize_with = "lenient::id")]
    pub frame_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub glass_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub backing_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub passepartout_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub passepartout2_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub labor_item_id: Option<String>,
}

/// Values filled in when the form leaves a field empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDefaults {
    /// Uniform passepartout width for orders without edges.
    pub passepartout_width_mm: f64,
    /// Manual price used by the simple method when none was entered.
    /// Only live previews set this.
    pub simple_price_per_meter: Option<Money>,
    pub frame_profile_width_mm: f64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        RequestDefaults {
            passepartout_width_mm: 50.0,
            simple_price_per_meter: None,
            frame_profile_width_mm: 0.0,
        }
    }
}

impl FrameOrderRequest {
    /// Raw quantity as entered, at least 1.
    pub fn requested_quantity(&self) -> i64 {
        self.quantity.unwrap_or(1).max(1)
    }

    pub fn method(&self) -> CalculationMethod {
        CalculationMethod::from_lenient(self.calculation_method.as_deref().unwrap_or(""))
    }

    /// Catalog ids to resolve, per slot.
    pub fn material_ids(&self) -> Vec<(MaterialSlot, &str)> {
        [
            (MaterialSlot::Frame, &self.frame_item_id),
            (MaterialSlot::Glass, &self.glass_item_id),
            (MaterialSlot::Backing, &self.backing_item_id),
            (MaterialSlot::Passepartout, &self.passepartout_item_id),
            (MaterialSlot::Passepartout2, &self.passepartout2_item_id),
            (MaterialSlot::Labor, &self.labor_item_id),
        ]
        .into_iter()
        .filter_map(|(slot, id)| id.as_deref().map(|id| (slot, id)))
        .collect()
    }

    pub fn dimensions(&self) -> DimensionInput {
        DimensionInput {
            outer_width_mm: self.width_mm,
            outer_height_mm: self.height_mm,
            motif_width_mm: self.motif_width_mm,
            motif_height_mm: self.motif_height_mm,
            edges: BorderEdges {
                left: self.pp_left_mm,
                right: self.pp_right_mm,
                top: self.pp_top_mm,
                bottom: self.pp_bottom_mm,
            },
        }
    }

    pub fn second_passepartout_edges(&self) -> BorderEdges {
        BorderEdges {
            left: self.pp2_left_mm,
            right: self.pp2_right_mm,
            top: self.pp2_top_mm,
            bottom: self.pp2_bottom_mm,
        }
    }

    /// Builds engine input from this request and the resolved materials.
    ///
    /// A zero uniform width or zero manual price counts as "not entered".
    /// The quantity is capped at `MAX_ITEM_QUANTITY`; saving rejects larger
    /// values before getting here.
    pub fn into_input(&self, materials: MaterialSlots, defaults: &RequestDefaults) -> FrameOrderInput {
        let method = self.method();

        let manual_price_per_meter = self
            .simple_price_per_meter
            .map(Money::from_decimal)
            .filter(|price| !price.is_zero())
            .or(match method {
                CalculationMethod::Simple => defaults.simple_price_per_meter,
                CalculationMethod::Standard => None,
            });

        let passepartout_width_mm = self
            .passepartout_width_mm
            .filter(|width| *width != 0.0)
            .unwrap_or(defaults.passepartout_width_mm);

        FrameOrderInput {
            quantity: u32::try_from(self.requested_quantity().min(MAX_ITEM_QUANTITY)).unwrap_or(1),
            method,
            dimensions: self.dimensions(),
            passepartout_width_mm: Some(passepartout_width_mm),
            second_passepartout_edges: self.second_passepartout_edges(),
            frame_profile_width_mm: self
                .frame_profile_width_mm
                .unwrap_or(defaults.frame_profile_width_mm),
            manual_price_per_meter,
            materials,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
