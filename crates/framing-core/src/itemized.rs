//! # Itemized Frame Orders
//!
//! An ordered list of heterogeneous line items instead of fixed material
//! slots. Each item type maps to ONE quantity rule, so adding a new kind of
//! item never means another special case in the calculator.
//!
//! ## Quantity Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item type      rule             quantity                     unit      │
//! │  ─────────      ────             ────────                     ────      │
//! │  frame          PerimeterMeters  perimeter_m × order qty      meter     │
//! │  glass          OuterArea        outer_area × order qty       sqm       │
//! │  passepartout   OuterArea        outer_area × order qty       sqm       │
//! │  backing        OuterArea        outer_area × order qty       sqm       │
//! │  labor          Manual           as entered                   hour      │
//! │  custom         Manual           as entered                   piece     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! Like a catalog snapshot on the fixed model, each line item keeps the
//! name, SKU and unit price it had when it was added.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::dimension::DimensionInput;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::geometry::{round_to, Geometry};
use crate::money::Money;
use crate::types::{MaterialSelection, PricingParams, RoundingPolicy, TaxRate};

// =============================================================================
// Line Item Type
// =============================================================================

/// Kind of line item on an itemized frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineItemType {
    Frame,
    Glass,
    Passepartout,
    Backing,
    Labor,
    Custom,
}

/// How a line item's quantity is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRule {
    /// Perimeter in metres.
    PerimeterMeters,
    /// Outer area in square metres.
    OuterArea,
    /// User-supplied, never derived.
    Manual,
}

impl LineItemType {
    pub fn quantity_rule(&self) -> QuantityRule {
        match self {
            LineItemType::Frame => QuantityRule::PerimeterMeters,
            LineItemType::Glass | LineItemType::Passepartout | LineItemType::Backing => {
                QuantityRule::OuterArea
            }
            LineItemType::Labor | LineItemType::Custom => QuantityRule::Manual,
        }
    }

    /// Unit the quantity is expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            LineItemType::Frame => "meter",
            LineItemType::Glass | LineItemType::Passepartout | LineItemType::Backing => "sqm",
            LineItemType::Labor => "hour",
            LineItemType::Custom => "piece",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemType::Frame => "frame",
            LineItemType::Glass => "glass",
            LineItemType::Passepartout => "passepartout",
            LineItemType::Backing => "backing",
            LineItemType::Labor => "labor",
            LineItemType::Custom => "custom",
        }
    }
}

impl QuantityRule {
    /// Per-piece consumption for derived rules, `None` for manual items.
    pub fn per_piece(&self, geometry: &Geometry) -> Option<f64> {
        match self {
            QuantityRule::PerimeterMeters => Some(geometry.perimeter_meters()),
            QuantityRule::OuterArea => Some(geometry.outer_area_sqm),
            QuantityRule::Manual => None,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line on an itemized frame order.
///
/// `quantity` and `total_cost` are outputs for derived item types and are
/// overwritten on every pricing run. For labor and custom items
/// `quantity` is what the user entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrameOrderLineItem {
    pub item_type: LineItemType,
    /// Catalog id, absent for custom items.
    #[serde(default)]
    pub item_id: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub item_sku: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    pub unit: String,
    pub unit_price: Money,
    #[serde(default)]
    pub total_cost: Money,
    /// Free-form data such as passepartout edges or work notes.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub sort_order: i32,
}

impl FrameOrderLineItem {
    /// Line item for a catalog material, price frozen from the snapshot.
    pub fn from_material(item_type: LineItemType, material: &MaterialSelection) -> Self {
        FrameOrderLineItem {
            item_type,
            item_id: Some(material.id.clone()),
            item_name: material.name.clone(),
            item_sku: Some(material.sku.clone()),
            quantity: 0.0,
            unit: item_type.unit().to_string(),
            unit_price: material.unit_price,
            total_cost: Money::zero(),
            metadata: Map::new(),
            sort_order: 0,
        }
    }

    /// Labor line with a number of hours.
    pub fn labor(name: impl Into<String>, hours: f64, hourly_rate: Money) -> Self {
        Self::manual(LineItemType::Labor, name, hours, hourly_rate)
    }

    /// Free-text line priced per piece.
    pub fn custom(name: impl Into<String>, quantity: f64, unit_price: Money) -> Self {
        Self::manual(LineItemType::Custom, name, quantity, unit_price)
    }

    fn manual(item_type: LineItemType, name: impl Into<String>, quantity: f64, unit_price: Money) -> Self {
        FrameOrderLineItem {
            item_type,
            item_id: None,
            item_name: name.into(),
            item_sku: None,
            quantity,
            unit: item_type.unit().to_string(),
            unit_price,
            total_cost: Money::zero(),
            metadata: Map::new(),
            sort_order: 0,
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if self.unit_price.is_negative() {
            return Err(ValidationError::MustBePositive {
                field: format!("{} unit_price", self.item_type.as_str()),
            }
            .into());
        }
        if self.item_type.quantity_rule() == QuantityRule::Manual
            && !(self.quantity.is_finite() && self.quantity >= 0.0)
        {
            return Err(ValidationError::MustBePositive {
                field: format!("{} quantity", self.item_type.as_str()),
            }
            .into());
        }
        if self.item_type == LineItemType::Custom && self.item_name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "item_name".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Copy with quantity derived from geometry and the total recomputed.
    fn priced(&self, geometry: &Geometry, order_quantity: u32, rounding: RoundingPolicy) -> Self {
        let quantity = match self.item_type.quantity_rule().per_piece(geometry) {
            Some(per_piece) => match rounding {
                RoundingPolicy::PerLine => round_to(round_to(per_piece, 2) * order_quantity as f64, 2),
                RoundingPolicy::Legacy => round_to(per_piece * order_quantity as f64, 2),
            },
            None => round_to(self.quantity, 2),
        };

        FrameOrderLineItem {
            quantity,
            unit: self.item_type.unit().to_string(),
            total_cost: self.unit_price.scale(quantity),
            ..self.clone()
        }
    }
}

// =============================================================================
// Itemized Order
// =============================================================================

/// A frame order described as a list of line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemizedFrameOrder {
    /// Number of identical framed pieces. Values below 1 count as 1.
    pub quantity: u32,
    pub dimensions: DimensionInput,
    #[serde(default)]
    pub items: Vec<FrameOrderLineItem>,
}

impl ItemizedFrameOrder {
    pub fn new(quantity: u32, dimensions: DimensionInput) -> Self {
        ItemizedFrameOrder {
            quantity,
            dimensions,
            items: Vec::new(),
        }
    }

    /// Appends an item at the end of the list.
    pub fn add_item(&mut self, mut item: FrameOrderLineItem) {
        item.sort_order = self
            .items
            .iter()
            .map(|i| i.sort_order + 1)
            .max()
            .unwrap_or(0);
        self.items.push(item);
    }

    /// Removes the item at `index`, returning it.
    pub fn remove_item(&mut self, index: usize) -> Option<FrameOrderLineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prices every line and the order total.
    ///
    /// ## Errors
    /// - `CoreError::EmptyOrder` when there are no line items
    /// - `CoreError::Validation` for a negative price, a negative manual
    ///   quantity or a custom line without a name
    ///
    /// ## Example
    /// ```rust
    /// use framing_core::dimension::{BorderEdges, DimensionInput};
    /// use framing_core::itemized::{FrameOrderLineItem, ItemizedFrameOrder, LineItemType};
    /// use framing_core::money::Money;
    /// use framing_core::types::{MaterialSelection, PricingParams};
    ///
    /// let moulding = MaterialSelection::new("12", "Oak 20", "RAM-0012", Money::from_major_minor(100, 0));
    /// let mut order = ItemizedFrameOrder::new(1, DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0)));
    /// order.add_item(FrameOrderLineItem::from_material(LineItemType::Frame, &moulding));
    ///
    /// let quote = order.price(&PricingParams::default()).unwrap();
    /// assert_eq!(quote.items[0].quantity, 1.8);
    /// assert_eq!(quote.total_excl_vat.to_string(), "180.00");
    /// ```
    pub fn price(&self, params: &PricingParams) -> CoreResult<ItemizedQuote> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        for item in &self.items {
            item.validate()?;
        }

        let quantity = self.quantity.max(1);
        let geometry = Geometry::of(self.dimensions.resolve(params.zero_dimension_is_unset));

        let mut items: Vec<FrameOrderLineItem> = self
            .items
            .iter()
            .map(|item| item.priced(&geometry, quantity, params.rounding))
            .collect();
        // stable: equal sort_order keeps entry order
        items.sort_by_key(|item| item.sort_order);

        let total_excl_vat: Money = items.iter().map(|item| item.total_cost).sum();
        let vat_amount = total_excl_vat.calculate_tax(params.vat);

        Ok(ItemizedQuote {
            quantity,
            outer_width_mm: round_to(geometry.dimension.outer_width_mm, 2),
            outer_height_mm: round_to(geometry.dimension.outer_height_mm, 2),
            perimeter_mm: round_to(geometry.perimeter_mm, 2),
            outer_area_sqm: round_to(geometry.outer_area_sqm, 2),
            items,
            total_excl_vat,
            vat_amount,
            total_incl_vat: total_excl_vat + vat_amount,
            vat_rate: params.vat,
            currency: params.currency.clone(),
        })
    }
}

/// Priced itemized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemizedQuote {
    pub quantity: u32,
    pub outer_width_mm: f64,
    pub outer_height_mm: f64,
    pub perimeter_mm: f64,
    pub outer_area_sqm: f64,
    /// Lines in `sort_order`, with derived quantities and totals.
    pub items: Vec<FrameOrderLineItem>,
    pub total_excl_vat: Money,
    pub vat_amount: Money,
    pub total_incl_vat: Money,
    pub vat_rate: TaxRate,
    pub currency: String,
}

impl ItemizedQuote {
    /// Sum of the line totals of one item type.
    pub fn total_for(&self, item_type: LineItemType) -> Money {
        self.items
            .iter()
            .filter(|item| item.item_type == item_type)
            .map(|item| item.total_cost)
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::BorderEdges;
    use serde_json::json;

    fn snapshot(id: &str, major: i64) -> MaterialSelection {
        MaterialSelection::new(id, format!("Item {}", id), format!("SKU-{}", id), Money::from_major_minor(major, 0))
    }

    fn order_400_500(quantity: u32) -> ItemizedFrameOrder {
        ItemizedFrameOrder::new(quantity, DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0)))
    }

    #[test]
    fn test_quantity_rule_table() {
        assert_eq!(LineItemType::Frame.quantity_rule(), QuantityRule::PerimeterMeters);
        assert_eq!(LineItemType::Glass.quantity_rule(), QuantityRule::OuterArea);
        assert_eq!(LineItemType::Passepartout.quantity_rule(), QuantityRule::OuterArea);
        assert_eq!(LineItemType::Backing.quantity_rule(), QuantityRule::OuterArea);
        assert_eq!(LineItemType::Labor.quantity_rule(), QuantityRule::Manual);
        assert_eq!(LineItemType::Custom.quantity_rule(), QuantityRule::Manual);

        assert_eq!(LineItemType::Frame.unit(), "meter");
        assert_eq!(LineItemType::Backing.unit(), "sqm");
        assert_eq!(LineItemType::Labor.unit(), "hour");
        assert_eq!(LineItemType::Custom.unit(), "piece");
    }

    #[test]
    fn test_empty_order_is_rejected() {
        let order = order_400_500(1);
        let err = order.price(&PricingParams::default()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOrder));
    }

    #[test]
    fn test_derived_quantities_and_totals() {
        let mut order = order_400_500(2);
        order.add_item(FrameOrderLineItem::from_material(LineItemType::Frame, &snapshot("f", 100)));
        order.add_item(FrameOrderLineItem::from_material(LineItemType::Glass, &snapshot("g", 200)));
        order.add_item(FrameOrderLineItem::from_material(LineItemType::Passepartout, &snapshot("p", 300)));
        order.add_item(FrameOrderLineItem::labor("Framing", 1.5, Money::from_major_minor(400, 0)));
        order.add_item(FrameOrderLineItem::custom("Hanging wire", 2.0, Money::from_major_minor(15, 0)));

        let quote = order.price(&PricingParams::default()).unwrap();

        let frame = &quote.items[0];
        assert_eq!(frame.quantity, 3.6);
        assert_eq!(frame.unit, "meter");
        assert_eq!(frame.total_cost, Money::from_major_minor(360, 0));

        assert_eq!(quote.items[1].quantity, 0.4);
        assert_eq!(quote.items[1].total_cost, Money::from_major_minor(80, 0));
        assert_eq!(quote.items[2].quantity, 0.4);
        assert_eq!(quote.items[2].total_cost, Money::from_major_minor(120, 0));

        // manual quantities are not multiplied by the order quantity
        assert_eq!(quote.items[3].quantity, 1.5);
        assert_eq!(quote.items[3].total_cost, Money::from_major_minor(600, 0));
        assert_eq!(quote.items[4].total_cost, Money::from_major_minor(30, 0));

        assert_eq!(quote.total_excl_vat, Money::from_major_minor(1190, 0));
        assert_eq!(quote.total_incl_vat, Money::from_major_minor(1487, 50));
        assert_eq!(quote.total_for(LineItemType::Glass), Money::from_major_minor(80, 0));
    }

    #[test]
    fn test_total_cost_is_quantity_times_price() {
        let mut order = ItemizedFrameOrder::new(3, DimensionInput::outer(287.0, 411.0));
        order.add_item(FrameOrderLineItem::from_material(
            LineItemType::Backing,
            &MaterialSelection::new("b", "Board", "BAK-1", Money::from_minor(8_999)),
        ));

        let quote = order.price(&PricingParams::default()).unwrap();
        let line = &quote.items[0];
        assert_eq!(line.total_cost, line.unit_price.scale(line.quantity));
        assert_eq!(quote.total_excl_vat, line.total_cost);
    }

    #[test]
    fn test_items_come_back_in_sort_order() {
        let mut order = order_400_500(1);
        let mut late = FrameOrderLineItem::custom("Late", 1.0, Money::from_minor(100));
        late.sort_order = 9;
        let mut early = FrameOrderLineItem::custom("Early", 1.0, Money::from_minor(100));
        early.sort_order = 1;
        order.items = vec![late, early];

        let quote = order.price(&PricingParams::default()).unwrap();
        assert_eq!(quote.items[0].item_name, "Early");
        assert_eq!(quote.items[1].item_name, "Late");
    }

    #[test]
    fn test_add_item_appends_sort_order() {
        let mut order = order_400_500(1);
        order.add_item(FrameOrderLineItem::custom("A", 1.0, Money::zero()));
        order.add_item(FrameOrderLineItem::custom("B", 1.0, Money::zero()));
        assert_eq!(order.items[0].sort_order, 0);
        assert_eq!(order.items[1].sort_order, 1);

        assert!(order.remove_item(0).is_some());
        assert!(order.remove_item(5).is_none());
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_invalid_items_are_rejected() {
        let mut order = order_400_500(1);
        order.add_item(FrameOrderLineItem::custom("  ", 1.0, Money::from_minor(100)));
        assert!(matches!(
            order.price(&PricingParams::default()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut order = order_400_500(1);
        order.add_item(FrameOrderLineItem::labor("Framing", -1.0, Money::from_minor(100)));
        assert!(order.price(&PricingParams::default()).is_err());

        let mut order = order_400_500(1);
        order.add_item(FrameOrderLineItem::from_material(
            LineItemType::Glass,
            &MaterialSelection::new("g", "Glass", "GLA-1", Money::from_minor(-1)),
        ));
        assert!(order.price(&PricingParams::default()).is_err());
    }

    #[test]
    fn test_metadata_survives_pricing() {
        let mut order = order_400_500(1);
        order.add_item(
            FrameOrderLineItem::from_material(LineItemType::Passepartout, &snapshot("p", 300))
                .with_metadata("layer", json!(2)),
        );

        let quote = order.price(&PricingParams::default()).unwrap();
        assert_eq!(quote.items[0].metadata.get("layer"), Some(&json!(2)));
    }

    #[test]
    fn test_line_item_json_shape() {
        let item = FrameOrderLineItem::from_material(LineItemType::Frame, &snapshot("12", 100));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["item_type"], "frame");
        assert_eq!(value["item_sku"], "SKU-12");
        assert_eq!(value["unit"], "meter");
        assert_eq!(value["unit_price"], 10_000);
    }
}
