//! # Order Templates
//!
//! Reusable presets of line items and default passepartout edges.
//!
//! Storage is a collaborator concern; this module only knows how a template
//! is shaped and how it is applied to (or derived from) an itemized order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::dimension::BorderEdges;
use crate::itemized::{FrameOrderLineItem, ItemizedFrameOrder, QuantityRule};
use crate::money::Money;

/// A named preset for itemized frame orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTemplate {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<FrameOrderLineItem>,
    /// Passepartout edges pre-filled on orders that have none.
    #[serde(default)]
    pub default_edges: BorderEdges,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        OrderTemplate {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            items: Vec::new(),
            default_edges: BorderEdges::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Pre-populates `order` with this template.
    ///
    /// The order's items are replaced. Default edges are only copied when
    /// the order has no border of its own. Derived quantities are reset so
    /// the next pricing run computes them from the order's geometry.
    pub fn apply(&self, order: &mut ItemizedFrameOrder) {
        order.items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut item = item.clone();
                if item.item_type.quantity_rule() != QuantityRule::Manual {
                    item.quantity = 0.0;
                }
                item.total_cost = Money::zero();
                if item.sort_order == 0 {
                    item.sort_order = index as i32;
                }
                item
            })
            .collect();

        if !order.dimensions.edges.has_border() {
            order.dimensions.edges = self.default_edges;
        }
    }

    /// Captures the items and edges of an existing order as a new template.
    pub fn from_order(
        name: impl Into<String>,
        description: Option<String>,
        order: &ItemizedFrameOrder,
    ) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.item_type.quantity_rule() != QuantityRule::Manual {
                    item.quantity = 0.0;
                }
                item.total_cost = Money::zero();
                item
            })
            .collect();

        OrderTemplate {
            description,
            items,
            default_edges: order.dimensions.edges,
            ..OrderTemplate::new(name)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionInput;
    use crate::itemized::LineItemType;
    use crate::types::{MaterialSelection, PricingParams};

    fn standard_template() -> OrderTemplate {
        let moulding = MaterialSelection::new("12", "Oak 20", "RAM-0012", Money::from_major_minor(100, 0));
        let glass = MaterialSelection::new("7", "Float glass", "GLA-0007", Money::from_major_minor(200, 0));

        let mut template = OrderTemplate::new("Standard oak");
        template.items = vec![
            FrameOrderLineItem::from_material(LineItemType::Frame, &moulding),
            FrameOrderLineItem::from_material(LineItemType::Glass, &glass),
            FrameOrderLineItem::labor("Framing", 0.5, Money::from_major_minor(400, 0)),
        ];
        template.default_edges = BorderEdges::uniform(50.0);
        template
    }

    #[test]
    fn test_apply_fills_items_and_edges() {
        let template = standard_template();
        let mut order = ItemizedFrameOrder::new(1, DimensionInput {
            motif_width_mm: Some(300.0),
            motif_height_mm: Some(400.0),
            ..DimensionInput::default()
        });

        template.apply(&mut order);

        assert_eq!(order.items.len(), 3);
        assert_eq!(order.dimensions.edges, BorderEdges::uniform(50.0));
        assert_eq!(order.items[2].sort_order, 2);

        let quote = order.price(&PricingParams::default()).unwrap();
        // 400×500 after the template edges
        assert_eq!(quote.items[0].quantity, 1.8);
        assert_eq!(quote.items[1].quantity, 0.2);
        assert_eq!(quote.items[2].quantity, 0.5);
    }

    #[test]
    fn test_apply_keeps_existing_edges() {
        let template = standard_template();
        let mut order = ItemizedFrameOrder::new(
            1,
            DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(20.0)),
        );

        template.apply(&mut order);
        assert_eq!(order.dimensions.edges, BorderEdges::uniform(20.0));
    }

    #[test]
    fn test_from_order_clears_derived_values() {
        let mut order = ItemizedFrameOrder::new(
            2,
            DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(40.0)),
        );
        let mut frame = FrameOrderLineItem::from_material(
            LineItemType::Frame,
            &MaterialSelection::new("12", "Oak 20", "RAM-0012", Money::from_major_minor(100, 0)),
        );
        frame.quantity = 3.6;
        frame.total_cost = Money::from_major_minor(360, 0);
        order.items.push(frame);
        order.items.push(FrameOrderLineItem::labor("Framing", 1.0, Money::from_major_minor(400, 0)));

        let template = OrderTemplate::from_order("Copied", Some("from order".to_string()), &order);

        assert_eq!(template.name, "Copied");
        assert_eq!(template.default_edges, BorderEdges::uniform(40.0));
        assert_eq!(template.items[0].quantity, 0.0);
        assert_eq!(template.items[0].total_cost, Money::zero());
        assert_eq!(template.items[0].unit_price, Money::from_major_minor(100, 0));
        assert_eq!(template.items[1].quantity, 1.0);
    }

    #[test]
    fn test_template_json_defaults() {
        let json = r#"{"id":"6f1c1f7e-3c2a-4d8e-9a51-0d7c2f1b9e10","name":"Empty"}"#;
        let template: OrderTemplate = serde_json::from_str(json).unwrap();
        assert!(template.items.is_empty());
        assert!(!template.default_edges.has_border());
        assert!(template.created_at.is_none());
    }
}
