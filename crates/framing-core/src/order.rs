//! # Customer Orders
//!
//! A customer order aggregates one or more priced frame orders and moves
//! through a fixed lifecycle.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Offert ──► Ej påbörjad ──► Påbörjad ──► Klart ──► Utlämnad           │
//! │   (quote)    (not started)   (in progress) (done)   (delivered)         │
//! │                                                                         │
//! │   • moves go forward only, skipping steps is allowed                   │
//! │   • Utlämnad is terminal: no edits, no deletion, no further moves      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Order Numbers
//! `YYYY-NNNN`, restarting at `0001` every year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::aggregate::PriceCalculationResult;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::itemized::ItemizedQuote;
use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of a customer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Offert")]
    Quote,
    #[serde(rename = "Ej påbörjad")]
    NotStarted,
    #[serde(rename = "Påbörjad")]
    InProgress,
    #[serde(rename = "Klart")]
    Done,
    #[serde(rename = "Utlämnad")]
    Delivered,
}

impl OrderStatus {
    /// Statuses in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Quote,
        OrderStatus::NotStarted,
        OrderStatus::InProgress,
        OrderStatus::Done,
        OrderStatus::Delivered,
    ];

    /// Display label, as stored.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Quote => "Offert",
            OrderStatus::NotStarted => "Ej påbörjad",
            OrderStatus::InProgress => "Påbörjad",
            OrderStatus::Done => "Klart",
            OrderStatus::Delivered => "Utlämnad",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Quote => 0,
            OrderStatus::NotStarted => 1,
            OrderStatus::InProgress => 2,
            OrderStatus::Done => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// The following status, `None` once delivered.
    pub fn next(&self) -> Option<OrderStatus> {
        OrderStatus::ALL.get(self.rank() as usize + 1).copied()
    }

    /// Delivered orders are read-only.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    /// Validates a move to `to`.
    ///
    /// Only forward moves (skipping allowed) and staying in the same
    /// non-terminal status pass. Backward moves such as Klart → Påbörjad
    /// are rejected, which is stricter than the manual workflow where any
    /// status could be picked.
    pub fn transition_to(&self, to: OrderStatus) -> CoreResult<OrderStatus> {
        let allowed = !self.is_terminal() && to.rank() >= self.rank();
        if allowed {
            Ok(to)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self.label().to_string(),
                to: to.label().to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    /// Accepts the stored labels (any case) and the older English values
    /// (`draft`, `confirmed`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let status = match normalized.as_str() {
            "offert" | "draft" | "quote" => OrderStatus::Quote,
            "ej påbörjad" | "confirmed" | "not_started" => OrderStatus::NotStarted,
            "påbörjad" | "in_progress" => OrderStatus::InProgress,
            "klart" | "done" | "completed" => OrderStatus::Done,
            "utlämnad" | "delivered" => OrderStatus::Delivered,
            _ => {
                return Err(ValidationError::NotAllowed {
                    field: "status".to_string(),
                    allowed: OrderStatus::ALL.iter().map(|s| s.label().to_string()).collect(),
                })
            }
        };
        Ok(status)
    }
}

// =============================================================================
// Frame Order
// =============================================================================

/// How a frame order was priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FramePricing {
    /// Fixed material slots, simple or standard method.
    Fixed(PriceCalculationResult),
    /// Free list of line items.
    Itemized(ItemizedQuote),
}

impl FramePricing {
    pub fn total_excl_vat(&self) -> Money {
        match self {
            FramePricing::Fixed(result) => result.total_excl_vat,
            FramePricing::Itemized(quote) => quote.total_excl_vat,
        }
    }

    pub fn vat_amount(&self) -> Money {
        match self {
            FramePricing::Fixed(result) => result.vat_amount,
            FramePricing::Itemized(quote) => quote.vat_amount,
        }
    }

    pub fn total_incl_vat(&self) -> Money {
        match self {
            FramePricing::Fixed(result) => result.total_incl_vat,
            FramePricing::Itemized(quote) => quote.total_incl_vat,
        }
    }
}

/// One framed piece (or batch of identical pieces) on a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FrameOrder {
    #[ts(as = "String")]
    pub id: Uuid,
    #[serde(default)]
    pub motif: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub pricing: FramePricing,
}

impl FrameOrder {
    pub fn new(pricing: FramePricing) -> Self {
        FrameOrder {
            id: Uuid::new_v4(),
            motif: None,
            notes: None,
            pricing,
        }
    }
}

// =============================================================================
// Customer Order
// =============================================================================

/// An order as the customer sees it, holding its frame orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerOrder {
    #[ts(as = "String")]
    pub id: Uuid,
    pub order_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub frames: Vec<FrameOrder>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CustomerOrder {
    /// Creates an empty quote.
    ///
    /// ## Errors
    /// `CoreError::InvalidOrderNumber` unless the number is `YYYY-NNNN`.
    pub fn new(order_number: impl Into<String>, created_at: DateTime<Utc>) -> CoreResult<Self> {
        let order_number = order_number.into();
        parse_order_number(&order_number)?;
        Ok(CustomerOrder {
            id: Uuid::new_v4(),
            order_number,
            customer_name: None,
            status: OrderStatus::Quote,
            frames: Vec::new(),
            created_at,
        })
    }

    /// Fails with `OrderLocked` once the order is delivered.
    pub fn ensure_editable(&self) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::OrderLocked {
                order_number: self.order_number.clone(),
                status: self.status.label().to_string(),
            });
        }
        Ok(())
    }

    /// Same rule as editing: delivered orders cannot be deleted.
    pub fn ensure_deletable(&self) -> CoreResult<()> {
        self.ensure_editable()
    }

    pub fn add_frame(&mut self, frame: FrameOrder) -> CoreResult<Uuid> {
        self.ensure_editable()?;
        let id = frame.id;
        self.frames.push(frame);
        Ok(id)
    }

    /// Overwrites the pricing of a frame order after a re-edit.
    pub fn replace_pricing(&mut self, frame_id: Uuid, pricing: FramePricing) -> CoreResult<()> {
        self.ensure_editable()?;
        let frame = self
            .frames
            .iter_mut()
            .find(|f| f.id == frame_id)
            .ok_or_else(|| CoreError::FrameNotFound(frame_id.to_string()))?;
        frame.pricing = pricing;
        Ok(())
    }

    pub fn remove_frame(&mut self, frame_id: Uuid) -> CoreResult<FrameOrder> {
        self.ensure_editable()?;
        let index = self
            .frames
            .iter()
            .position(|f| f.id == frame_id)
            .ok_or_else(|| CoreError::FrameNotFound(frame_id.to_string()))?;
        Ok(self.frames.remove(index))
    }

    pub fn set_status(&mut self, to: OrderStatus) -> CoreResult<()> {
        self.status = self.status.transition_to(to)?;
        Ok(())
    }

    pub fn total_excl_vat(&self) -> Money {
        self.frames.iter().map(|f| f.pricing.total_excl_vat()).sum()
    }

    pub fn vat_amount(&self) -> Money {
        self.frames.iter().map(|f| f.pricing.vat_amount()).sum()
    }

    pub fn total_incl_vat(&self) -> Money {
        self.frames.iter().map(|f| f.pricing.total_incl_vat()).sum()
    }
}

// =============================================================================
// Order Numbering
// =============================================================================

/// Splits `YYYY-NNNN` into year and sequence.
pub fn parse_order_number(order_number: &str) -> CoreResult<(i32, u32)> {
    let invalid = || CoreError::InvalidOrderNumber(order_number.to_string());

    let (year, sequence) = order_number.split_once('-').ok_or_else(invalid)?;
    let well_formed = year.len() == 4
        && sequence.len() >= 4
        && year.chars().all(|c| c.is_ascii_digit())
        && sequence.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let sequence = sequence.parse::<u32>().map_err(|_| invalid())?;
    Ok((year, sequence))
}

/// Next order number for `year`, given the highest number issued so far.
///
/// ## Example
/// ```rust
/// use framing_core::order::next_order_number;
///
/// assert_eq!(next_order_number(2025, None).unwrap(), "2025-0001");
/// assert_eq!(next_order_number(2025, Some("2025-0041")).unwrap(), "2025-0042");
/// assert_eq!(next_order_number(2026, Some("2025-0999")).unwrap(), "2026-0001");
/// ```
pub fn next_order_number(year: i32, latest: Option<&str>) -> CoreResult<String> {
    let next = match latest {
        Some(latest) => {
            let (latest_year, sequence) = parse_order_number(latest)?;
            if latest_year == year {
                sequence + 1
            } else {
                1
            }
        }
        None => 1,
    };
    Ok(format!("{:04}-{:04}", year, next))
}

// =============================================================================
// Unit Tests
// =============================================================================
