//! # framing-core: Pure Frame-Order Pricing
//!
//! This crate is the **heart** of the framing back-office. It turns the
//! physical description of a framed piece into a locked, VAT-inclusive
//! cost breakdown, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Framing Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Order form (TypeScript)                      │   │
//! │  │     dimensions ──► materials ──► live preview ──► save         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    framing-service                              │   │
//! │  │    config, catalog lookups, template store, QuoteService       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ framing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   dimension ──► geometry ──► pricing ──► aggregate              │   │
//! │  │                                 │                               │   │
//! │  │                             itemized ◄── template               │   │
//! │  │                                 │                               │   │
//! │  │                               order (status machine, totals)    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`dimension`] - Outer size from direct input or motif + borders
//! - [`geometry`] - Perimeter, areas, mitered frame length
//! - [`pricing`] - Simple and standard pricing strategies
//! - [`aggregate`] - Quantity, VAT and rounding into the final result
//! - [`itemized`] - Line-item orders with derived quantities
//! - [`template`] - Reusable line-item presets
//! - [`order`] - Customer orders, status machine, order numbers
//! - [`request`] - Lenient decoding of the order form body
//! - [`money`] - Integer money (öre)
//! - [`types`] - Shared domain types
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, bit-identical output
//! 2. **No I/O**: prices arrive already resolved; nothing is persisted here
//! 3. **Integer Money**: costs are öre (i64), consumption stays f64
//! 4. **Explicit Parameters**: VAT, currency and rounding are passed per call
//!
//! ## Example Usage
//!
//! ```rust
//! use framing_core::{
//!     calculate_frame_order_price, BorderEdges, CalculationMethod, DimensionInput,
//!     FrameOrderInput, Money, PricingParams,
//! };
//!
//! let input = FrameOrderInput {
//!     quantity: 1,
//!     method: CalculationMethod::Simple,
//!     dimensions: DimensionInput::motif(300.0, 400.0, BorderEdges::uniform(50.0)),
//!     manual_price_per_meter: Some(Money::from_major_minor(250, 0)),
//!     ..FrameOrderInput::default()
//! };
//!
//! let result = calculate_frame_order_price(&input, &PricingParams::default());
//! assert_eq!(result.total_excl_vat.to_string(), "450.00");
//! assert_eq!(result.total_incl_vat.to_string(), "562.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod dimension;
pub mod error;
pub mod geometry;
pub mod itemized;
pub mod money;
pub mod order;
pub mod pricing;
pub mod request;
pub mod template;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{OrderCostAggregator, PriceCalculationResult};
pub use dimension::{BorderEdges, Dimension, DimensionInput};
pub use error::{CoreError, CoreResult, ValidationError};
pub use geometry::Geometry;
pub use itemized::{FrameOrderLineItem, ItemizedFrameOrder, ItemizedQuote, LineItemType};
pub use money::Money;
pub use order::{CustomerOrder, FrameOrder, FramePricing, OrderStatus};
pub use pricing::{calculate_frame_order_price, FrameOrderInput, PricingStrategy};
pub use request::{FrameOrderRequest, RequestDefaults};
pub use template::OrderTemplate;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Swedish standard VAT (moms), 25%, in basis points.
pub const DEFAULT_VAT_BPS: u32 = 2500;

/// Maximum number of identical pieces on one frame order.
///
/// ## Business Reason
/// Catches typos such as 1000 instead of 10 before they reach an invoice.
pub const MAX_ITEM_QUANTITY: i64 = 999;
