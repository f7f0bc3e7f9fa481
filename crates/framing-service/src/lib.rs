//! # framing-service: Pricing Orchestration
//!
//! Everything around the pure engine that needs I/O: configuration,
//! tracing, catalog lookups and templates.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  JSON body ──► FrameOrderRequest (lenient decode, framing-core)         │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │               QuoteService ──► MaterialCatalog  (price snapshots)       │
//! │                       │    ──► FramingConfig    (VAT, currency, ...)    │
//! │                       │    ──► TemplateStore    (itemized presets)      │
//! │                       ▼                                                 │
//! │         framing_core::calculate_frame_order_price                       │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │     PriceCalculationResult  /  ApiError { code, message }               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration, per-tenant parameters
//! - [`catalog`] - Material lookups and the in-memory catalog
//! - [`templates`] - Template read path
//! - [`quote`] - Preview and save flows
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Service errors and the JSON error envelope

pub mod catalog;
pub mod config;
pub mod error;
pub mod quote;
pub mod telemetry;
pub mod templates;

pub use catalog::{CatalogMaterial, InMemoryCatalog, MaterialCatalog};
pub use config::{FramingConfig, PricingSettings, TenantOverrides};
pub use error::{ApiError, ConfigError, ErrorCode, ServiceError, ServiceResult};
pub use quote::{MaterialLookup, QuoteService};
pub use telemetry::init_tracing;
pub use templates::{InMemoryTemplateStore, TemplateStore};
