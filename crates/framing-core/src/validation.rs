//! # Validation Module
//!
//! Input validation for orders, catalog items and pricing parameters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Order form (TypeScript)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request decoding (request.rs)                                │
//! │  ├── Lenient: bad numbers become "unset", never an error               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  ├── Business rules before an order or item is saved                   │
//! │  └── Live previews skip this layer entirely                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use framing_core::validation::{validate_sku, validate_order_quantity};
//!
//! validate_sku("RAM-0001").unwrap();
//! assert_eq!(validate_order_quantity(0).unwrap(), 1);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest SKU the catalog stores.
pub const MAX_SKU_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use framing_core::validation::validate_sku;
///
/// assert!(validate_sku("RAM-0001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required, bounded text field such as a material name.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Three-letter SKU prefix derived from a catalog category.
///
/// Letters only (å, ä and ö included), uppercased, padded with `X`.
/// A category without letters gives `UNK`.
///
/// ## Example
/// ```rust
/// use framing_core::validation::sku_prefix;
///
/// assert_eq!(sku_prefix("Ramlist"), "RAM");
/// assert_eq!(sku_prefix("Glas"), "GLA");
/// assert_eq!(sku_prefix("PP"), "PPX");
/// assert_eq!(sku_prefix("123"), "UNK");
/// ```
pub fn sku_prefix(category: &str) -> String {
    let letters: String = category
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || "åäöÅÄÖ".contains(*c))
        .flat_map(char::to_uppercase)
        .take(3)
        .collect();

    if letters.is_empty() {
        return "UNK".to_string();
    }

    let mut prefix = letters;
    while prefix.chars().count() < 3 {
        prefix.push('X');
    }
    prefix
}

/// SKU for the `counter`-th item of a prefix, e.g. `RAM-0001`.
pub fn format_sku(prefix: &str, counter: u32) -> String {
    format!("{}-{:04}", prefix, counter)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Normalises an order quantity.
///
/// Values below 1 count as one piece. Values above `MAX_ITEM_QUANTITY`
/// are rejected rather than silently clamped.
pub fn validate_order_quantity(qty: i64) -> CoreResult<u32> {
    if qty > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(qty.max(1) as u32)
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (the material is then left unpriced)
///
/// ## Example
/// ```rust
/// use framing_core::money::Money;
/// use framing_core::validation::validate_price;
///
/// assert!(validate_price("sales_price", Money::from_minor(24_950)).is_ok());
/// assert!(validate_price("sales_price", Money::zero()).is_ok());
/// assert!(validate_price("sales_price", Money::from_minor(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a VAT rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_vat_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates an ISO 4217 style currency code: three ASCII letters.
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter code such as SEK".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Items
// =============================================================================

/// A catalog material about to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCatalogItem {
    pub name: String,
    /// Drives SKU generation when `sku` is empty.
    pub category: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<Money>,
    #[serde(default)]
    pub sales_price: Option<Money>,
}

impl NewCatalogItem {
    /// Sales price, falling back to purchase price × markup when unset.
    ///
    /// A markup of 250 means the sales price is 2.5 times the purchase
    /// price.
    pub fn effective_sales_price(&self, markup_percentage: Option<f64>) -> Money {
        match (self.sales_price, self.purchase_price, markup_percentage) {
            (Some(sales), _, _) => sales,
            (None, Some(purchase), Some(markup)) => purchase.scale(markup / 100.0),
            _ => Money::zero(),
        }
    }
}

/// Validates a new catalog item.
///
/// ## Rules
/// - `name` and `category` are required
/// - `sku`, when given and non-blank, must pass [`validate_sku`]
/// - prices must not be negative
pub fn validate_new_catalog_item(item: &NewCatalogItem) -> ValidationResult<()> {
    validate_required_text("name", &item.name, 200)?;
    validate_required_text("category", &item.category, 100)?;

    if let Some(sku) = item.sku.as_deref().filter(|s| !s.trim().is_empty()) {
        validate_sku(sku)?;
    }
    if let Some(price) = item.purchase_price {
        validate_price("purchase_price", price)?;
    }
    if let Some(price) = item.sales_price {
        validate_price("sales_price", price)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Parses a template or order id.
///
/// ## Example
/// ```rust
/// use framing_core::validation::parse_uuid;
///
/// assert!(parse_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(parse_uuid("not-a-uuid").is_err());
/// ```
pub fn parse_uuid(id: &str) -> ValidationResult<Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
