//! # Service Errors
//!
//! Error types for the orchestration layer, and the serializable envelope
//! returned to the order form.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  │                                      │
//! │  ConfigError ────────────────────┼──► ServiceError ──► ApiError (JSON)  │
//! │                                  │                                      │
//! │  catalog / template lookups ─────┘                                      │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await api.saveFrame(orderId, form)                                   │
//! │  } catch (e) {                                                          │
//! │    // e.code    = "ORDER_LOCKED"                                        │
//! │    // e.message = "Order 2025-0042 is Utlämnad and can no longer ..."   │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use framing_core::{CoreError, MaterialSlot, ValidationError};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// The config file could not be written.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

// =============================================================================
// Service Error
// =============================================================================

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A material id on the form does not exist in the catalog.
    #[error("{slot} material not found: {id}")]
    MaterialNotFound { slot: MaterialSlot, id: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The inventory collaborator failed.
    #[error("Catalog unavailable: {0}")]
    Catalog(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error envelope returned by the JSON endpoints.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "frame material not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Order is delivered and read-only (409)
    OrderLocked,

    /// Business rule violated (422)
    BusinessLogic,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderLocked { .. } => ApiError::new(ErrorCode::OrderLocked, err.to_string()),
            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::FrameNotFound(id) => ApiError::not_found("Frame order", &id),
            CoreError::EmptyOrder
            | CoreError::QuantityTooLarge { .. }
            | CoreError::InvalidOrderNumber(_) => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts service errors to API errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::MaterialNotFound { slot, id } => {
                ApiError::not_found(&format!("{} material", slot), &id)
            }
            ServiceError::TemplateNotFound(id) => ApiError::not_found("Template", &id),
            ServiceError::Config(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Configuration error: {}", e);
                ApiError::internal("Service is misconfigured")
            }
            ServiceError::Catalog(e) => {
                tracing::error!("Catalog lookup failed: {}", e);
                ApiError::internal("Material catalog is unavailable")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
