//! # Pricing Configuration
//!
//! Configuration for VAT, currency and rounding, per deployment and per
//! tenant.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FRAMING_VAT_PERCENTAGE=25   (MOMS_PERCENTAGE still honoured)       │
//! │     FRAMING_CURRENCY=SEK                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $FRAMING_CONFIG, or                                                │
//! │     ~/.config/framing/framing.toml (Linux)                             │
//! │     ~/Library/Application Support/se.artyx.framing/framing.toml        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     25% VAT, SEK, per-line rounding                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # framing.toml
//! [pricing]
//! vat_percentage = 25.0
//! currency = "SEK"
//! default_simple_price_per_meter = 250.0
//! default_passepartout_width_mm = 50.0
//! frame_profile_width_mm = 0.0
//! rounding = "per_line"   # per_line | legacy
//! zero_dimension_is_unset = false
//!
//! [tenants.oslo]
//! vat_percentage = 25.0
//! currency = "NOK"
//! ```
//!
//! The engine never reads any of this. [`FramingConfig::pricing_params`]
//! turns it into the explicit parameters passed on every call.

use std::collections::BTreeMap;
use std::path::PathBuf;

use framing_core::validation::{validate_currency_code, validate_vat_rate_bps};
use framing_core::{Money, PricingParams, RequestDefaults, RoundingPolicy, TaxRate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FRAMING_CONFIG";

// =============================================================================
// Pricing Settings
// =============================================================================

/// Deployment-wide pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// VAT (moms) in percent.
    #[serde(default = "default_vat_percentage")]
    pub vat_percentage: f64,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Price per metre used by the live preview when the simple method is
    /// selected and nothing was entered.
    #[serde(default = "default_simple_price_per_meter")]
    pub default_simple_price_per_meter: f64,

    /// Uniform mat width when the form gives no passepartout edges.
    #[serde(default = "default_passepartout_width_mm")]
    pub default_passepartout_width_mm: f64,

    /// Profile width added twice per dimension for mitered corners.
    #[serde(default)]
    pub frame_profile_width_mm: f64,

    #[serde(default)]
    pub rounding: RoundingPolicy,

    /// Treat an explicit 0 mm outer dimension as "not entered".
    #[serde(default)]
    pub zero_dimension_is_unset: bool,
}

fn default_vat_percentage() -> f64 {
    25.0
}

fn default_currency() -> String {
    "SEK".to_string()
}

fn default_simple_price_per_meter() -> f64 {
    250.0
}

fn default_passepartout_width_mm() -> f64 {
    50.0
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            vat_percentage: default_vat_percentage(),
            currency: default_currency(),
            default_simple_price_per_meter: default_simple_price_per_meter(),
            default_passepartout_width_mm: default_passepartout_width_mm(),
            frame_profile_width_mm: 0.0,
            rounding: RoundingPolicy::default(),
            zero_dimension_is_unset: false,
        }
    }
}

impl PricingSettings {
    fn validate(&self, scope: &str) -> Result<(), ConfigError> {
        if !self.vat_percentage.is_finite() || self.vat_percentage < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{}: vat_percentage must be between 0 and 100, got {}",
                scope, self.vat_percentage
            )));
        }
        validate_vat_rate_bps(TaxRate::from_percentage(self.vat_percentage).bps())
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", scope, e)))?;

        validate_currency_code(&self.currency)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", scope, e)))?;

        for (field, value) in [
            ("default_simple_price_per_meter", self.default_simple_price_per_meter),
            ("default_passepartout_width_mm", self.default_passepartout_width_mm),
            ("frame_profile_width_mm", self.frame_profile_width_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: {} must be zero or positive, got {}",
                    scope, field, value
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tenant Overrides
// =============================================================================

/// Per-tenant overrides. Unset fields inherit from `[pricing]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_simple_price_per_meter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_passepartout_width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_profile_width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<RoundingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_dimension_is_unset: Option<bool>,
}

impl TenantOverrides {
    fn merged_onto(&self, base: &PricingSettings) -> PricingSettings {
        PricingSettings {
            vat_percentage: self.vat_percentage.unwrap_or(base.vat_percentage),
            currency: self
                .currency
                .clone()
                .unwrap_or_else(|| base.currency.clone()),
            default_simple_price_per_meter: self
                .default_simple_price_per_meter
                .unwrap_or(base.default_simple_price_per_meter),
            default_passepartout_width_mm: self
                .default_passepartout_width_mm
                .unwrap_or(base.default_passepartout_width_mm),
            frame_profile_width_mm: self
                .frame_profile_width_mm
                .unwrap_or(base.frame_profile_width_mm),
            rounding: self.rounding.unwrap_or(base.rounding),
            zero_dimension_is_unset: self
                .zero_dimension_is_unset
                .unwrap_or(base.zero_dimension_is_unset),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramingConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    /// Overrides keyed by tenant id.
    #[serde(default)]
    pub tenants: BTreeMap<String, TenantOverrides>,
}

impl FramingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$FRAMING_CONFIG`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Validates the base settings and every tenant after merging.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pricing.validate("pricing")?;
        for (tenant, overrides) in &self.tenants {
            overrides
                .merged_onto(&self.pricing)
                .validate(&format!("tenants.{}", tenant))?;
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let vat = lookup("FRAMING_VAT_PERCENTAGE").or_else(|| lookup("MOMS_PERCENTAGE"));
        if let Some(vat) = vat {
            match vat.trim().parse::<f64>() {
                Ok(pct) => {
                    debug!(vat_percentage = pct, "Overriding VAT from environment");
                    self.pricing.vat_percentage = pct;
                }
                Err(_) => warn!(value = %vat, "Ignoring non-numeric VAT in environment"),
            }
        }

        if let Some(currency) = lookup("FRAMING_CURRENCY") {
            debug!(currency = %currency, "Overriding currency from environment");
            self.pricing.currency = currency.trim().to_uppercase();
        }

        if let Some(price) = lookup("FRAMING_SIMPLE_PRICE_PER_METER") {
            match price.trim().parse::<f64>() {
                Ok(p) => self.pricing.default_simple_price_per_meter = p,
                Err(_) => warn!(value = %price, "Ignoring non-numeric simple price in environment"),
            }
        }

        if let Some(rounding) = lookup("FRAMING_ROUNDING") {
            match rounding.parse::<RoundingPolicy>() {
                Ok(policy) => {
                    debug!(?policy, "Overriding rounding policy from environment");
                    self.pricing.rounding = policy;
                }
                Err(e) => warn!(error = %e, "Ignoring rounding policy from environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("se", "artyx", "framing")
            .map(|dirs| dirs.config_dir().join("framing.toml"))
    }

    // =========================================================================
    // Per-call Parameters
    // =========================================================================

    /// Effective settings for a tenant. Unknown tenants get the base settings.
    pub fn settings_for(&self, tenant: Option<&str>) -> PricingSettings {
        match tenant.and_then(|t| self.tenants.get(t)) {
            Some(overrides) => overrides.merged_onto(&self.pricing),
            None => self.pricing.clone(),
        }
    }

    /// Explicit pricing parameters for one calculation.
    pub fn pricing_params(&self, tenant: Option<&str>) -> PricingParams {
        let settings = self.settings_for(tenant);
        PricingParams {
            vat: TaxRate::from_percentage(settings.vat_percentage),
            currency: settings.currency,
            rounding: settings.rounding,
            zero_dimension_is_unset: settings.zero_dimension_is_unset,
        }
    }

    /// Fallbacks for empty form fields.
    ///
    /// The default simple price only applies to live previews; a saved
    /// order without a manual price has no frame cost.
    pub fn request_defaults(&self, tenant: Option<&str>, preview: bool) -> RequestDefaults {
        let settings = self.settings_for(tenant);
        RequestDefaults {
            passepartout_width_mm: settings.default_passepartout_width_mm,
            simple_price_per_meter: preview
                .then(|| Money::from_decimal(settings.default_simple_price_per_meter))
                .filter(|price| price.is_positive()),
            frame_profile_width_mm: settings.frame_profile_width_mm,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
        [pricing]
        vat_percentage = 25.0
        currency = "SEK"
        rounding = "legacy"

        [tenants.oslo]
        currency = "NOK"

        [tenants.books]
        vat_percentage = 6.0
    "#;

    #[test]
    fn test_default_config() {
        let config = FramingConfig::default();
        assert!(config.validate().is_ok());

        let params = config.pricing_params(None);
        assert_eq!(params.vat.bps(), 2500);
        assert_eq!(params.currency, "SEK");
        assert_eq!(params.rounding, RoundingPolicy::PerLine);
        assert!(!params.zero_dimension_is_unset);
    }

    #[test]
    fn test_toml_with_tenants() {
        let config: FramingConfig = toml::from_str(SAMPLE).unwrap();
        assert!(config.validate().is_ok());

        let base = config.pricing_params(None);
        assert_eq!(base.rounding, RoundingPolicy::Legacy);
        assert_eq!(config.pricing.default_passepartout_width_mm, 50.0);

        let oslo = config.pricing_params(Some("oslo"));
        assert_eq!(oslo.currency, "NOK");
        assert_eq!(oslo.vat.bps(), 2500);
        assert_eq!(oslo.rounding, RoundingPolicy::Legacy);

        let books = config.pricing_params(Some("books"));
        assert_eq!(books.vat.bps(), 600);
        assert_eq!(books.currency, "SEK");

        assert_eq!(config.pricing_params(Some("unknown")), base);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MOMS_PERCENTAGE", "12"),
            ("FRAMING_CURRENCY", "eur"),
            ("FRAMING_ROUNDING", "legacy"),
            ("FRAMING_SIMPLE_PRICE_PER_METER", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = FramingConfig::default();
        config.apply_env_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.pricing.vat_percentage, 12.0);
        assert_eq!(config.pricing.currency, "EUR");
        assert_eq!(config.pricing.rounding, RoundingPolicy::Legacy);
        assert_eq!(config.pricing.default_simple_price_per_meter, 250.0);
    }

    #[test]
    fn test_framing_vat_wins_over_moms() {
        let env: HashMap<&str, &str> = [("MOMS_PERCENTAGE", "12"), ("FRAMING_VAT_PERCENTAGE", "6")]
            .into_iter()
            .collect();

        let mut config = FramingConfig::default();
        config.apply_env_overrides_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.pricing.vat_percentage, 6.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = FramingConfig::default();

        config.pricing.vat_percentage = 101.0;
        assert!(config.validate().is_err());

        config.pricing.vat_percentage = -1.0;
        assert!(config.validate().is_err());

        config.pricing.vat_percentage = 25.0;
        config.pricing.currency = "KRONOR".to_string();
        assert!(config.validate().is_err());

        config.pricing.currency = "SEK".to_string();
        config.pricing.default_simple_price_per_meter = -5.0;
        assert!(config.validate().is_err());

        config.pricing.default_simple_price_per_meter = 250.0;
        config.tenants.insert(
            "bad".to_string(),
            TenantOverrides {
                currency: Some("X".to_string()),
                ..TenantOverrides::default()
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let config = FramingConfig::default();

        let preview = config.request_defaults(None, true);
        assert_eq!(preview.simple_price_per_meter, Some(Money::from_major_minor(250, 0)));
        assert_eq!(preview.passepartout_width_mm, 50.0);

        let save = config.request_defaults(None, false);
        assert_eq!(save.simple_price_per_meter, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("framing-{}", uuid::Uuid::new_v4()))
            .join("framing.toml");

        let config: FramingConfig = toml::from_str(SAMPLE).unwrap();
        config.save(Some(path.clone())).unwrap();

        let loaded: FramingConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        let config: FramingConfig = FramingConfig::load_or_default(Some(path));
        assert_eq!(config.pricing.currency.len(), 3);
    }
}
