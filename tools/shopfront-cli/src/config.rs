//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use shopfront_commerce::cart::ExpiryPolicy;
use shopfront_commerce::catalog::SelectionPolicy;
use shopfront_commerce::Currency;
use shopfront_data::VIACEP_BASE_URL;

/// Environment variable overriding `api.product_url`.
pub const PRODUCT_URL_ENV: &str = "SHOPFRONT_PRODUCT_URL";
/// Environment variable overriding `api.checkout_url`.
pub const CHECKOUT_URL_ENV: &str = "SHOPFRONT_CHECKOUT_URL";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Remote endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart behaviour.
    #[serde(default)]
    pub cart: CartConfig,

    /// Product page behaviour.
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply endpoint overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply endpoint overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(PRODUCT_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.product_url = Some(url);
        }
        if let Some(url) = lookup(CHECKOUT_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.checkout_url = Some(url);
        }
    }

    /// Cart currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.cart.currency)
            .ok_or_else(|| anyhow!("Unsupported currency in cart.currency: {}", self.cart.currency))
    }

    /// Expiry policy for the cart store.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            ttl: Duration::from_secs(self.cart.ttl_secs),
            sweep_interval: Duration::from_secs(self.cart.sweep_interval_secs.max(1)),
            refresh_on_quantity_edit: self.cart.refresh_on_quantity_edit,
        }
    }

    /// TTL of the product page snapshot.
    pub fn selection_ttl(&self) -> Duration {
        Duration::from_secs(self.selection.ttl_secs)
    }

    /// How often a running session sweeps the product page snapshot.
    pub fn selection_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.selection.sweep_interval_secs.max(1))
    }

    /// Presentation policy for variant selection.
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            reset_on_primary_change: self.selection.reset_on_primary_change,
        }
    }

    /// Collect configuration problems.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if Currency::from_code(&self.cart.currency).is_none() {
            errors.push(format!("cart.currency '{}' is not supported", self.cart.currency));
        }
        if self.cart.ttl_secs == 0 {
            errors.push("cart.ttl_secs must be positive".to_string());
        }
        if self.cart.sweep_interval_secs == 0 {
            errors.push("cart.sweep_interval_secs must be positive".to_string());
        }
        if self.selection.sweep_interval_secs == 0 {
            errors.push("selection.sweep_interval_secs must be positive".to_string());
        }
        if self.api.timeout_secs == 0 {
            errors.push("api.timeout_secs must be positive".to_string());
        }
        for (key, url) in [
            ("api.product_url", self.api.product_url.as_deref()),
            ("api.checkout_url", self.api.checkout_url.as_deref()),
            ("api.postal_lookup_url", Some(self.api.postal_lookup_url.as_str())),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    errors.push(format!("{key} must be an http(s) URL"));
                }
            }
        }
        errors
    }
}

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Product document URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,

    /// Checkout submission URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    /// Postal code lookup base URL.
    #[serde(default = "default_postal_lookup_url")]
    pub postal_lookup_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_postal_lookup_url() -> String {
    VIACEP_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            product_url: None,
            checkout_url: None,
            postal_lookup_url: default_postal_lookup_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Local persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file, relative to the config file's directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    ".shopfront/storage.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Cart behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Seconds before an untouched cart is discarded.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Seconds between expiry checks while a session is open.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Whether quantity-only edits extend the cart's life.
    #[serde(default)]
    pub refresh_on_quantity_edit: bool,
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_ttl_secs() -> u64 {
    15 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            refresh_on_quantity_edit: false,
        }
    }
}

/// Product page behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Seconds before a saved selection is discarded.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Seconds between expiry sweeps while a session runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Clear other choices when the first option changes.
    #[serde(default = "default_true")]
    pub reset_on_primary_change: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            reset_on_primary_change: true,
        }
    }
}

/// Generate a default shopfront.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Shopfront configuration

[api]
# product_url = "https://cdn.example.com/product.json"
# checkout_url = "https://checkout.example.com/api/orders"
postal_lookup_url = "{postal}"
timeout_secs = 10

[storage]
path = ".shopfront/storage.json"

[cart]
currency = "BRL"
ttl_secs = 900
sweep_interval_secs = 60
refresh_on_quantity_edit = false

[selection]
ttl_secs = 900
sweep_interval_secs = 60
reset_on_primary_change = true
"#,
        postal = VIACEP_BASE_URL
    )
}
