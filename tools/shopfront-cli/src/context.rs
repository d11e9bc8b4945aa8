//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use shopfront_cache::{Clock, FileStorage, SystemClock};
use shopfront_commerce::cart::{CartStore, SharedCart};
use shopfront_commerce::catalog::{selection_key, SelectionSlot};
use shopfront_commerce::ProductId;
use shopfront_data::{FetchClient, HttpCheckoutGateway, HttpProductSource, ViaCepLookup};

use crate::config::{CliConfig, CHECKOUT_URL_ENV, PRODUCT_URL_ENV};
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
const CONFIG_NAMES: [&str; 3] = ["shopfront.toml", ".shopfront.toml", "shopfront.json"];

/// Storage file shared by every command.
pub type Store = Arc<FileStorage>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if any.
    pub config_path: Option<PathBuf>,
    /// Wall clock for persisted timestamps.
    pub clock: Arc<dyn Clock>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config_path, mut config) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                let config = CliConfig::load(&path)?;
                (Some(path), config)
            }
            None => match find_config(&cwd) {
                Some((path, config)) => (Some(path), config),
                None => (None, CliConfig::default()),
            },
        };
        config.apply_env();
        tracing::debug!(config = ?config_path, "configuration loaded");

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
            clock: Arc::new(SystemClock),
        })
    }

    /// Directory that relative storage paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd)
    }

    /// Open the storage file and hydrate the cart from it.
    pub fn open_shop(&self) -> Result<Shop> {
        let path = resolve(self.base_dir(), &self.config.storage.path);
        let storage = Arc::new(
            FileStorage::open(&path)
                .with_context(|| format!("Failed to open storage: {}", path.display()))?,
        );
        let store = CartStore::hydrate(
            storage.clone(),
            self.config.currency()?,
            self.clock.clone(),
            self.config.expiry_policy(),
        );
        Ok(Shop {
            storage,
            cart: SharedCart::new(store),
        })
    }

    /// HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<FetchClient> {
        FetchClient::new(Duration::from_secs(self.config.api.timeout_secs))
            .context("Failed to create HTTP client")
    }

    /// Product source for the configured product URL.
    pub fn product_source(&self) -> Result<HttpProductSource> {
        let Some(url) = self.config.api.product_url.as_deref() else {
            bail!(
                "No product URL configured. Set api.product_url in shopfront.toml or {}.",
                PRODUCT_URL_ENV
            );
        };
        Ok(HttpProductSource::new(self.http_client()?, url).with_currency(self.config.currency()?))
    }

    /// Checkout gateway for the configured checkout URL.
    pub fn checkout_gateway(&self) -> Result<HttpCheckoutGateway> {
        let Some(url) = self.config.api.checkout_url.as_deref() else {
            bail!(
                "No checkout URL configured. Set api.checkout_url in shopfront.toml or {}.",
                CHECKOUT_URL_ENV
            );
        };
        Ok(HttpCheckoutGateway::new(self.http_client()?, url))
    }

    /// Postal code lookup.
    pub fn address_lookup(&self) -> Result<ViaCepLookup> {
        Ok(ViaCepLookup::new(
            self.http_client()?,
            &self.config.api.postal_lookup_url,
        ))
    }

    /// Snapshot slot holding the product page state for `product_id`.
    pub fn selection_slot(
        &self,
        shop: &Shop,
        product_id: ProductId,
    ) -> SelectionSlot<Store> {
        SelectionSlot::new(
            shop.storage.clone(),
            selection_key(product_id),
            self.config.selection_ttl(),
            self.clock.clone(),
        )
    }
}

/// Per-run handles: the storage file and the one cart built on it.
pub struct Shop {
    /// Durable storage.
    pub storage: Store,
    /// The shared cart.
    pub cart: SharedCart<Store>,
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match CliConfig::load(&config_path) {
                    Ok(config) => return Some((config_path, config)),
                    Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "skipping unreadable config"),
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
