//! # Configuration Management Module
//!
//! Shop configuration is read once at load (or reload) time from a TOML file
//! and never mutated afterwards; a reload builds a fresh
//! [`ShopContext`](crate::context::ShopContext).
//!
//! ## Configuration Structure
//!
//! - [`ShopSettings`] - server-shop marker, protection toggles, owner auto-fill
//! - [`PatternConfig`] - `[buy]` / `[sell]` rate line patterns
//! - `[currencies]` - currency token to item name
//! - `[aliases]` / `[names]` - material aliases and custom display names
//! - [`PermissionsConfig`] - admin, build and use capabilities
//! - [`LoggingConfig`] / [`StorageConfig`]
//!
//! ## Configuration File Format
//!
//! ```toml
//! [shop]
//! server_shop = "[Server]"
//! shop_block_blacklist = ["FURNACE"]
//!
//! [buy]
//! mode = "MATCH"
//! pattern = '(?i)buy\s+(\d+)\s+for\s+(\d+)\s*(\S+)'
//! amount_index = 1
//! price_index = 2
//! currency_index = 3
//!
//! [currencies]
//! g = "Gold Ingot"
//! d = "Diamond"
//! ```
//!
//! Every section is optional; missing sections fall back to [`Config::default`].

pub mod materials;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::fs;

pub use materials::MaterialConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shop: ShopSettings,
    #[serde(default = "default_buy_pattern")]
    pub buy: PatternConfig,
    #[serde(default = "default_sell_pattern")]
    pub sell: PatternConfig,
    /// Currency token (as written on signs) to item name.
    #[serde(default = "default_currencies")]
    pub currencies: BTreeMap<String, String>,
    /// Extra names accepted on the material line, alias to item name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Custom display names, item name (`kind` or `kind:variant`) to text.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Owner-line token marking an unlimited, admin-built server shop.
    #[serde(default = "default_server_shop")]
    pub server_shop: String,
    /// Use the full stock report in status output.
    #[serde(default = "default_true")]
    pub detailed_output: bool,
    /// Overwrite the owner line with the creator's name on sign creation.
    #[serde(default = "default_true")]
    pub auto_fill_name: bool,
    /// Owner lines are registry short keys. Auto-fill writes keys instead of
    /// truncated names; owner matching goes through the registry.
    #[serde(default)]
    pub extended_names: bool,
    #[serde(default = "default_true")]
    pub protect_break: bool,
    #[serde(default = "default_true")]
    pub protect_explode: bool,
    #[serde(default = "default_true")]
    pub protect_chest_access: bool,
    /// Refuse shop signs over a container that already exists.
    #[serde(default = "default_true")]
    pub protect_existing_chest: bool,
    /// Admins skip the existing-container check when creating shops.
    #[serde(default = "default_true")]
    pub admin_bypasses_existing_chest: bool,
    /// Pulse a lever or button behind a wall sign after each trade.
    #[serde(default)]
    pub trigger_redstone: bool,
    /// Container kinds that may not back a shop.
    #[serde(default)]
    pub shop_block_blacklist: Vec<String>,
    /// Regex whose first group extracts the material from line one.
    #[serde(default = "default_material_pattern")]
    pub material_pattern: String,
}

impl ShopSettings {
    /// Whether auto-fill writes registry keys.
    pub fn uses_extended_names(&self) -> bool {
        self.auto_fill_name && self.extended_names
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            server_shop: default_server_shop(),
            detailed_output: true,
            auto_fill_name: true,
            extended_names: false,
            protect_break: true,
            protect_explode: true,
            protect_chest_access: true,
            protect_existing_chest: true,
            admin_bypasses_existing_chest: true,
            trigger_redstone: false,
            shop_block_blacklist: Vec::new(),
            material_pattern: default_material_pattern(),
        }
    }
}

/// One rate line definition (`[buy]` or `[sell]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// "MATCH" or "SPLIT".
    pub mode: String,
    pub pattern: String,
    pub amount_index: usize,
    pub price_index: usize,
    pub currency_index: usize,
    /// SPLIT mode: text placed between fields when rendering a line.
    #[serde(default = "default_joiner")]
    pub joiner: String,
    /// SPLIT mode: text placed in slots that carry no field when rendering.
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Players with the admin override.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Whether players not listed in `builders` may create shops.
    #[serde(default = "default_true")]
    pub default_build: bool,
    /// Whether players not listed in `users` may trade.
    #[serde(default = "default_true")]
    pub default_use: bool,
    #[serde(default)]
    pub builders: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    /// Players denied build and use regardless of the defaults.
    #[serde(default)]
    pub banned: Vec<String>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            default_build: true,
            default_use: true,
            builders: Vec::new(),
            users: Vec::new(),
            banned: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<String>,
    /// Completed trades (log target `transactions`) are also appended here.
    #[serde(default)]
    pub transactions_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("signshop.log".to_string()),
            transactions_file: Some("signshop-transactions.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// JSON file backing the extended-name registry; in-memory when unset.
    #[serde(default)]
    pub name_registry: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_shop() -> String {
    "[Server]".to_string()
}

fn default_material_pattern() -> String {
    r"^\s*(.*?)\s*$".to_string()
}

fn default_joiner() -> String {
    " ".to_string()
}

fn default_buy_pattern() -> PatternConfig {
    PatternConfig {
        mode: "MATCH".to_string(),
        pattern: r"(?i)buy\s+(\d+)\s+for\s+(\d+)\s*(\S+)".to_string(),
        amount_index: 1,
        price_index: 2,
        currency_index: 3,
        joiner: default_joiner(),
        label: "Buy".to_string(),
    }
}

fn default_sell_pattern() -> PatternConfig {
    PatternConfig {
        mode: "MATCH".to_string(),
        pattern: r"(?i)sell\s+(\d+)\s+for\s+(\d+)\s*(\S+)".to_string(),
        amount_index: 1,
        price_index: 2,
        currency_index: 3,
        joiner: default_joiner(),
        label: "Sell".to_string(),
    }
}

fn default_currencies() -> BTreeMap<String, String> {
    let mut currencies = BTreeMap::new();
    currencies.insert("g".to_string(), "Gold Ingot".to_string());
    currencies
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        Self::from_toml_str(&content).map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shop: ShopSettings::default(),
            buy: default_buy_pattern(),
            sell: default_sell_pattern(),
            currencies: default_currencies(),
            aliases: BTreeMap::new(),
            names: BTreeMap::new(),
            permissions: PermissionsConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
