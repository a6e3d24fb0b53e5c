//! The loaded shop environment.
//!
//! [`ShopContext`] owns everything a shop operation consults: settings,
//! material tables, both rate handlers, the container blacklist and the name
//! and permission collaborators. It is built once per configuration load and
//! passed by reference; a reload builds a new one.

use std::collections::HashSet;

use log::{info, warn};

use crate::config::{Config, MaterialConfig, ShopSettings};
use crate::names::{NameEquivalence, NameRegistry};
use crate::permissions::{ConfigPermissions, PermissionOracle};
use crate::shop::errors::ShopError;
use crate::shop::material::ItemKind;
use crate::shop::pattern::PatternHandler;

pub struct ShopContext {
    settings: ShopSettings,
    materials: MaterialConfig,
    buy_pattern: PatternHandler,
    sell_pattern: PatternHandler,
    blacklist: HashSet<ItemKind>,
    names: Box<dyn NameEquivalence>,
    permissions: Box<dyn PermissionOracle>,
}

impl ShopContext {
    /// Build from configuration with the config-driven collaborators.
    pub fn from_config(config: &Config) -> Result<Self, ShopError> {
        let materials = MaterialConfig::from_config(config)?;
        let buy_pattern = PatternHandler::from_config(&config.buy)?;
        let sell_pattern = PatternHandler::from_config(&config.sell)?;

        let mut blacklist = HashSet::new();
        for name in &config.shop.shop_block_blacklist {
            match ItemKind::match_name(name) {
                Some(kind) => {
                    blacklist.insert(kind);
                }
                None => warn!("Configuration error for shop block blacklist: unknown block '{}'", name),
            }
        }

        let names: Box<dyn NameEquivalence> = match &config.storage.name_registry {
            Some(path) => Box::new(NameRegistry::open(path)?),
            None => Box::new(NameRegistry::new()),
        };

        info!(
            "Shop context ready: {} blacklisted container kinds, buy mode {}, sell mode {}",
            blacklist.len(),
            buy_pattern.mode(),
            sell_pattern.mode()
        );

        Ok(Self {
            settings: config.shop.clone(),
            materials,
            buy_pattern,
            sell_pattern,
            blacklist,
            names,
            permissions: Box::new(ConfigPermissions::from_config(&config.permissions)),
        })
    }

    pub fn with_names(mut self, names: Box<dyn NameEquivalence>) -> Self {
        self.names = names;
        self
    }

    pub fn with_permissions(mut self, permissions: Box<dyn PermissionOracle>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    pub fn materials(&self) -> &MaterialConfig {
        &self.materials
    }

    pub fn buy_pattern(&self) -> &PatternHandler {
        &self.buy_pattern
    }

    pub fn sell_pattern(&self) -> &PatternHandler {
        &self.sell_pattern
    }

    pub fn names(&self) -> &dyn NameEquivalence {
        self.names.as_ref()
    }

    pub fn names_mut(&mut self) -> &mut dyn NameEquivalence {
        self.names.as_mut()
    }

    pub fn permissions(&self) -> &dyn PermissionOracle {
        self.permissions.as_ref()
    }

    pub fn is_admin(&self, player: &str) -> bool {
        self.permissions.has_admin(player)
    }

    pub fn is_blacklisted(&self, kind: ItemKind) -> bool {
        self.blacklist.contains(&kind)
    }

    /// Whether `kind` may back a container shop.
    pub fn is_shop_container(&self, kind: ItemKind) -> bool {
        kind.is_container() && !self.is_blacklisted(kind)
    }

    /// Owner line names the server shop (case-insensitive).
    pub fn is_server_marker(&self, owner: &str) -> bool {
        owner.eq_ignore_ascii_case(&self.settings.server_shop)
    }
}
