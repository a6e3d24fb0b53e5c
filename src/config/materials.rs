//! Material-related configuration: currency tokens, aliases, custom names and
//! the material-line pattern.

use std::collections::{BTreeMap, HashMap};

use log::{error, warn};
use regex::Regex;

use crate::shop::errors::ShopError;
use crate::shop::material::ShopMaterial;

use super::Config;

/// Upper-case, whitespace runs to `_`, anything outside `[A-Z0-9:_]` dropped.
fn normalize_material(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ':' || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Resolved material tables. Built once per configuration load.
#[derive(Debug, Clone)]
pub struct MaterialConfig {
    material_pattern: Regex,
    currencies: BTreeMap<String, ShopMaterial>,
    aliases: BTreeMap<String, ShopMaterial>,
    names: HashMap<ShopMaterial, String>,
}

impl MaterialConfig {
    /// Resolve the material tables from configuration. Bad individual entries
    /// are logged and skipped; a bad material pattern fails the load.
    pub fn from_config(config: &Config) -> Result<Self, ShopError> {
        let material_pattern = Regex::new(&config.shop.material_pattern).map_err(|e| {
            error!(
                "Configuration error for material pattern '{}': {}",
                config.shop.material_pattern, e
            );
            ShopError::Regex(e)
        })?;

        let mut materials = Self {
            material_pattern,
            currencies: BTreeMap::new(),
            aliases: BTreeMap::new(),
            names: HashMap::new(),
        };

        for (token, item) in &config.currencies {
            match ShopMaterial::parse(&normalize_material(item)) {
                Ok(material) => {
                    materials.currencies.insert(token.clone(), material);
                }
                Err(_) => error!("Configuration error for shop currency:'{}' for item:{}", token, item),
            }
        }

        for (alias, item) in &config.aliases {
            match materials.lookup(item) {
                Ok(material) => {
                    materials.aliases.insert(normalize_material(alias), material);
                }
                Err(e) => warn!("Configuration error for material alias: {} mapping to: {} ({})", alias, item, e),
            }
        }

        for (item, name) in &config.names {
            match materials.lookup(item) {
                Ok(material) => {
                    materials.names.insert(material, name.clone());
                }
                Err(_) => warn!("Configuration error for material name: {} mapping from: {}", name, item),
            }
        }

        Ok(materials)
    }

    /// Material named on a sign's first line.
    pub fn shop_material(&self, line: &str) -> Result<ShopMaterial, ShopError> {
        let extracted = self
            .material_pattern
            .captures(line)
            .and_then(|c| c.get(1))
            .ok_or_else(|| ShopError::InvalidMaterial(line.to_string()))?;
        self.lookup(extracted.as_str())
    }

    /// Alias table first, then the kind table.
    fn lookup(&self, name: &str) -> Result<ShopMaterial, ShopError> {
        let name = normalize_material(name);
        if let Some(material) = self.aliases.get(&name) {
            return Ok(material.clone());
        }
        ShopMaterial::parse(&name)
    }

    /// Currency for a sign token such as `g`.
    pub fn currency(&self, token: &str) -> Option<&ShopMaterial> {
        self.currencies.get(token)
    }

    /// First configured token that stands for `material`.
    pub fn currency_token(&self, material: &ShopMaterial) -> Option<&str> {
        self.currencies
            .iter()
            .find(|(_, m)| *m == material)
            .map(|(t, _)| t.as_str())
    }

    pub fn is_configured(&self, material: &ShopMaterial) -> bool {
        self.names.contains_key(material)
    }

    /// Custom display name if configured, the humanised name otherwise.
    pub fn display_name(&self, material: &ShopMaterial) -> String {
        match self.names.get(material) {
            Some(name) => name.clone(),
            None => material.to_string(),
        }
    }

    /// Human-readable dump of every table, one entry per line.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (token, material) in &self.currencies {
            lines.push(format!("{} represents {}", token, material.raw_name()));
        }
        for (alias, material) in &self.aliases {
            lines.push(format!("{} can be used for {}", alias, material.raw_name()));
        }
        let mut names: Vec<_> = self.names.iter().collect();
        names.sort();
        for (material, name) in names {
            lines.push(format!("{} is printed as {}", material.raw_name(), name));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::material::ItemKind;

    fn config() -> Config {
        let mut config = Config::default();
        config.currencies.insert("d".to_string(), "diamond".to_string());
        config.currencies.insert("x".to_string(), "not an item".to_string());
        config.aliases.insert("gold bar".to_string(), "Gold Ingot".to_string());
        config.aliases.insert("junk".to_string(), "nothing real".to_string());
        config.names.insert("WOOL:14".to_string(), "Scarlet Fleece".to_string());
        config
    }

    #[test]
    fn test_normalize_material() {
        assert_eq!(normalize_material("  light  blue wool "), "LIGHT_BLUE_WOOL");
        assert_eq!(normalize_material("wool:14!"), "WOOL:14");
    }

    #[test]
    fn test_currencies_resolve_and_skip_bad_entries() {
        let materials = MaterialConfig::from_config(&config()).unwrap();
        let gold = materials.currency("g").unwrap();
        assert_eq!(gold.kind(), ItemKind::from_name("GOLD_INGOT").unwrap());
        assert!(materials.currency("d").is_some());
        assert!(materials.currency("x").is_none());
        assert_eq!(materials.currency_token(gold), Some("g"));
    }

    #[test]
    fn test_alias_lookup() {
        let materials = MaterialConfig::from_config(&config()).unwrap();
        let m = materials.shop_material("Gold Bar").unwrap();
        assert_eq!(m.kind(), ItemKind::from_name("GOLD_INGOT").unwrap());
        assert!(materials.shop_material("junk").is_err());
    }

    #[test]
    fn test_custom_display_name() {
        let materials = MaterialConfig::from_config(&config()).unwrap();
        let red = materials.shop_material("red wool").unwrap();
        assert!(materials.is_configured(&red));
        assert_eq!(materials.display_name(&red), "Scarlet Fleece");
        let white = materials.shop_material("white wool").unwrap();
        assert_eq!(materials.display_name(&white), "White Wool");
    }

    #[test]
    fn test_material_pattern_gates_line() {
        let mut cfg = Config::default();
        cfg.shop.material_pattern = r"^\[(.+)\]$".to_string();
        let materials = MaterialConfig::from_config(&cfg).unwrap();
        assert!(materials.shop_material("[Diamond]").is_ok());
        assert!(materials.shop_material("Diamond").is_err());
    }

    #[test]
    fn test_bad_material_pattern_fails_load() {
        let mut cfg = Config::default();
        cfg.shop.material_pattern = "(unclosed".to_string();
        assert!(matches!(MaterialConfig::from_config(&cfg), Err(ShopError::Regex(_))));
    }

    #[test]
    fn test_describe_lists_tables() {
        let materials = MaterialConfig::from_config(&config()).unwrap();
        let lines = materials.describe();
        assert!(lines.contains(&"g represents GOLD_INGOT".to_string()));
        assert!(lines.contains(&"GOLD_BAR can be used for GOLD_INGOT".to_string()));
        assert!(lines.contains(&"RED_WOOL is printed as Scarlet Fleece".to_string()));
    }
}
