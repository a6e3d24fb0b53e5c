//! Capability checks for shop actions.
//!
//! Three capabilities matter: `admin` overrides ownership and protection,
//! `build` allows creating shop signs, `use` allows trading and checking
//! status. An admin implicitly holds the other two.

use std::collections::HashSet;

use crate::config::PermissionsConfig;

pub trait PermissionOracle: Send + Sync {
    fn has_admin(&self, player: &str) -> bool;
    fn has_build(&self, player: &str) -> bool;
    fn has_use(&self, player: &str) -> bool;
}

/// Capability lists taken from the `[permissions]` section.
#[derive(Debug, Clone, Default)]
pub struct ConfigPermissions {
    admins: HashSet<String>,
    builders: HashSet<String>,
    users: HashSet<String>,
    banned: HashSet<String>,
    default_build: bool,
    default_use: bool,
}

impl ConfigPermissions {
    pub fn from_config(config: &PermissionsConfig) -> Self {
        let set = |names: &[String]| names.iter().cloned().collect::<HashSet<_>>();
        Self {
            admins: set(&config.admins),
            builders: set(&config.builders),
            users: set(&config.users),
            banned: set(&config.banned),
            default_build: config.default_build,
            default_use: config.default_use,
        }
    }

    fn granted(&self, player: &str, listed: &HashSet<String>, default: bool) -> bool {
        if self.has_admin(player) {
            return true;
        }
        if self.banned.contains(player) {
            return false;
        }
        default || listed.contains(player)
    }
}

impl PermissionOracle for ConfigPermissions {
    fn has_admin(&self, player: &str) -> bool {
        self.admins.contains(player)
    }

    fn has_build(&self, player: &str) -> bool {
        self.granted(player, &self.builders, self.default_build)
    }

    fn has_use(&self, player: &str) -> bool {
        self.granted(player, &self.users, self.default_use)
    }
}
