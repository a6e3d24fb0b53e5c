//! Item identity: the kind table and [`ShopMaterial`].
//!
//! Kinds are identified by their legacy numeric id and canonical upper-case
//! name. A handful of kinds carry a variant table (coal type, tree species,
//! slab material, dye colour) used both to parse descriptive prefixes such as
//! `"red wool"` and to render variant-qualified names.

use std::collections::BTreeMap;
use std::fmt;

use super::errors::ShopError;
use super::inventory::ItemStack;

const CONTAINER: u8 = 1;
const SIGN: u8 = 2;
const SWITCH: u8 = 4;

// (id, name, max stack, flags)
static KINDS: &[(u16, &str, u32, u8)] = &[
    (1, "STONE", 64, 0),
    (2, "GRASS", 64, 0),
    (3, "DIRT", 64, 0),
    (4, "COBBLESTONE", 64, 0),
    (5, "WOOD", 64, 0),
    (6, "SAPLING", 64, 0),
    (12, "SAND", 64, 0),
    (13, "GRAVEL", 64, 0),
    (14, "GOLD_ORE", 64, 0),
    (15, "IRON_ORE", 64, 0),
    (16, "COAL_ORE", 64, 0),
    (17, "LOG", 64, 0),
    (18, "LEAVES", 64, 0),
    (20, "GLASS", 64, 0),
    (23, "DISPENSER", 64, CONTAINER),
    (24, "SANDSTONE", 64, 0),
    (35, "WOOL", 64, 0),
    (41, "GOLD_BLOCK", 64, 0),
    (42, "IRON_BLOCK", 64, 0),
    (43, "DOUBLE_STEP", 64, 0),
    (44, "STEP", 64, 0),
    (45, "BRICK", 64, 0),
    (46, "TNT", 64, 0),
    (47, "BOOKSHELF", 64, 0),
    (49, "OBSIDIAN", 64, 0),
    (50, "TORCH", 64, 0),
    (54, "CHEST", 64, CONTAINER),
    (56, "DIAMOND_ORE", 64, 0),
    (57, "DIAMOND_BLOCK", 64, 0),
    (58, "WORKBENCH", 64, 0),
    (61, "FURNACE", 64, CONTAINER),
    (62, "BURNING_FURNACE", 64, CONTAINER),
    (63, "SIGN_POST", 1, SIGN),
    (68, "WALL_SIGN", 1, SIGN),
    (69, "LEVER", 64, SWITCH),
    (77, "STONE_BUTTON", 64, SWITCH),
    (81, "CACTUS", 64, 0),
    (86, "PUMPKIN", 64, 0),
    (87, "NETHERRACK", 64, 0),
    (89, "GLOWSTONE", 64, 0),
    (117, "BREWING_STAND", 64, CONTAINER),
    (256, "IRON_SPADE", 1, 0),
    (257, "IRON_PICKAXE", 1, 0),
    (260, "APPLE", 64, 0),
    (261, "BOW", 1, 0),
    (262, "ARROW", 64, 0),
    (263, "COAL", 64, 0),
    (264, "DIAMOND", 64, 0),
    (265, "IRON_INGOT", 64, 0),
    (266, "GOLD_INGOT", 64, 0),
    (267, "IRON_SWORD", 1, 0),
    (276, "DIAMOND_SWORD", 1, 0),
    (278, "DIAMOND_PICKAXE", 1, 0),
    (280, "STICK", 64, 0),
    (287, "STRING", 64, 0),
    (288, "FEATHER", 64, 0),
    (289, "SULPHUR", 64, 0),
    (295, "SEEDS", 64, 0),
    (296, "WHEAT", 64, 0),
    (297, "BREAD", 64, 0),
    (318, "FLINT", 64, 0),
    (319, "PORK", 64, 0),
    (320, "GRILLED_PORK", 64, 0),
    (322, "GOLDEN_APPLE", 64, 0),
    (323, "SIGN", 16, 0),
    (325, "BUCKET", 16, 0),
    (331, "REDSTONE", 64, 0),
    (332, "SNOW_BALL", 16, 0),
    (334, "LEATHER", 64, 0),
    (336, "CLAY_BRICK", 64, 0),
    (337, "CLAY_BALL", 64, 0),
    (339, "PAPER", 64, 0),
    (340, "BOOK", 64, 0),
    (341, "SLIME_BALL", 64, 0),
    (344, "EGG", 16, 0),
    (348, "GLOWSTONE_DUST", 64, 0),
    (349, "RAW_FISH", 64, 0),
    (351, "INK_SACK", 64, 0),
    (352, "BONE", 64, 0),
    (353, "SUGAR", 64, 0),
    (357, "COOKIE", 64, 0),
    (364, "COOKED_BEEF", 64, 0),
    (367, "ROTTEN_FLESH", 64, 0),
    (368, "ENDER_PEARL", 16, 0),
    (371, "GOLD_NUGGET", 64, 0),
    (388, "EMERALD", 64, 0),
];

static COAL_TYPES: &[(&str, i16)] = &[("COAL", 0), ("CHARCOAL", 1)];

static TREE_SPECIES: &[(&str, i16)] = &[("GENERIC", 0), ("REDWOOD", 1), ("BIRCH", 2), ("JUNGLE", 3)];

static STEP_MATERIALS: &[(&str, i16)] = &[
    ("STONE", 0),
    ("SANDSTONE", 1),
    ("WOOD", 2),
    ("COBBLESTONE", 3),
    ("BRICK", 4),
    ("SMOOTH_BRICK", 5),
];

static WOOL_COLORS: &[(&str, i16)] = &[
    ("WHITE", 0),
    ("ORANGE", 1),
    ("MAGENTA", 2),
    ("LIGHT_BLUE", 3),
    ("YELLOW", 4),
    ("LIME", 5),
    ("PINK", 6),
    ("GRAY", 7),
    ("SILVER", 8),
    ("CYAN", 9),
    ("PURPLE", 10),
    ("BLUE", 11),
    ("BROWN", 12),
    ("GREEN", 13),
    ("RED", 14),
    ("BLACK", 15),
];

// Dye data runs opposite to wool data.
static DYE_COLORS: &[(&str, i16)] = &[
    ("BLACK", 0),
    ("RED", 1),
    ("GREEN", 2),
    ("BROWN", 3),
    ("BLUE", 4),
    ("PURPLE", 5),
    ("CYAN", 6),
    ("SILVER", 7),
    ("GRAY", 8),
    ("PINK", 9),
    ("LIME", 10),
    ("YELLOW", 11),
    ("LIGHT_BLUE", 12),
    ("MAGENTA", 13),
    ("ORANGE", 14),
    ("WHITE", 15),
];

/// A base item kind from the static kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKind(u16);

impl ItemKind {
    pub const CHEST: ItemKind = ItemKind(54);
    pub const SIGN_POST: ItemKind = ItemKind(63);
    pub const WALL_SIGN: ItemKind = ItemKind(68);
    pub const LEVER: ItemKind = ItemKind(69);
    pub const STONE_BUTTON: ItemKind = ItemKind(77);

    fn entry(&self) -> Option<&'static (u16, &'static str, u32, u8)> {
        KINDS.iter().find(|(id, ..)| *id == self.0)
    }

    /// Look a kind up by numeric id.
    pub fn from_id(id: u16) -> Option<ItemKind> {
        KINDS.iter().find(|(i, ..)| *i == id).map(|(i, ..)| ItemKind(*i))
    }

    /// Look a kind up by its exact canonical name.
    pub fn from_name(name: &str) -> Option<ItemKind> {
        KINDS.iter().find(|(_, n, ..)| *n == name).map(|(i, ..)| ItemKind(*i))
    }

    /// Loose lookup: a numeric id, or a name in any case with spaces for
    /// underscores and stray punctuation ignored.
    pub fn match_name(text: &str) -> Option<ItemKind> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(id) = text.parse::<u16>() {
            return Self::from_id(id);
        }
        Self::from_name(&normalize_token(text))
    }

    pub fn id(&self) -> u16 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.entry().map(|(_, n, ..)| *n).unwrap_or("UNKNOWN")
    }

    pub fn max_stack(&self) -> u32 {
        self.entry().map(|(_, _, s, _)| *s).unwrap_or(64)
    }

    pub fn is_container(&self) -> bool {
        self.entry().is_some_and(|(.., f)| f & CONTAINER != 0)
    }

    pub fn is_sign(&self) -> bool {
        self.entry().is_some_and(|(.., f)| f & SIGN != 0)
    }

    /// Levers and buttons: blocks a shop can pulse after a trade.
    pub fn is_switch(&self) -> bool {
        self.entry().is_some_and(|(.., f)| f & SWITCH != 0)
    }

    fn variant_table(&self) -> Option<&'static [(&'static str, i16)]> {
        match self.name() {
            "COAL" => Some(COAL_TYPES),
            "LOG" | "LEAVES" => Some(TREE_SPECIES),
            "STEP" | "DOUBLE_STEP" => Some(STEP_MATERIALS),
            "WOOL" => Some(WOOL_COLORS),
            "INK_SACK" => Some(DYE_COLORS),
            _ => None,
        }
    }

    /// Resolve a variant descriptor ("birch", "14", "light blue") for this kind.
    /// Unknown descriptors resolve to variant 0.
    pub fn parse_variant(&self, descriptor: &str) -> i16 {
        let descriptor = descriptor.trim_matches(|c: char| c == ' ' || c == '_');
        if descriptor.is_empty() {
            return 0;
        }
        if let Ok(n) = descriptor.parse::<i16>() {
            return n;
        }
        let wanted = normalize_token(descriptor);
        self.variant_table()
            .and_then(|t| t.iter().find(|(n, _)| *n == wanted))
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    fn variant_name(&self, variant: i16) -> Option<&'static str> {
        self.variant_table()
            .and_then(|t| t.iter().find(|(_, v)| *v == variant))
            .map(|(n, _)| *n)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upper-case, whitespace runs to `_`, anything outside `[A-Z0-9_]` dropped.
pub fn normalize_token(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_uppercase());
        }
    }
    out
}

/// `GOLD_INGOT` -> `Gold Ingot`.
pub fn humanize(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical, hashable description of a tradable item kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShopMaterial {
    kind: ItemKind,
    variant: i16,
    modifiers: Option<BTreeMap<String, u32>>,
}

impl ShopMaterial {
    /// Build from a live item. An empty modifier map is the same as none.
    pub fn new(kind: ItemKind, variant: i16, modifiers: Option<BTreeMap<String, u32>>) -> Self {
        Self {
            kind,
            variant,
            modifiers: modifiers.filter(|m| !m.is_empty()),
        }
    }

    pub fn plain(kind: ItemKind) -> Self {
        Self::new(kind, 0, None)
    }

    /// Parse `kind:variant`, `kind`, or `<variant words> <kind words>`.
    pub fn parse(text: &str) -> Result<Self, ShopError> {
        let text = text.trim();
        let invalid = || ShopError::InvalidMaterial(text.to_string());

        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() == 2 {
            let kind = ItemKind::match_name(parts[0]).ok_or_else(invalid)?;
            let variant = parts[1].trim().parse::<i16>().map_err(|_| invalid())?;
            return Ok(Self::new(kind, variant, None));
        }

        // Earliest start wins, so the longest trailing kind name is found first.
        for (i, ch) in text.char_indices() {
            let candidate = if i == 0 {
                text
            } else if ch == ' ' || ch == '_' {
                &text[i + ch.len_utf8()..]
            } else {
                continue;
            };
            if let Some(kind) = ItemKind::match_name(candidate) {
                let variant = kind.parse_variant(&text[..i]);
                return Ok(Self::new(kind, variant, None));
            }
        }

        Err(invalid())
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn variant(&self) -> i16 {
        self.variant
    }

    pub fn modifiers(&self) -> Option<&BTreeMap<String, u32>> {
        self.modifiers.as_ref()
    }

    /// A stack of `amount` of this material, or `None` for zero.
    pub fn stack(&self, amount: u32) -> Option<ItemStack> {
        if amount == 0 {
            return None;
        }
        Some(ItemStack::new(self.clone(), amount))
    }

    /// Upper-case raw name, variant-qualified where the kind has a variant table.
    pub fn raw_name(&self) -> String {
        match self.kind.variant_name(self.variant) {
            Some(v) if self.kind.name() == "COAL" => v.to_string(),
            Some(v) => format!("{}_{}", v, self.kind.name()),
            None => self.kind.name().to_string(),
        }
    }
}

impl fmt::Display for ShopMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&humanize(&self.raw_name()))
    }
}
