use std::fmt;

use thiserror::Error;

/// Which half of an atomic exchange could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeFailure {
    /// The items to take out were not all present.
    Remove,
    /// The items to put in did not fit.
    Add,
}

impl fmt::Display for ExchangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeFailure::Remove => write!(f, "remove"),
            ExchangeFailure::Add => write!(f, "add"),
        }
    }
}

/// Errors that can arise while building shops or loading shop configuration.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Item identity text could not be matched to any item kind.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Sign text does not describe a shop (no material, or neither rate parses).
    #[error("invalid shop sign")]
    InvalidSign,

    /// Sign text describes a shop but the owner line is empty.
    #[error("shop sign has no owner")]
    InvalidSignOwner,

    /// Atomic exchange could not complete; nothing was mutated.
    #[error("exchange failed to {0} items")]
    Exchange(ExchangeFailure),

    /// The name registry has no short key left for this name.
    #[error("no short name left for {0}")]
    OutOfEntries(String),

    /// Configuration is malformed (bad mode, bad group index, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapper around regex compilation errors.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Wrapper around IO errors (registry persistence).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON errors (registry persistence).
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopError {
    /// True for rejections that only mean "this text is not a shop".
    pub fn is_not_a_shop(&self) -> bool {
        matches!(
            self,
            ShopError::InvalidMaterial(_) | ShopError::InvalidSign | ShopError::InvalidSignOwner
        )
    }
}

/// Why a single rate line did not produce a rate. Never logged; callers treat
/// every variant as "this side of the shop is absent".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateParseError {
    #[error("line does not match the rate pattern")]
    NoMatch,
    #[error("field {0} is missing")]
    MissingField(usize),
    #[error("'{0}' is not a positive whole number")]
    NotANumber(String),
    #[error("currency token is empty")]
    EmptyCurrency,
    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),
}

/// User-facing reasons a buy or sell did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeFailure {
    NoBuy,
    NoSell,
    /// Buyer lacks the currency named here.
    NotEnoughPlayerMoney(String),
    /// Seller lacks the item named here.
    NotEnoughPlayerItems(String),
    PlayerInventoryFull,
    /// Container lacks the item named here.
    NotEnoughShopItems(String),
    /// Container lacks the currency named here.
    NotEnoughShopMoney(String),
    ChestInventoryFull,
}

impl fmt::Display for TradeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeFailure::NoBuy => write!(f, "You can't buy from this shop."),
            TradeFailure::NoSell => write!(f, "You can't sell to this shop."),
            TradeFailure::NotEnoughPlayerMoney(c) => write!(f, "You don't have enough {}.", c),
            TradeFailure::NotEnoughPlayerItems(m) => write!(f, "You don't have enough {}.", m),
            TradeFailure::PlayerInventoryFull => write!(f, "Your inventory is full."),
            TradeFailure::NotEnoughShopItems(m) => write!(f, "This shop is out of {}.", m),
            TradeFailure::NotEnoughShopMoney(c) => write!(f, "This shop doesn't have enough {}.", c),
            TradeFailure::ChestInventoryFull => write!(f, "The shop's chest is full."),
        }
    }
}
