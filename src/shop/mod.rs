//! Shop engine: item identity, rates, rate-line parsing, slot inventories
//! with atomic exchange, the shop record, and discovery/protection helpers.

pub mod discovery;
pub mod errors;
pub mod inventory;
pub mod ledger;
pub mod material;
pub mod pattern;
pub mod rate;
pub mod record;

pub use discovery::{
    has_access, is_block_destroyable, is_protected_chests_around, is_shops_destroyable,
    locate_shop, locate_shops, locate_shops_in, truncate_name, CARDINAL, EXTENDED,
};
pub use errors::{ExchangeFailure, RateParseError, ShopError, TradeFailure};
pub use inventory::{exchange, Inventory, ItemStack, Snapshot};
pub use ledger::{LogTransactionSink, TransactionLog, TransactionRecord};
pub use material::{ItemKind, ShopMaterial};
pub use pattern::{PatternHandler, PatternMode};
pub use rate::Rate;
pub use record::{Shop, ShopStock, SignPlacement, StatusLine, Stock, Trade, TradeKind};
