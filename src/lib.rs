//! # Signshop - sign and container shops
//!
//! A shop is a four-line sign: the traded item, a buy rate, a sell rate and
//! the owner. Placed on a chest (or another container) it trades out of that
//! container; marked with the server-shop token it trades out of thin air.
//!
//! ## Features
//!
//! - **Rate parsing**: configurable `MATCH` (capturing regex) or `SPLIT` (delimiter regex) rate lines.
//! - **Atomic trades**: both sides of a buy or sell succeed together or leave every inventory untouched.
//! - **Discovery**: locate every shop a block belongs to, looking at the block and its six neighbours.
//! - **Protection**: break, explosion, piston, chest-placement and chest-access checks with admin override.
//! - **Extended names**: compress long owner names into 15-character sign keys.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use signshop::config::Config;
//! use signshop::context::ShopContext;
//! use signshop::shop::Shop;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let ctx = ShopContext::from_config(&config)?;
//!
//!     let lines = ["Gold Ingot", "Buy 1 for 10g", "Sell 1 for 5g", "Alice"].map(String::from);
//!     let shop = Shop::from_lines(&lines, &ctx)?;
//!     println!("{} sells {}", shop.owner(), shop.material());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`shop`] - item identity, rates, rate parsing, inventories, the shop record and discovery
//! - [`world`] - locations, signs, containers and the [`world::World`] trait
//! - [`listener`] - decisions for block, explosion, piston, interaction and sign events
//! - [`context`] - the loaded shop environment passed to every operation
//! - [`names`] / [`permissions`] - ownership and capability collaborators
//! - [`config`] - TOML configuration
//! - [`logutil`] - single-line log helpers

pub mod config;
pub mod context;
pub mod listener;
pub mod logutil;
pub mod names;
pub mod permissions;
pub mod shop;
pub mod world;
