//! Transaction sinks.
//!
//! Every completed trade reports one signed delta per side, seen from the
//! shop's container: a buy deposits `+price` currency and withdraws
//! `-amount` items, a sell the reverse.

use log::info;

use crate::world::Location;

use super::material::ItemKind;

pub trait TransactionLog {
    fn record(&mut self, actor: &str, location: Location, kind: ItemKind, delta: i64);
}

/// Writes each delta to the `transactions` log target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransactionSink;

impl TransactionLog for LogTransactionSink {
    fn record(&mut self, actor: &str, location: Location, kind: ItemKind, delta: i64) {
        info!(
            target: "transactions",
            "actor={} at={} item={}({}) delta={:+}",
            actor,
            location,
            kind.name(),
            kind.id(),
            delta
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub actor: String,
    pub location: Location,
    pub kind: ItemKind,
    pub delta: i64,
}

/// Keeps records in memory, in the order received.
impl TransactionLog for Vec<TransactionRecord> {
    fn record(&mut self, actor: &str, location: Location, kind: ItemKind, delta: i64) {
        self.push(TransactionRecord {
            actor: actor.to_string(),
            location,
            kind,
            delta,
        });
    }
}
