//! World event decisions.
//!
//! The host forwards block and player events here and applies the returned
//! [`EventOutcome`]. Nothing in this module touches the world except trades
//! run on behalf of an interacting player.

use std::fmt;

use log::{debug, error, info};

use crate::context::ShopContext;
use crate::logutil::sign_text;
use crate::shop::discovery::{
    is_block_destroyable, is_protected_chests_around, locate_shop, locate_shops_in, truncate_name,
};
use crate::shop::errors::{ShopError, TradeFailure};
use crate::shop::ledger::TransactionLog;
use crate::shop::record::{Shop, StatusLine, Trade};
use crate::world::{Direction, Location, Player, World};

/// Third-party container protection (lock plugins and the like).
pub trait ProtectionHook {
    /// True when `actor` already controls the container at `location`, which
    /// waives the existing-container check on sign creation.
    fn allows_existing_container(&self, location: Location, actor: &str) -> bool;
}

/// Why an event was cancelled; the text is shown to the acting player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    CantDestroy,
    CantPlaceChest,
    CantUseChest,
    CantUse,
    CantBuild,
    CantBuildServer,
    ExistingChest,
    NameOverflow,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Denial::CantDestroy => "You can't destroy this shop.",
            Denial::CantPlaceChest => "You can't place a chest next to someone else's shop.",
            Denial::CantUseChest => "You can't use this shop's chest.",
            Denial::CantUse => "You don't have permission to use shops.",
            Denial::CantBuild => "You don't have permission to build shops.",
            Denial::CantBuildServer => "You don't have permission to build server shops.",
            Denial::ExistingChest => "You can't put a shop sign on an existing chest.",
            Denial::NameOverflow => "Name overflow, notify server administrator!",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the event proceed.
    Allow,
    /// A shop consumed the event; the host should not run its default action.
    Handled,
    Cancel(Denial),
}

impl EventOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EventOutcome::Cancel(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Left,
    Right,
}

/// What a shop told the interacting player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopResponse {
    Status(Vec<StatusLine>),
    Traded(Trade),
    Refused(TradeFailure),
}

#[derive(Debug, Clone)]
pub struct Interaction {
    pub outcome: EventOutcome,
    pub response: Option<ShopResponse>,
    /// Lever or button the host should toggle after a trade.
    pub redstone: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct Placement {
    pub outcome: EventOutcome,
    /// Shop completed by the placed container.
    pub created: Option<Shop>,
}

#[derive(Debug, Clone)]
pub struct SignEdit {
    pub outcome: EventOutcome,
    /// Sign text to store, owner line possibly rewritten.
    pub lines: [String; 4],
    /// Server shop created by this edit.
    pub created: Option<Shop>,
}

/// Event handlers plus the collaborators they report to.
#[derive(Default)]
pub struct ShopListener {
    hooks: Vec<Box<dyn ProtectionHook>>,
    ledger: Option<Box<dyn TransactionLog>>,
}

impl ShopListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(mut self, hook: Box<dyn ProtectionHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn with_ledger(mut self, ledger: Box<dyn TransactionLog>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    fn ledger(&mut self) -> Option<&mut dyn TransactionLog> {
        match self.ledger.as_mut() {
            Some(ledger) => Some(ledger.as_mut() as &mut dyn TransactionLog),
            None => None,
        }
    }

    /// Break, burn, fade, physics, entity change or leaf decay of one block.
    /// `actor` is `None` for non-player causes.
    pub fn on_block_destroyed(
        &self,
        ctx: &ShopContext,
        world: &dyn World,
        location: Location,
        actor: Option<&str>,
    ) -> EventOutcome {
        if !ctx.settings().protect_break {
            return EventOutcome::Allow;
        }
        if actor.is_some_and(|a| ctx.is_admin(a)) {
            return EventOutcome::Allow;
        }
        if is_block_destroyable(world, location, actor, ctx) {
            return EventOutcome::Allow;
        }
        debug!("Protected shop block at {} from {}", location, actor.unwrap_or("<world>"));
        EventOutcome::Cancel(Denial::CantDestroy)
    }

    /// An explosion is cancelled outright if any block in it belongs to a shop.
    pub fn on_explode(&self, ctx: &ShopContext, world: &dyn World, blocks: &[Location]) -> EventOutcome {
        if !ctx.settings().protect_explode {
            return EventOutcome::Allow;
        }
        let mut shops = Vec::new();
        locate_shops_in(world, blocks.iter().copied(), ctx, &mut shops);
        if shops.is_empty() {
            EventOutcome::Allow
        } else {
            debug!("Explosion touching {} shop(s) cancelled", shops.len());
            EventOutcome::Cancel(Denial::CantDestroy)
        }
    }

    pub fn on_piston_extend(&self, ctx: &ShopContext, world: &dyn World, moved: &[Location]) -> EventOutcome {
        moved
            .iter()
            .map(|&block| self.on_block_destroyed(ctx, world, block, None))
            .find(EventOutcome::is_cancelled)
            .unwrap_or(EventOutcome::Allow)
    }

    /// The block in front of the piston moves; a sticky piston also pulls
    /// the one after it.
    pub fn on_piston_retract(
        &self,
        ctx: &ShopContext,
        world: &dyn World,
        piston: Location,
        direction: Direction,
        sticky: bool,
    ) -> EventOutcome {
        let first = piston.relative(direction);
        let outcome = self.on_block_destroyed(ctx, world, first, None);
        if outcome.is_cancelled() || !sticky {
            return outcome;
        }
        self.on_block_destroyed(ctx, world, first.relative(direction), None)
    }

    /// Called after a block is placed at `location`.
    pub fn on_block_place(
        &self,
        ctx: &ShopContext,
        world: &dyn World,
        location: Location,
        actor: &str,
    ) -> Placement {
        let allow = Placement {
            outcome: EventOutcome::Allow,
            created: None,
        };
        if !world.block_kind(location).is_some_and(|k| k.is_container()) {
            return allow;
        }
        if !ctx.settings().protect_chest_access || ctx.is_admin(actor) {
            return allow;
        }
        if is_protected_chests_around(world, location, actor, ctx) {
            return Placement {
                outcome: EventOutcome::Cancel(Denial::CantPlaceChest),
                created: None,
            };
        }

        let created = locate_shop(world, location.relative(Direction::Up), ctx);
        if let Some(shop) = &created {
            info!("{} completed a shop of {} at {}", actor, shop.material().raw_name(), location);
        }
        Placement {
            outcome: EventOutcome::Allow,
            created,
        }
    }

    /// A player clicked the block at `location`.
    pub fn on_interact(
        &mut self,
        ctx: &ShopContext,
        world: &mut dyn World,
        player: &mut Player,
        location: Location,
        click: Click,
    ) -> Interaction {
        let nothing = |outcome| Interaction {
            outcome,
            response: None,
            redstone: None,
        };

        let is_container = world.block_kind(location).is_some_and(|k| k.is_container());
        if ctx.settings().protect_chest_access
            && click == Click::Right
            && is_container
            && !ctx.is_admin(&player.name)
        {
            if is_protected_chests_around(&*world, location, &player.name, ctx) {
                return nothing(EventOutcome::Cancel(Denial::CantUseChest));
            }
            return nothing(EventOutcome::Allow);
        }

        let Some(shop) = locate_shop(&*world, location, ctx) else {
            return nothing(EventOutcome::Allow);
        };

        if !ctx.permissions().has_use(&player.name) {
            return nothing(EventOutcome::Cancel(Denial::CantUse));
        }

        match click {
            Click::Left => Interaction {
                outcome: EventOutcome::Allow,
                response: Some(ShopResponse::Status(shop.status(&*world, ctx))),
                redstone: None,
            },
            Click::Right => {
                let (response, redstone) = match shop.interact(player, world, ctx, self.ledger()) {
                    Ok(Some(trade)) => (
                        Some(ShopResponse::Traded(trade)),
                        shop.redstone_target(&*world, ctx),
                    ),
                    Ok(None) => (None, None),
                    Err(failure) => (Some(ShopResponse::Refused(failure)), None),
                };
                Interaction {
                    outcome: EventOutcome::Handled,
                    response,
                    redstone,
                }
            }
        }
    }

    /// A player finished editing the sign at `location`.
    pub fn on_sign_change(
        &self,
        ctx: &mut ShopContext,
        world: &dyn World,
        location: Location,
        lines: [String; 4],
        actor: &str,
    ) -> SignEdit {
        let mut lines = lines;
        let finish = |outcome, lines, created| SignEdit {
            outcome,
            lines,
            created,
        };

        match Shop::from_lines(&lines, ctx) {
            Ok(_) | Err(ShopError::InvalidSignOwner) => {}
            Err(_) => return finish(EventOutcome::Allow, lines, None),
        }
        debug!("{} wrote shop sign {} at {}", actor, sign_text(&lines), location);

        if !ctx.permissions().has_build(actor) {
            return finish(EventOutcome::Cancel(Denial::CantBuild), lines, None);
        }

        let is_admin = ctx.is_admin(actor);
        let server_shop = ctx.is_server_marker(&lines[3]);
        let mut check_existing = if server_shop {
            if !is_admin {
                return finish(EventOutcome::Cancel(Denial::CantBuildServer), lines, None);
            }
            false
        } else {
            if ctx.settings().auto_fill_name {
                if ctx.settings().uses_extended_names() {
                    match ctx.names_mut().short_key_for(actor) {
                        Ok(key) => lines[3] = key,
                        Err(e) => {
                            error!("Player {} cannot register extended name: {}", actor, e);
                            return finish(EventOutcome::Cancel(Denial::NameOverflow), lines, None);
                        }
                    }
                } else {
                    lines[3] = truncate_name(actor);
                }
            }
            ctx.settings().protect_existing_chest
        };

        let below = location.relative(Direction::Down);
        if check_existing && self.hooks.iter().any(|h| h.allows_existing_container(below, actor)) {
            check_existing = false;
        }
        let admin_bypass = is_admin && ctx.settings().admin_bypasses_existing_chest;
        if check_existing
            && !admin_bypass
            && world.block_kind(below).is_some_and(|k| k.is_container())
        {
            return finish(EventOutcome::Cancel(Denial::ExistingChest), lines, None);
        }

        let created = if server_shop {
            match Shop::from_lines(&lines, ctx) {
                Ok(shop) => {
                    info!("{} created a server shop of {} at {}", actor, shop.material().raw_name(), location);
                    Some(shop)
                }
                Err(e) => {
                    error!("Unexpected invalid shop {} at {}: {}", sign_text(&lines), location, e);
                    return finish(EventOutcome::Cancel(Denial::CantBuildServer), lines, None);
                }
            }
        } else {
            None
        };

        finish(EventOutcome::Allow, lines, created)
    }
}
