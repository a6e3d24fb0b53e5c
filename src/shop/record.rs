//! The shop record: what a sign sells, at which rates, for whom.
//!
//! A [`Shop`] starts as validated sign text (no location) and becomes bound
//! once attached to a real sign. Bound shops draw stock either from nowhere
//! ([`ShopStock::Unlimited`], admin server shops) or from the container under
//! the sign ([`ShopStock::Container`]).

use std::fmt;
use std::hash::{Hash, Hasher};

use log::{debug, error};

use crate::context::ShopContext;
use crate::world::{Direction, Location, Player, World};

use super::errors::{ExchangeFailure, ShopError, TradeFailure};
use super::inventory::{exchange, ItemStack};
use super::ledger::TransactionLog;
use super::material::ShopMaterial;
use super::rate::Rate;

/// Where a bound shop's goods come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopStock {
    Unlimited,
    Container { location: Location },
}

/// A stock or capital figure. Unlimited shops report `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stock {
    Unbounded,
    Count(u32),
}

impl Stock {
    /// Enough for `needed`.
    pub fn covers(&self, needed: u32) -> bool {
        match self {
            Stock::Unbounded => true,
            Stock::Count(n) => *n >= needed,
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stock::Unbounded => write!(f, "unlimited"),
            Stock::Count(n) => write!(f, "{}", n),
        }
    }
}

/// The sign a shop is bound to and the block holding it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignPlacement {
    pub sign: Location,
    pub attached: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
}

/// A completed trade, from the player's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub kind: TradeKind,
    pub amount: u32,
    pub material: String,
    pub price: u32,
    pub currency: String,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            TradeKind::Buy => "bought",
            TradeKind::Sell => "sold",
        };
        write!(
            f,
            "You {} {} {} for {} {}.",
            verb, self.amount, self.material, self.price, self.currency
        )
    }
}

/// One line of a status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    OneMaterial {
        count: Stock,
        material: String,
    },
    OneCurrency {
        capital: Stock,
        currency: String,
        items: Stock,
        material: String,
    },
    Full {
        buy_capital: Stock,
        buy_currency: String,
        sell_capital: Stock,
        sell_currency: String,
        items: Stock,
        material: String,
    },
    BuyRate {
        amount: u32,
        material: String,
        price: u32,
        currency: String,
    },
    SellRate {
        amount: u32,
        material: String,
        price: u32,
        currency: String,
    },
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::OneMaterial { count, material } => {
                write!(f, "This shop has {} {}.", count, material)
            }
            StatusLine::OneCurrency {
                capital,
                currency,
                items,
                material,
            } => write!(
                f,
                "This shop has {} {} and {} {}.",
                capital, currency, items, material
            ),
            StatusLine::Full {
                buy_capital,
                buy_currency,
                sell_capital,
                sell_currency,
                items,
                material,
            } => write!(
                f,
                "This shop has {} {}, {} {} and {} {}.",
                buy_capital, buy_currency, sell_capital, sell_currency, items, material
            ),
            StatusLine::BuyRate {
                amount,
                material,
                price,
                currency,
            } => write!(f, "Buy {} {} for {} {}", amount, material, price, currency),
            StatusLine::SellRate {
                amount,
                material,
                price,
                currency,
            } => write!(f, "Sell {} {} for {} {}", amount, material, price, currency),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    material: ShopMaterial,
    buy: Option<Rate>,
    sell: Option<Rate>,
    owner: String,
    placement: Option<SignPlacement>,
    stock: ShopStock,
}

impl Shop {
    /// Validate four sign lines without binding them to a location.
    pub fn from_lines(lines: &[String; 4], ctx: &ShopContext) -> Result<Self, ShopError> {
        let material = ctx
            .materials()
            .shop_material(&lines[0])
            .map_err(|_| ShopError::InvalidSign)?;

        let buy = ctx.buy_pattern().parse(&lines[1], ctx.materials()).ok();
        let sell = ctx.sell_pattern().parse(&lines[2], ctx.materials()).ok();
        if buy.is_none() && sell.is_none() {
            return Err(ShopError::InvalidSign);
        }

        let owner = lines[3].clone();
        if owner.is_empty() {
            return Err(ShopError::InvalidSignOwner);
        }

        Ok(Self {
            material,
            buy,
            sell,
            owner,
            placement: None,
            stock: ShopStock::Unlimited,
        })
    }

    /// Bind the sign at `sign_location` with the given stock source. A
    /// container source must be a non-blacklisted container.
    pub fn bound(
        world: &dyn World,
        sign_location: Location,
        stock: ShopStock,
        ctx: &ShopContext,
    ) -> Result<Self, ShopError> {
        let sign = world.sign(sign_location).ok_or(ShopError::InvalidSign)?;
        let mut shop = Self::from_lines(&sign.lines, ctx)?;

        if let ShopStock::Container { location } = stock {
            match world.block_kind(location) {
                Some(kind) if ctx.is_shop_container(kind) => {}
                _ => return Err(ShopError::InvalidSign),
            }
        }

        shop.placement = Some(SignPlacement {
            sign: sign_location,
            attached: sign_location.relative(sign.attached),
        });
        shop.stock = stock;
        Ok(shop)
    }

    pub fn material(&self) -> &ShopMaterial {
        &self.material
    }

    pub fn buy_rate(&self) -> Option<&Rate> {
        self.buy.as_ref()
    }

    pub fn sell_rate(&self) -> Option<&Rate> {
        self.sell.as_ref()
    }

    pub fn buy_currency(&self) -> Option<&ShopMaterial> {
        self.buy.as_ref().map(Rate::currency)
    }

    pub fn sell_currency(&self) -> Option<&ShopMaterial> {
        self.sell.as_ref().map(Rate::currency)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn placement(&self) -> Option<SignPlacement> {
        self.placement
    }

    pub fn stock(&self) -> ShopStock {
        self.stock
    }

    pub fn can_buy(&self) -> bool {
        self.buy.is_some()
    }

    pub fn can_sell(&self) -> bool {
        self.sell.is_some()
    }

    /// Whether breaking or moving `location` would affect this shop.
    pub fn is_shop_block(&self, location: Location) -> bool {
        let on_sign = self
            .placement
            .is_some_and(|p| p.sign == location || p.attached == location);
        on_sign || matches!(self.stock, ShopStock::Container { location: c } if c == location)
    }

    /// Owner check under the active naming policy. Registry keys keep
    /// matching while `extended_names` is on, even with auto-fill off.
    pub fn is_smart_owner(&self, player: &str, ctx: &ShopContext) -> bool {
        if ctx.settings().extended_names {
            ctx.names().matches(&self.owner, player)
        } else {
            self.owner == player
        }
    }

    pub fn can_destroy(&self, player: &str, ctx: &ShopContext) -> bool {
        ctx.is_admin(player) || self.is_smart_owner(player, ctx)
    }

    fn count(&self, world: &dyn World, material: &ShopMaterial) -> Stock {
        match self.stock {
            ShopStock::Unlimited => Stock::Unbounded,
            ShopStock::Container { location } => {
                Stock::Count(world.container(location).map_or(0, |inv| inv.count(material)))
            }
        }
    }

    /// Traded items the shop can hand out.
    pub fn shop_items(&self, world: &dyn World) -> Stock {
        self.count(world, &self.material)
    }

    /// Buy-currency held by the shop.
    pub fn buy_capital(&self, world: &dyn World) -> Stock {
        match self.buy_currency() {
            Some(currency) => self.count(world, currency),
            None => Stock::Count(0),
        }
    }

    /// Sell-currency the shop can pay out.
    pub fn sell_capital(&self, world: &dyn World) -> Stock {
        match self.sell_currency() {
            Some(currency) => self.count(world, currency),
            None => Stock::Count(0),
        }
    }

    /// Player pays `buy.price` currency and receives `buy.amount` items.
    pub fn buy(
        &self,
        player: &mut Player,
        world: &mut dyn World,
        ctx: &ShopContext,
        log: Option<&mut dyn TransactionLog>,
    ) -> Result<Trade, TradeFailure> {
        let rate = self.buy.as_ref().ok_or(TradeFailure::NoBuy)?;
        let materials = ctx.materials();
        let material_name = materials.display_name(&self.material);
        let currency_name = materials.display_name(rate.currency());

        let items = self.material.stack(rate.amount());
        let money = rate.currency().stack(rate.price());

        self.settle(
            player,
            world,
            (money.as_ref(), items.as_ref()),
            |failure| match failure {
                ExchangeFailure::Remove => TradeFailure::NotEnoughPlayerMoney(currency_name.clone()),
                ExchangeFailure::Add => TradeFailure::PlayerInventoryFull,
            },
            |failure| match failure {
                ExchangeFailure::Remove => TradeFailure::NotEnoughShopItems(material_name.clone()),
                ExchangeFailure::Add => TradeFailure::ChestInventoryFull,
            },
        )?;

        debug!(
            "{} bought {} {} for {} {} from {}",
            player.name,
            rate.amount(),
            self.material.raw_name(),
            rate.price(),
            rate.currency().raw_name(),
            self.owner
        );
        self.report(
            log,
            &player.name,
            rate,
            i64::from(rate.price()),
            -i64::from(rate.amount()),
        );

        Ok(Trade {
            kind: TradeKind::Buy,
            amount: rate.amount(),
            material: material_name,
            price: rate.price(),
            currency: currency_name,
        })
    }

    /// Player hands over `sell.amount` items and receives `sell.price` currency.
    pub fn sell(
        &self,
        player: &mut Player,
        world: &mut dyn World,
        ctx: &ShopContext,
        log: Option<&mut dyn TransactionLog>,
    ) -> Result<Trade, TradeFailure> {
        let rate = self.sell.as_ref().ok_or(TradeFailure::NoSell)?;
        let materials = ctx.materials();
        let material_name = materials.display_name(&self.material);
        let currency_name = materials.display_name(rate.currency());

        let items = self.material.stack(rate.amount());
        let money = rate.currency().stack(rate.price());

        self.settle(
            player,
            world,
            (items.as_ref(), money.as_ref()),
            |failure| match failure {
                ExchangeFailure::Remove => TradeFailure::NotEnoughPlayerItems(material_name.clone()),
                ExchangeFailure::Add => TradeFailure::PlayerInventoryFull,
            },
            |failure| match failure {
                ExchangeFailure::Remove => TradeFailure::NotEnoughShopMoney(currency_name.clone()),
                ExchangeFailure::Add => TradeFailure::ChestInventoryFull,
            },
        )?;

        debug!(
            "{} sold {} {} for {} {} to {}",
            player.name,
            rate.amount(),
            self.material.raw_name(),
            rate.price(),
            rate.currency().raw_name(),
            self.owner
        );
        self.report(
            log,
            &player.name,
            rate,
            -i64::from(rate.price()),
            i64::from(rate.amount()),
        );

        Ok(Trade {
            kind: TradeKind::Sell,
            amount: rate.amount(),
            material: material_name,
            price: rate.price(),
            currency: currency_name,
        })
    }

    /// Run the player side, then the container side. A container failure
    /// puts the player's inventory back.
    fn settle<P, C>(
        &self,
        player: &mut Player,
        world: &mut dyn World,
        (player_gives, player_gets): (Option<&ItemStack>, Option<&ItemStack>),
        player_failure: P,
        container_failure: C,
    ) -> Result<(), TradeFailure>
    where
        P: Fn(ExchangeFailure) -> TradeFailure,
        C: Fn(ExchangeFailure) -> TradeFailure,
    {
        let before = player.inventory.snapshot();
        exchange(&mut player.inventory, player_gives, player_gets)
            .map_err(|e| player_failure(exchange_failure(e)))?;

        let ShopStock::Container { location } = self.stock else {
            return Ok(());
        };

        let result = match world.container_mut(location) {
            Some(container) => exchange(container, player_gets, player_gives)
                .map_err(|e| container_failure(exchange_failure(e))),
            None => {
                error!("Shop container at {} is missing", location);
                Err(container_failure(ExchangeFailure::Remove))
            }
        };

        if result.is_err() {
            player.inventory.restore(before);
        }
        result
    }

    fn report(
        &self,
        log: Option<&mut dyn TransactionLog>,
        actor: &str,
        rate: &Rate,
        currency_delta: i64,
        material_delta: i64,
    ) {
        let (Some(log), Some(placement)) = (log, self.placement) else {
            return;
        };
        let at = placement.sign.relative(Direction::Down);
        if currency_delta != 0 {
            log.record(actor, at, rate.currency().kind(), currency_delta);
        }
        if material_delta != 0 {
            log.record(actor, at, self.material.kind(), material_delta);
        }
    }

    /// Buy when holding the buy currency, sell when holding the traded item,
    /// otherwise nothing happens (`Ok(None)`).
    pub fn interact(
        &self,
        player: &mut Player,
        world: &mut dyn World,
        ctx: &ShopContext,
        log: Option<&mut dyn TransactionLog>,
    ) -> Result<Option<Trade>, TradeFailure> {
        let Some(held) = player.hand.clone() else {
            return Ok(None);
        };
        if self.buy_currency() == Some(&held) {
            self.buy(player, world, ctx, log).map(Some)
        } else if held == self.material {
            self.sell(player, world, ctx, log).map(Some)
        } else {
            Ok(None)
        }
    }

    /// The lever or button to pulse after a trade, when enabled.
    ///
    /// Only wall signs qualify: the switch sits two blocks behind the sign,
    /// on the far side of the block holding it, and must be mounted facing
    /// back towards the sign.
    pub fn redstone_target(&self, world: &dyn World, ctx: &ShopContext) -> Option<Location> {
        if !ctx.settings().trigger_redstone {
            return None;
        }
        let placement = self.placement?;
        let back = world.attached_face(placement.sign)?;
        if !matches!(
            back,
            Direction::North | Direction::South | Direction::East | Direction::West
        ) {
            return None;
        }

        let target = placement.attached.relative(back);
        let is_switch = world.block_kind(target).is_some_and(|k| k.is_switch());
        if !is_switch || world.attached_face(target) != Some(back.opposite()) {
            return None;
        }
        debug!("Shop at {} pulses switch at {}", placement.sign, target);
        Some(target)
    }

    /// Read-only summary: a stock line for container shops, then a rate line
    /// for each side that can cover one trade.
    pub fn status(&self, world: &dyn World, ctx: &ShopContext) -> Vec<StatusLine> {
        let materials = ctx.materials();
        let material = materials.display_name(&self.material);
        let mut lines = Vec::new();

        if let ShopStock::Container { .. } = self.stock {
            lines.push(self.stock_line(world, ctx, &material));
        }

        if let Some(rate) = &self.buy {
            if self.shop_items(world).covers(rate.amount()) {
                lines.push(StatusLine::BuyRate {
                    amount: rate.amount(),
                    material: material.clone(),
                    price: rate.price(),
                    currency: materials.display_name(rate.currency()),
                });
            }
        }

        if let Some(rate) = &self.sell {
            if self.sell_capital(world).covers(rate.price()) {
                lines.push(StatusLine::SellRate {
                    amount: rate.amount(),
                    material,
                    price: rate.price(),
                    currency: materials.display_name(rate.currency()),
                });
            }
        }

        lines
    }

    fn stock_line(&self, world: &dyn World, ctx: &ShopContext, material: &str) -> StatusLine {
        let materials = ctx.materials();
        let name = |m: Option<&ShopMaterial>| m.map(|m| materials.display_name(m)).unwrap_or_default();
        let items = self.shop_items(world);

        match (self.buy_currency(), self.sell_currency()) {
            (_, None) if !ctx.settings().detailed_output => StatusLine::OneMaterial {
                count: items,
                material: material.to_string(),
            },
            (None, sell) if !ctx.settings().detailed_output => StatusLine::OneMaterial {
                count: self.sell_capital(world),
                material: name(sell),
            },
            (_, sell) if !ctx.settings().detailed_output => StatusLine::OneCurrency {
                capital: self.sell_capital(world),
                currency: name(sell),
                items,
                material: material.to_string(),
            },
            (None, sell) => StatusLine::OneCurrency {
                capital: self.sell_capital(world),
                currency: name(sell),
                items,
                material: material.to_string(),
            },
            (buy, sell) if sell.is_none() || sell == buy => StatusLine::OneCurrency {
                capital: self.buy_capital(world),
                currency: name(buy),
                items,
                material: material.to_string(),
            },
            (buy, sell) => StatusLine::Full {
                buy_capital: self.buy_capital(world),
                buy_currency: name(buy),
                sell_capital: self.sell_capital(world),
                sell_currency: name(sell),
                items,
                material: material.to_string(),
            },
        }
    }
}

fn exchange_failure(error: ShopError) -> ExchangeFailure {
    match error {
        ShopError::Exchange(failure) => failure,
        _ => ExchangeFailure::Remove,
    }
}

impl PartialEq for Shop {
    fn eq(&self, other: &Self) -> bool {
        match (self.placement, other.placement) {
            (Some(a), Some(b)) => a.sign == b.sign,
            (None, None) => {
                self.material == other.material
                    && self.owner == other.owner
                    && self.buy == other.buy
                    && self.sell == other.sell
            }
            _ => false,
        }
    }
}

impl Eq for Shop {}

impl Hash for Shop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.placement {
            Some(p) => p.sign.hash(state),
            None => {
                self.material.hash(state);
                self.owner.hash(state);
                self.buy.hash(state);
                self.sell.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::shop::ledger::TransactionRecord;
    use crate::shop::material::ItemKind;
    use crate::world::{GridWorld, SignBlock};

    fn ctx() -> ShopContext {
        let mut config = Config::default();
        config.currencies.insert("d".to_string(), "Diamond".to_string());
        ShopContext::from_config(&config).unwrap()
    }

    fn lines(l: [&str; 4]) -> [String; 4] {
        l.map(String::from)
    }

    fn mat(name: &str) -> ShopMaterial {
        ShopMaterial::plain(ItemKind::from_name(name).unwrap())
    }

    /// Chest at the origin with a sign post on top.
    fn chest_shop(world: &mut GridWorld, text: [&str; 4], ctx: &ShopContext) -> Shop {
        let chest = Location::new(0, 0, 0);
        let sign = chest.relative(Direction::Up);
        world.set_block(chest, ItemKind::CHEST);
        world.set_sign(sign, SignBlock::from_lines(&text, Direction::Down));
        Shop::bound(world, sign, ShopStock::Container { location: chest }, ctx).unwrap()
    }

    fn fill(world: &mut GridWorld, name: &str, amount: u32) {
        world
            .container_mut(Location::new(0, 0, 0))
            .unwrap()
            .add(&ItemStack::new(mat(name), amount))
            .unwrap();
    }

    #[test]
    fn test_from_lines_example_shop() {
        let ctx = ctx();
        let shop = Shop::from_lines(&lines(["Gold Ingot", "Buy 1 for 10g", "Sell 1 for 5g", "Alice"]), &ctx).unwrap();
        assert_eq!(shop.material(), &mat("GOLD_INGOT"));
        assert_eq!(shop.buy_rate().unwrap().price(), 10);
        assert_eq!(shop.sell_rate().unwrap().price(), 5);
        assert_eq!(shop.owner(), "Alice");
        assert!(shop.placement().is_none());
    }

    #[test]
    fn test_from_lines_rejections() {
        let ctx = ctx();
        assert!(matches!(
            Shop::from_lines(&lines(["Wood", "Buy 1 for 1g", "", ""]), &ctx),
            Err(ShopError::InvalidSignOwner)
        ));
        assert!(matches!(
            Shop::from_lines(&lines(["Wood", "Buy x", "Sell y", "Bob"]), &ctx),
            Err(ShopError::InvalidSign)
        ));
        assert!(matches!(
            Shop::from_lines(&lines(["Unobtainium", "Buy 1 for 1g", "", "Bob"]), &ctx),
            Err(ShopError::InvalidSign)
        ));
    }

    #[test]
    fn test_signless_equality_by_fields() {
        let ctx = ctx();
        let a = Shop::from_lines(&lines(["Wood", "Buy 1 for 1g", "", "Bob"]), &ctx).unwrap();
        let b = Shop::from_lines(&lines(["wood", "buy 1 for 1g", "junk", "Bob"]), &ctx).unwrap();
        let c = Shop::from_lines(&lines(["Wood", "Buy 1 for 2g", "", "Bob"]), &ctx).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_buy_moves_goods_both_ways() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "Buy 2 for 10g", "", "Alice"], &ctx);
        fill(&mut world, "DIAMOND", 5);
        let mut buyer = Player::new("Bob");
        buyer.inventory.add(&ItemStack::new(mat("GOLD_INGOT"), 15)).unwrap();
        let mut records: Vec<TransactionRecord> = Vec::new();

        let trade = shop.buy(&mut buyer, &mut world, &ctx, Some(&mut records)).unwrap();
        assert_eq!(trade.to_string(), "You bought 2 Diamond for 10 Gold Ingot.");
        assert_eq!(buyer.inventory.count(&mat("DIAMOND")), 2);
        assert_eq!(buyer.inventory.count(&mat("GOLD_INGOT")), 5);
        let chest = world.container(Location::new(0, 0, 0)).unwrap();
        assert_eq!(chest.count(&mat("DIAMOND")), 3);
        assert_eq!(chest.count(&mat("GOLD_INGOT")), 10);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].delta, 10);
        assert_eq!(records[0].kind, ItemKind::from_name("GOLD_INGOT").unwrap());
        assert_eq!(records[1].delta, -2);
        assert_eq!(records[1].location, Location::new(0, 0, 0));
    }

    #[test]
    fn test_buy_failure_rolls_back_player() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "Buy 2 for 10g", "", "Alice"], &ctx);
        fill(&mut world, "DIAMOND", 1);
        let mut buyer = Player::new("Bob");
        buyer.inventory.add(&ItemStack::new(mat("GOLD_INGOT"), 15)).unwrap();
        let before = buyer.inventory.clone();
        let chest_before = world.container(Location::new(0, 0, 0)).unwrap().clone();

        let err = shop.buy(&mut buyer, &mut world, &ctx, None).unwrap_err();
        assert_eq!(err, TradeFailure::NotEnoughShopItems("Diamond".to_string()));
        assert_eq!(buyer.inventory, before);
        assert_eq!(world.container(Location::new(0, 0, 0)).unwrap(), &chest_before);
    }

    #[test]
    fn test_sell_failures() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "", "Sell 1 for 3d", "Alice"], &ctx);
        let mut seller = Player::new("Bob");

        assert_eq!(
            shop.buy(&mut seller, &mut world, &ctx, None).unwrap_err(),
            TradeFailure::NoBuy
        );
        assert_eq!(
            shop.sell(&mut seller, &mut world, &ctx, None).unwrap_err(),
            TradeFailure::NotEnoughPlayerItems("Diamond".to_string())
        );

        seller.inventory.add(&ItemStack::new(mat("DIAMOND"), 1)).unwrap();
        assert_eq!(
            shop.sell(&mut seller, &mut world, &ctx, None).unwrap_err(),
            TradeFailure::NotEnoughShopMoney("Diamond".to_string())
        );
        assert_eq!(seller.inventory.count(&mat("DIAMOND")), 1);
    }

    #[test]
    fn test_unlimited_shop_skips_container_side() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let at = Location::new(5, 5, 5);
        world.set_sign(at, SignBlock::from_lines(&["Diamond", "Buy 1 for 1g", "", "[Server]"], Direction::North));
        let shop = Shop::bound(&world, at, ShopStock::Unlimited, &ctx).unwrap();
        let mut buyer = Player::new("Bob");
        buyer.inventory.add(&ItemStack::new(mat("GOLD_INGOT"), 1)).unwrap();

        shop.buy(&mut buyer, &mut world, &ctx, None).unwrap();
        assert_eq!(buyer.inventory.count(&mat("DIAMOND")), 1);
        assert_eq!(shop.shop_items(&world), Stock::Unbounded);
    }

    #[test]
    fn test_interact_follows_held_item() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "Buy 1 for 1g", "Sell 1 for 1g", "Alice"], &ctx);
        fill(&mut world, "DIAMOND", 1);
        let mut player = Player::new("Bob").holding(mat("GOLD_INGOT"));
        player.inventory.add(&ItemStack::new(mat("GOLD_INGOT"), 1)).unwrap();

        let trade = shop.interact(&mut player, &mut world, &ctx, None).unwrap().unwrap();
        assert_eq!(trade.kind, TradeKind::Buy);

        player.hand = Some(mat("DIAMOND"));
        let trade = shop.interact(&mut player, &mut world, &ctx, None).unwrap().unwrap();
        assert_eq!(trade.kind, TradeKind::Sell);

        player.hand = Some(mat("STONE"));
        assert_eq!(shop.interact(&mut player, &mut world, &ctx, None), Ok(None));
    }

    #[test]
    fn test_status_lines() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "Buy 2 for 10g", "Sell 1 for 1d", "Alice"], &ctx);
        fill(&mut world, "DIAMOND", 1);

        let status = shop.status(&world, &ctx);
        // Diamond is both the traded item and the sell currency: stock covers a sale but not a purchase.
        assert_eq!(status.len(), 2);
        assert!(matches!(&status[0], StatusLine::Full { items: Stock::Count(1), .. }));
        assert_eq!(status[1].to_string(), "Sell 1 Diamond for 1 Diamond");
    }

    #[test]
    fn test_is_shop_block() {
        let ctx = ctx();
        let mut world = GridWorld::new();
        let shop = chest_shop(&mut world, ["Diamond", "Buy 1 for 1g", "", "Alice"], &ctx);
        let chest = Location::new(0, 0, 0);
        assert!(shop.is_shop_block(chest));
        assert!(shop.is_shop_block(chest.relative(Direction::Up)));
        assert!(!shop.is_shop_block(chest.relative(Direction::North)));
    }

    #[test]
    fn test_smart_owner_ignores_auto_fill() {
        use crate::names::{NameEquivalence, NameRegistry};

        let mut registry = NameRegistry::new();
        let key = registry.register("Maximilian_the_Merchant").unwrap();
        let mut config = Config::default();
        config.shop.extended_names = true;
        config.shop.auto_fill_name = false;
        let ctx = ShopContext::from_config(&config).unwrap().with_names(Box::new(registry));

        let shop = Shop::from_lines(&lines(["Wood", "Buy 1 for 1g", "", key.as_str()]), &ctx).unwrap();
        assert!(shop.is_smart_owner("Maximilian_the_Merchant", &ctx));
        assert!(!shop.is_smart_owner(&key, &ctx));
    }

    #[test]
    fn test_redstone_target_behind_wall_sign() {
        let mut config = Config::default();
        config.shop.trigger_redstone = true;
        let ctx = ShopContext::from_config(&config).unwrap();
        let mut world = GridWorld::new();
        let sign = Location::new(0, 1, 0);
        world.set_sign(sign, SignBlock::from_lines(&["Diamond", "Buy 1 for 1g", "", "[Server]"], Direction::East));
        let shop = Shop::bound(&world, sign, ShopStock::Unlimited, &ctx).unwrap();
        let switch = Location::new(2, 1, 0);

        assert_eq!(shop.redstone_target(&world, &ctx), None);

        world.set_attached(switch, ItemKind::LEVER, Direction::North);
        assert_eq!(shop.redstone_target(&world, &ctx), None);

        world.set_attached(switch, ItemKind::STONE_BUTTON, Direction::West);
        assert_eq!(shop.redstone_target(&world, &ctx), Some(switch));

        world.set_block(switch, ItemKind::CHEST);
        assert_eq!(shop.redstone_target(&world, &ctx), None);

        world.set_attached(switch, ItemKind::LEVER, Direction::West);
        let off = ShopContext::from_config(&Config::default()).unwrap();
        assert_eq!(shop.redstone_target(&world, &off), None);
    }

    #[test]
    fn test_can_destroy() {
        let mut config = Config::default();
        config.permissions.admins = vec!["Op".to_string()];
        let ctx = ShopContext::from_config(&config).unwrap();
        let shop = Shop::from_lines(&lines(["Wood", "Buy 1 for 1g", "", "Alice"]), &ctx).unwrap();
        assert!(shop.can_destroy("Alice", &ctx));
        assert!(shop.can_destroy("Op", &ctx));
        assert!(!shop.can_destroy("Mallory", &ctx));
    }
}
