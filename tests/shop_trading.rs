//! Trading through container and server shops.
mod common;

use common::{context, material, place_chest_shop, stack};
use signshop::config::Config;
use signshop::context::ShopContext;
use signshop::shop::{
    locate_shop, Shop, ShopStock, StatusLine, Stock, TradeFailure, TradeKind, TransactionRecord,
};
use signshop::world::{Direction, GridWorld, Location, Player, SignBlock, World};

fn chest_count(world: &GridWorld, chest: Location, name: &str) -> u32 {
    world.container(chest).unwrap().count(&material(name))
}

#[test]
fn test_example_shop_parses_with_default_config() {
    let ctx = ShopContext::from_config(&Config::default()).unwrap();
    let lines = ["Gold Ingot", "Buy 1 for 10g", "Sell 1 for 5g", "Alice"].map(String::from);
    let shop = Shop::from_lines(&lines, &ctx).unwrap();

    assert_eq!(shop.material(), &material("GOLD_INGOT"));
    let buy = shop.buy_rate().unwrap();
    assert_eq!((buy.amount(), buy.price()), (1, 10));
    assert_eq!(buy.currency(), &material("GOLD_INGOT"));
    let sell = shop.sell_rate().unwrap();
    assert_eq!((sell.amount(), sell.price()), (1, 5));
    assert_eq!(shop.owner(), "Alice");
}

#[test]
fn test_buy_until_stock_runs_out() {
    let ctx = context();
    let mut world = GridWorld::new();
    let chest = Location::new(0, 64, 0);
    let sign = place_chest_shop(&mut world, chest, ["Diamond", "Buy 3 for 2g", "", "Alice"]);
    world.container_mut(chest).unwrap().add(&stack("DIAMOND", 10)).unwrap();
    let shop = locate_shop(&world, sign, &ctx).unwrap();

    let mut buyer = Player::new("Bob");
    buyer.inventory.add(&stack("GOLD_INGOT", 64)).unwrap();
    let mut ledger: Vec<TransactionRecord> = Vec::new();

    let mut trades = 0;
    let failure = loop {
        match shop.buy(&mut buyer, &mut world, &ctx, Some(&mut ledger)) {
            Ok(trade) => {
                assert_eq!(trade.kind, TradeKind::Buy);
                trades += 1;
            }
            Err(failure) => break failure,
        }
    };

    assert_eq!(trades, 3);
    assert_eq!(failure, TradeFailure::NotEnoughShopItems("Diamond".to_string()));
    // goods are conserved across the two inventories
    assert_eq!(buyer.inventory.count(&material("DIAMOND")) + chest_count(&world, chest, "DIAMOND"), 10);
    assert_eq!(buyer.inventory.count(&material("GOLD_INGOT")) + chest_count(&world, chest, "GOLD_INGOT"), 64);
    assert_eq!(chest_count(&world, chest, "GOLD_INGOT"), 6);
    assert_eq!(ledger.len(), 6);
    assert!(ledger.iter().all(|r| r.actor == "Bob" && r.location == chest));
}

#[test]
fn test_sell_into_full_chest_changes_nothing() {
    let ctx = context();
    let mut world = GridWorld::new();
    let chest = Location::new(0, 0, 0);
    let sign = place_chest_shop(&mut world, chest, ["Cobblestone", "", "Sell 64 1 d", "Alice"]);
    {
        let inv = world.container_mut(chest).unwrap();
        for _ in 0..inv.size() {
            inv.add(&stack("DIAMOND", 64)).unwrap();
        }
    }
    let shop = locate_shop(&world, sign, &ctx).unwrap();

    let mut seller = Player::new("Bob");
    seller.inventory.add(&stack("COBBLESTONE", 64)).unwrap();
    let seller_before = seller.inventory.clone();
    let chest_before = world.container(chest).unwrap().clone();

    let err = shop.sell(&mut seller, &mut world, &ctx, None).unwrap_err();
    assert_eq!(err, TradeFailure::ChestInventoryFull);
    assert_eq!(seller.inventory, seller_before);
    assert_eq!(world.container(chest).unwrap(), &chest_before);
}

#[test]
fn test_player_inventory_full() {
    let ctx = context();
    let mut world = GridWorld::new();
    let at = Location::new(3, 3, 3);
    world.set_sign(at, SignBlock::from_lines(&["Bow", "Buy 2 for 1g", "", "[Server]"], Direction::South));
    let shop = locate_shop(&world, at, &ctx).unwrap();
    assert_eq!(shop.stock(), ShopStock::Unlimited);

    let mut buyer = Player::new("Bob");
    buyer.inventory.add(&stack("GOLD_INGOT", 1)).unwrap();
    for _ in 1..buyer.inventory.size() {
        buyer.inventory.add(&stack("STONE", 64)).unwrap();
    }
    // Paying frees the gold slot, but a bow takes a whole slot each.
    let err = shop.buy(&mut buyer, &mut world, &ctx, None).unwrap_err();
    assert_eq!(err, TradeFailure::PlayerInventoryFull);
    assert_eq!(buyer.inventory.count(&material("GOLD_INGOT")), 1);
}

#[test]
fn test_missing_rate_sides() {
    let ctx = context();
    let mut world = GridWorld::new();
    let sign = place_chest_shop(&mut world, Location::new(0, 0, 0), ["Diamond", "Buy 1 for 1g", "", "Alice"]);
    let shop = locate_shop(&world, sign, &ctx).unwrap();
    let mut player = Player::new("Bob");
    assert_eq!(shop.sell(&mut player, &mut world, &ctx, None).unwrap_err(), TradeFailure::NoSell);
    assert_eq!(TradeFailure::NoSell.to_string(), "You can't sell to this shop.");
}

#[test]
fn test_status_follows_output_mode() {
    let mut config = common::fixture_config();
    let mut world = GridWorld::new();
    let chest = Location::new(0, 0, 0);
    let sign = place_chest_shop(&mut world, chest, ["Diamond", "Buy 1 for 5g", "Sell 1 2 e", "Alice"]);
    world.container_mut(chest).unwrap().add(&stack("DIAMOND", 4)).unwrap();
    world.container_mut(chest).unwrap().add(&stack("EMERALD", 1)).unwrap();

    let detailed = ShopContext::from_config(&config).unwrap();
    let shop = locate_shop(&world, sign, &detailed).unwrap();
    let status = shop.status(&world, &detailed);
    assert_eq!(
        status[0],
        StatusLine::Full {
            buy_capital: Stock::Count(0),
            buy_currency: "Gold Ingot".to_string(),
            sell_capital: Stock::Count(1),
            sell_currency: "Emerald".to_string(),
            items: Stock::Count(4),
            material: "Diamond".to_string(),
        }
    );
    // one emerald cannot pay for a sale at 2
    assert_eq!(status.len(), 2);
    assert_eq!(status[1].to_string(), "Buy 1 Diamond for 5 Gold Ingot");

    config.shop.detailed_output = false;
    let terse = ShopContext::from_config(&config).unwrap();
    let status = shop.status(&world, &terse);
    assert_eq!(status[0].to_string(), "This shop has 1 Emerald and 4 Diamond.");
}

#[test]
fn test_server_shop_status_has_no_stock_line() {
    let ctx = context();
    let mut world = GridWorld::new();
    let at = Location::new(0, 0, 0);
    world.set_sign(at, SignBlock::from_lines(&["Diamond", "Buy 1 for 5g", "Sell 1 2 g", "[server]"], Direction::Down));
    let shop = locate_shop(&world, at, &ctx).unwrap();
    assert_eq!(shop.shop_items(&world), Stock::Unbounded);
    let status = shop.status(&world, &ctx);
    assert_eq!(status.len(), 2);
    assert!(matches!(status[0], StatusLine::BuyRate { .. }));
    assert!(matches!(status[1], StatusLine::SellRate { .. }));
}
