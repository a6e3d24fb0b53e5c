//! Finding shops around a block and deciding who may touch them.

use log::debug;

use crate::context::ShopContext;
use crate::names::SIGN_LINE_LIMIT;
use crate::world::{Direction, Location, World};

use super::record::{Shop, ShopStock};

/// The block and its four horizontal neighbours.
pub const CARDINAL: [Direction; 5] = [
    Direction::Here,
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

/// Every block whose shop could involve a given block.
pub const EXTENDED: [Direction; 7] = [
    Direction::Here,
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::Down,
    Direction::Up,
];

/// The shop whose sign is at `location`, if any.
///
/// A usable container below the sign makes a container shop; otherwise the
/// sign must name the server shop. Signs that fail to parse are not shops.
pub fn locate_shop(world: &dyn World, location: Location, ctx: &ShopContext) -> Option<Shop> {
    let sign = world.sign(location)?;
    let below = location.relative(Direction::Down);

    let stock = match world.block_kind(below) {
        Some(kind) if ctx.is_shop_container(kind) => ShopStock::Container { location: below },
        _ if ctx.is_server_marker(&sign.lines[3]) => ShopStock::Unlimited,
        _ => return None,
    };

    match Shop::bound(world, location, stock, ctx) {
        Ok(shop) => Some(shop),
        Err(e) => {
            debug!("Sign at {} is not a shop: {}", location, e);
            None
        }
    }
}

/// Add to `shops` every shop that `location` belongs to. Shops already in
/// the list are not added again.
pub fn locate_shops(world: &dyn World, location: Location, ctx: &ShopContext, shops: &mut Vec<Shop>) {
    for direction in EXTENDED {
        let Some(shop) = locate_shop(world, location.relative(direction), ctx) else {
            continue;
        };
        if shop.is_shop_block(location) && !shops.contains(&shop) {
            shops.push(shop);
        }
    }
}

/// [`locate_shops`] over several blocks, such as an explosion's block list.
pub fn locate_shops_in<I>(world: &dyn World, locations: I, ctx: &ShopContext, shops: &mut Vec<Shop>)
where
    I: IntoIterator<Item = Location>,
{
    for location in locations {
        locate_shops(world, location, ctx, shops);
    }
}

/// Whether `actor` may destroy every shop in `shops`. `None` stands for a
/// non-player cause (fire, physics, pistons).
pub fn is_shops_destroyable(shops: &[Shop], actor: Option<&str>, ctx: &ShopContext) -> bool {
    if shops.is_empty() {
        return true;
    }
    let Some(actor) = actor else {
        return false;
    };
    if ctx.is_admin(actor) {
        return true;
    }
    shops.iter().all(|shop| has_access(actor, Some(shop), ctx))
}

/// Ownership check that also denies everyone on server shops.
pub fn has_access(actor: &str, shop: Option<&Shop>, ctx: &ShopContext) -> bool {
    match shop {
        None => true,
        Some(shop) => !ctx.is_server_marker(shop.owner()) && shop.is_smart_owner(actor, ctx),
    }
}

/// True when `location` or a horizontal neighbour is a container whose shop
/// `actor` cannot access.
pub fn is_protected_chests_around(
    world: &dyn World,
    location: Location,
    actor: &str,
    ctx: &ShopContext,
) -> bool {
    CARDINAL.iter().any(|&direction| {
        let neighbour = location.relative(direction);
        let is_container = world.block_kind(neighbour).is_some_and(|k| k.is_container());
        if !is_container {
            return false;
        }
        let shop = locate_shop(world, neighbour.relative(Direction::Up), ctx);
        !has_access(actor, shop.as_ref(), ctx)
    })
}

/// Whether breaking `location` is allowed for `actor`.
pub fn is_block_destroyable(
    world: &dyn World,
    location: Location,
    actor: Option<&str>,
    ctx: &ShopContext,
) -> bool {
    let mut shops = Vec::new();
    locate_shops(world, location, ctx, &mut shops);
    is_shops_destroyable(&shops, actor, ctx)
}

/// First characters of `name` that fit on a sign line.
pub fn truncate_name(name: &str) -> String {
    name.chars().take(SIGN_LINE_LIMIT).collect()
}
