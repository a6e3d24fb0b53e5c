//! Test utilities & fixtures.
//! Provides the fixture configuration under `tests/test-data-int` and small
//! world builders shared by the integration tests.

use std::path::{Path, PathBuf};

use signshop::config::Config;
use signshop::context::ShopContext;
use signshop::shop::{ItemKind, ItemStack, ShopMaterial};
use signshop::world::{Direction, GridWorld, Location, SignBlock};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// The fixture configuration: MATCH buy lines, SPLIT sell lines.
pub fn fixture_config() -> Config {
    let text = std::fs::read_to_string(fixture_root().join("signshop.toml")).expect("fixture config");
    Config::from_toml_str(&text).expect("parse fixture config")
}

#[allow(dead_code)]
pub fn context() -> ShopContext {
    ShopContext::from_config(&fixture_config()).expect("fixture context")
}

#[allow(dead_code)]
pub fn material(name: &str) -> ShopMaterial {
    ShopMaterial::plain(ItemKind::from_name(name).expect("known kind"))
}

#[allow(dead_code)]
pub fn stack(name: &str, amount: u32) -> ItemStack {
    ItemStack::new(material(name), amount)
}

/// Chest at `chest` with a sign post directly above carrying `lines`.
/// Returns the sign location.
#[allow(dead_code)]
pub fn place_chest_shop(world: &mut GridWorld, chest: Location, lines: [&str; 4]) -> Location {
    let sign = chest.relative(Direction::Up);
    world.set_block(chest, ItemKind::CHEST);
    world.set_sign(sign, SignBlock::from_lines(&lines, Direction::Down));
    sign
}
