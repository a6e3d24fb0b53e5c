//! The world seen by shops: block positions, signs, containers and players.
//!
//! Shops never own world state. They hold [`Location`]s and reach the blocks
//! behind them through the [`World`] trait, so a host embeds the engine by
//! implementing that trait. [`GridWorld`] is a plain in-memory map used by the
//! CLI and the tests.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shop::inventory::Inventory;
use crate::shop::material::{ItemKind, ShopMaterial};

/// Block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring block in `direction`.
    pub fn relative(&self, direction: Direction) -> Location {
        let (dx, dy, dz) = direction.offset();
        Location::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The block itself.
    Here,
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    fn offset(&self) -> (i32, i32, i32) {
        match self {
            Direction::Here => (0, 0, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Here => Direction::Here,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// A sign's text and the face it is mounted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignBlock {
    pub lines: [String; 4],
    /// Direction from the sign to the block holding it up (`Down` for posts).
    pub attached: Direction,
}

impl SignBlock {
    pub fn new(lines: [String; 4], attached: Direction) -> Self {
        Self { lines, attached }
    }

    /// Build from borrowed lines; missing lines are blank, extras ignored.
    pub fn from_lines(lines: &[&str], attached: Direction) -> Self {
        let line = |i: usize| lines.get(i).map(|s| s.to_string()).unwrap_or_default();
        Self::new([line(0), line(1), line(2), line(3)], attached)
    }
}

/// Read and write access to the blocks shops care about.
pub trait World {
    /// Kind of the block at `location`, `None` for air or unloaded space.
    fn block_kind(&self, location: Location) -> Option<ItemKind>;

    fn sign(&self, location: Location) -> Option<&SignBlock>;

    fn container(&self, location: Location) -> Option<&Inventory>;

    fn container_mut(&mut self, location: Location) -> Option<&mut Inventory>;

    /// Direction from an attached block (sign, lever, button) to the block
    /// it is mounted on.
    fn attached_face(&self, location: Location) -> Option<Direction> {
        self.sign(location).map(|s| s.attached)
    }
}

#[derive(Debug, Clone)]
struct Block {
    kind: ItemKind,
    sign: Option<SignBlock>,
    inventory: Option<Inventory>,
    attached: Option<Direction>,
}

/// In-memory world keyed by location.
#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    blocks: HashMap<Location, Block>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a plain block, replacing anything already there.
    pub fn set_block(&mut self, location: Location, kind: ItemKind) {
        let inventory = kind.is_container().then(|| Inventory::new(Inventory::CHEST_SLOTS));
        self.blocks.insert(
            location,
            Block {
                kind,
                sign: None,
                inventory,
                attached: None,
            },
        );
    }

    /// Place a sign. Posts (`Down`) and wall signs get their own kinds.
    pub fn set_sign(&mut self, location: Location, sign: SignBlock) {
        let kind = if sign.attached == Direction::Down {
            ItemKind::SIGN_POST
        } else {
            ItemKind::WALL_SIGN
        };
        let attached = Some(sign.attached);
        self.blocks.insert(
            location,
            Block {
                kind,
                sign: Some(sign),
                inventory: None,
                attached,
            },
        );
    }

    /// Place a block mounted against its neighbour in `attached`, such as a
    /// lever on a wall.
    pub fn set_attached(&mut self, location: Location, kind: ItemKind, attached: Direction) {
        self.blocks.insert(
            location,
            Block {
                kind,
                sign: None,
                inventory: None,
                attached: Some(attached),
            },
        );
    }

    /// Replace the text of an existing sign. Returns false when there is none.
    pub fn set_sign_lines(&mut self, location: Location, lines: [String; 4]) -> bool {
        match self.blocks.get_mut(&location).and_then(|b| b.sign.as_mut()) {
            Some(sign) => {
                sign.lines = lines;
                true
            }
            None => false,
        }
    }

    pub fn remove_block(&mut self, location: Location) -> bool {
        self.blocks.remove(&location).is_some()
    }
}

impl World for GridWorld {
    fn block_kind(&self, location: Location) -> Option<ItemKind> {
        self.blocks.get(&location).map(|b| b.kind)
    }

    fn sign(&self, location: Location) -> Option<&SignBlock> {
        self.blocks.get(&location).and_then(|b| b.sign.as_ref())
    }

    fn container(&self, location: Location) -> Option<&Inventory> {
        self.blocks.get(&location).and_then(|b| b.inventory.as_ref())
    }

    fn container_mut(&mut self, location: Location) -> Option<&mut Inventory> {
        self.blocks.get_mut(&location).and_then(|b| b.inventory.as_mut())
    }

    fn attached_face(&self, location: Location) -> Option<Direction> {
        self.blocks.get(&location).and_then(|b| b.attached)
    }
}

/// A trading player: a name, their inventory and what they hold.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub inventory: Inventory,
    /// Material of the item in hand, `None` for an empty hand.
    pub hand: Option<ShopMaterial>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: Inventory::new(Inventory::PLAYER_SLOTS),
            hand: None,
        }
    }

    pub fn holding(mut self, material: ShopMaterial) -> Self {
        self.hand = Some(material);
        self
    }
}
