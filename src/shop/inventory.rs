//! Slot inventories and the atomic exchange primitive.
//!
//! Inventories hold a fixed number of slots; each slot is empty or holds a
//! stack of one material up to the kind's max stack size. [`exchange`] is the
//! only mutation shops perform: take one stack out, put another in, or leave
//! the inventory exactly as it was.

use super::errors::{ExchangeFailure, ShopError};
use super::material::ShopMaterial;

/// A quantity of one material.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemStack {
    pub material: ShopMaterial,
    pub amount: u32,
}

impl ItemStack {
    pub fn new(material: ShopMaterial, amount: u32) -> Self {
        Self { material, amount }
    }
}

/// Immutable copy of an inventory's slots, taken before a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<Option<ItemStack>>);

/// A fixed-size slot inventory (chest, dispenser, player holdings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Slots in a single chest.
    pub const CHEST_SLOTS: usize = 27;
    /// Slots in a player's main inventory.
    pub const PLAYER_SLOTS: usize = 36;

    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Total quantity of `material` across all slots.
    pub fn count(&self, material: &ShopMaterial) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| &s.material == material)
            .fold(0u32, |acc, s| acc.saturating_add(s.amount))
    }

    /// How many more of `material` would fit.
    pub fn free_space_for(&self, material: &ShopMaterial) -> u32 {
        let max = material.kind().max_stack();
        self.slots
            .iter()
            .map(|slot| match slot {
                None => max,
                Some(s) if &s.material == material => max.saturating_sub(s.amount),
                Some(_) => 0,
            })
            .fold(0u32, |acc, n| acc.saturating_add(n))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.slots.clone())
    }

    /// Put every slot back exactly as captured.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.slots = snapshot.0;
    }

    /// Remove `stack.amount` of its material, emptying from the last slot
    /// backwards. Nothing is touched if not enough is present.
    pub fn remove(&mut self, stack: &ItemStack) -> Result<(), ExchangeFailure> {
        if self.count(&stack.material) < stack.amount {
            return Err(ExchangeFailure::Remove);
        }
        let mut remaining = stack.amount;
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            if let Some(s) = slot {
                if s.material != stack.material {
                    continue;
                }
                let taken = remaining.min(s.amount);
                s.amount -= taken;
                remaining -= taken;
                if s.amount == 0 {
                    *slot = None;
                }
            }
        }
        Ok(())
    }

    /// Add `stack`, topping up partial stacks before using empty slots.
    /// Nothing is touched if it does not all fit.
    pub fn add(&mut self, stack: &ItemStack) -> Result<(), ExchangeFailure> {
        if self.free_space_for(&stack.material) < stack.amount {
            return Err(ExchangeFailure::Add);
        }
        let max = stack.material.kind().max_stack();
        let mut remaining = stack.amount;
        for s in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if s.material == stack.material && s.amount < max {
                let put = remaining.min(max - s.amount);
                s.amount += put;
                remaining -= put;
            }
        }
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let put = remaining.min(max);
                *slot = Some(ItemStack::new(stack.material.clone(), put));
                remaining -= put;
            }
        }
        Ok(())
    }
}

/// Atomically take `remove` out of `inventory` and put `add` in.
///
/// On error the inventory is equal to its state before the call. A `None`
/// side (zero quantity) is skipped.
pub fn exchange(
    inventory: &mut Inventory,
    remove: Option<&ItemStack>,
    add: Option<&ItemStack>,
) -> Result<(), ShopError> {
    let snapshot = inventory.snapshot();

    if let Some(stack) = remove {
        inventory.remove(stack).map_err(ShopError::Exchange)?;
    }

    if let Some(stack) = add {
        if let Err(failure) = inventory.add(stack) {
            inventory.restore(snapshot);
            return Err(ShopError::Exchange(failure));
        }
    }

    Ok(())
}
