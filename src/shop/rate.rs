use super::material::ShopMaterial;

/// A fixed ratio of traded-item quantity to currency quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rate {
    amount: u32,
    price: u32,
    currency: ShopMaterial,
}

impl Rate {
    pub fn new(amount: u32, price: u32, currency: ShopMaterial) -> Self {
        Self {
            amount,
            price,
            currency,
        }
    }

    /// Items handed over per trade.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Currency handed over per trade.
    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn currency(&self) -> &ShopMaterial {
        &self.currency
    }

    /// Items purchasable with `budget` currency, whole trades only.
    pub fn amount_for(&self, budget: u32) -> u32 {
        if self.price == 0 {
            return 0;
        }
        (budget / self.price).saturating_mul(self.amount)
    }

    /// Currency paid for `quantity` items, whole trades only.
    pub fn price_for(&self, quantity: u32) -> u32 {
        if self.amount == 0 {
            return 0;
        }
        (quantity / self.amount).saturating_mul(self.price)
    }
}
