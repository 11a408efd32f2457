use crate::catalog::{Catalog, Product};

/// One dispensing slot: a product and how many units remain.
#[derive(Debug, Clone)]
pub struct Slot {
    product: Product,
    quantity: u32,
}

impl Slot {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Mutable stock levels in catalog order. Lookups are case-insensitive on
/// the slot id; quantities never go below zero.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: Vec<Slot>,
}

impl Inventory {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let slots = catalog
            .entries()
            .iter()
            .map(|entry| Slot {
                product: entry.product.clone(),
                quantity: entry.initial_quantity,
            })
            .collect();
        Self { slots }
    }

    pub fn is_valid_id(&self, id: &str) -> bool {
        self.slot(id).is_some()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.slot(id).map(|slot| &slot.product)
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.slot(id).map(|slot| slot.quantity)
    }

    /// Slots in catalog order, for grid display.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.product.id.as_str())
    }

    /// Takes one unit out of a slot. Contract: only called by the purchase
    /// engine after its stock check, so the quantity is known to be > 0.
    pub(crate) fn decrement(&mut self, id: &str) -> Option<u32> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.product.id.eq_ignore_ascii_case(id))?;
        debug_assert!(slot.quantity > 0, "decrement on an empty slot");
        slot.quantity = slot.quantity.saturating_sub(1);
        Some(slot.quantity)
    }

    fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.product.id.eq_ignore_ascii_case(id))
    }
}
