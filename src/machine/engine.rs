use thiserror::Error;

use crate::catalog::Product;
use crate::currency::Money;

use super::inventory::Inventory;
use super::ledger::{CashLedger, InsufficientFunds};

/// Why a purchase was refused. Every variant leaves the ledger and the
/// inventory exactly as they were; the session stays active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("the id `{0}` does not match any slot")]
    InvalidId(String),
    #[error(transparent)]
    InsufficientFunds(#[from] InsufficientFunds),
    #[error("{name} ({id}) is sold out")]
    SoldOut { id: String, name: String },
}

/// Validates and applies a purchase. Checks run in a fixed order and the
/// first failure wins:
///
/// 1. the id must name a slot,
/// 2. the balance must cover the price,
/// 3. the slot must have stock.
///
/// Only then are the debit and the stock decrement applied, together. The
/// machine is single-threaded, so nothing can interleave between the two.
pub fn purchase(
    inventory: &mut Inventory,
    ledger: &mut CashLedger,
    id: &str,
) -> Result<Product, PurchaseError> {
    let product = inventory
        .product(id)
        .cloned()
        .ok_or_else(|| PurchaseError::InvalidId(id.to_string()))?;
    if ledger.balance() < product.price {
        return Err(InsufficientFunds {
            balance: ledger.balance(),
            required: product.price,
        }
        .into());
    }
    if inventory.quantity_of(&product.id).unwrap_or(0) == 0 {
        return Err(PurchaseError::SoldOut {
            id: product.id.clone(),
            name: product.name.clone(),
        });
    }
    ledger.debit(product.price)?;
    inventory.decrement(&product.id);
    Ok(product)
}
