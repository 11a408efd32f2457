use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::currency::{Money, DENOMINATIONS};

/// Smallest coin the change hopper holds. Every price must be a multiple of
/// this, otherwise change dispensal could strand a remainder.
const SMALLEST_COIN_CENTS: i64 = DENOMINATIONS[DENOMINATIONS.len() - 1].value.cents();

/// Stock shipped with a fresh machine, written out when no catalog file
/// exists yet.
const DEFAULT_STOCK: &str = "\
A1|Potato Crisps|3.05|5
A2|Stackers|1.45|5
A3|Grain Waves|2.75|5
A4|Cloud Popcorn|3.65|5
B1|Moonpie|1.80|5
B2|Cowtales|1.50|5
B3|Wonka Bar|1.50|5
B4|Crunchie|1.75|5
C1|Cola|1.25|5
C2|Dr. Salt|1.50|5
C3|Mountain Melter|1.50|5
C4|Heavy|1.50|5
D1|U-Chews|0.85|5
D2|Little League Chew|0.95|5
D3|Chiclets|0.75|5
D4|Triplemint|0.75|5
";

/// A vendable item. Created once at catalog load, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// One catalog row: a product plus its starting stock level.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: Product,
    pub initial_quantity: u32,
}

/// Static product catalog in slot order, parsed from `id|name|price|quantity`
/// rows.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `id|name|price|quantity`")]
    MalformedRow { line: usize },
    #[error("line {line}: invalid price `{value}`")]
    InvalidPrice { line: usize, value: String },
    #[error("line {line}: price must be a positive multiple of 5 cents")]
    UnpayablePrice { line: usize },
    #[error("line {line}: invalid quantity `{value}`")]
    InvalidQuantity { line: usize, value: String },
    #[error("line {line}: duplicate product id `{id}`")]
    DuplicateId { line: usize, id: String },
    #[error("catalog contains no rows")]
    Empty,
}

impl Catalog {
    /// Parses pipe-delimited rows, skipping blank lines.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        for (index, row) in input.lines().enumerate() {
            let line = index + 1;
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            let fields: Vec<&str> = row.split('|').collect();
            let [id, name, price, quantity] = fields[..] else {
                return Err(CatalogError::MalformedRow { line });
            };
            let id = id.trim();
            let name = name.trim();
            if id.is_empty() || name.is_empty() {
                return Err(CatalogError::MalformedRow { line });
            }
            if !seen.insert(id.to_ascii_uppercase()) {
                return Err(CatalogError::DuplicateId {
                    line,
                    id: id.to_string(),
                });
            }
            let price = parse_price(price).ok_or_else(|| CatalogError::InvalidPrice {
                line,
                value: price.trim().to_string(),
            })?;
            if price.cents() <= 0 || price.cents() % SMALLEST_COIN_CENTS != 0 {
                return Err(CatalogError::UnpayablePrice { line });
            }
            let quantity: u32 =
                quantity
                    .trim()
                    .parse()
                    .map_err(|_| CatalogError::InvalidQuantity {
                        line,
                        value: quantity.trim().to_string(),
                    })?;
            entries.push(CatalogEntry {
                product: Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    price,
                },
                initial_quantity: quantity,
            });
        }
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Loads the catalog file, seeding it with the default stock when the
    /// machine runs for the first time.
    pub fn load_or_seed(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "seeding default catalog");
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_STOCK)?;
        }
        Self::load(path)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a `D.CC` price into exact cents. Returns `None` on anything that
/// is not a plain non-negative decimal with at most two fraction digits.
fn parse_price(raw: &str) -> Option<Money> {
    let raw = raw.trim();
    let (dollars, cents) = match raw.split_once('.') {
        Some((dollars, cents)) => (dollars, cents),
        None => (raw, ""),
    };
    if dollars.is_empty() && cents.is_empty() {
        return None;
    }
    if !dollars.chars().all(|ch| ch.is_ascii_digit()) || dollars.len() > 7 {
        return None;
    }
    if cents.len() > 2 || !cents.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let dollar_part: i64 = if dollars.is_empty() {
        0
    } else {
        dollars.parse().ok()?
    };
    let cent_part: i64 = match cents.len() {
        0 => 0,
        1 => cents.parse::<i64>().ok()? * 10,
        _ => cents.parse().ok()?,
    };
    Some(Money::from_cents(dollar_part * 100 + cent_part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_stock() {
        let catalog = Catalog::parse(DEFAULT_STOCK).unwrap();
        assert_eq!(catalog.len(), 16);
        let first = &catalog.entries()[0];
        assert_eq!(first.product.id, "A1");
        assert_eq!(first.product.name, "Potato Crisps");
        assert_eq!(first.product.price, Money::from_cents(305));
        assert_eq!(first.initial_quantity, 5);
    }

    #[test]
    fn preserves_row_order() {
        let catalog = Catalog::parse("B1|Second|1.00|1\nA1|First|1.00|1\n").unwrap();
        assert_eq!(catalog.entries()[0].product.id, "B1");
        assert_eq!(catalog.entries()[1].product.id, "A1");
    }

    #[test]
    fn price_parsing_handles_short_fractions() {
        assert_eq!(parse_price("3.05"), Some(Money::from_cents(305)));
        assert_eq!(parse_price("3.5"), Some(Money::from_cents(350)));
        assert_eq!(parse_price("3"), Some(Money::from_cents(300)));
        assert_eq!(parse_price(".75"), Some(Money::from_cents(75)));
        assert_eq!(parse_price("3.055"), None);
        assert_eq!(parse_price("-1.00"), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::parse("A1|One|1.00|1\na1|Two|1.00|1\n").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { line: 2, .. }));
    }

    #[test]
    fn rejects_prices_the_hopper_cannot_pay_back() {
        let err = Catalog::parse("A1|Odd|1.03|1\n").unwrap_err();
        assert!(matches!(err, CatalogError::UnpayablePrice { line: 1 }));
        let err = Catalog::parse("A1|Free|0.00|1\n").unwrap_err();
        assert!(matches!(err, CatalogError::UnpayablePrice { line: 1 }));
    }

    #[test]
    fn rejects_malformed_rows_and_empty_input() {
        assert!(matches!(
            Catalog::parse("A1|Missing Price|5\n"),
            Err(CatalogError::MalformedRow { line: 1 })
        ));
        assert!(matches!(Catalog::parse("\n\n"), Err(CatalogError::Empty)));
    }
}
