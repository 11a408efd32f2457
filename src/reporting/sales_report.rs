use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::currency::Money;
use crate::errors::VendingError;
use crate::machine::SalesSink;
use crate::utils::{write_atomic, PathResolver};

/// Journal entries accumulated before the snapshot is rewritten.
const COMPACT_AFTER: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaleCount {
    name: String,
    sold: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    counts: BTreeMap<String, SaleCount>,
    #[serde(default)]
    total_cents: i64,
}

/// Cumulative per-product sale counts plus a running total.
///
/// Persistence is an increment store: each sale appends one journal line
/// (`id|name|price_cents`), and every `COMPACT_AFTER` lines the in-memory
/// state is compacted into a JSON snapshot written atomically, after which
/// the journal is truncated. Loading replays the journal over the snapshot,
/// so a crash between append and compact loses nothing.
pub struct SalesReport {
    snapshot_path: PathBuf,
    journal_path: PathBuf,
    counts: BTreeMap<String, SaleCount>,
    total: Money,
    pending: usize,
}

impl SalesReport {
    pub fn open(base: &Path) -> Result<Self, VendingError> {
        let snapshot_path = PathResolver::sales_snapshot_in(base);
        let journal_path = PathResolver::sales_journal_in(base);
        let snapshot = if snapshot_path.exists() {
            let data = fs::read_to_string(&snapshot_path)?;
            serde_json::from_str(&data)?
        } else {
            Snapshot::default()
        };
        let mut report = Self {
            snapshot_path,
            journal_path,
            counts: snapshot.counts,
            total: Money::from_cents(snapshot.total_cents),
            pending: 0,
        };
        report.replay_journal()?;
        Ok(report)
    }

    /// Records one sale: memory first, then one journal line, compacting
    /// once enough lines have piled up.
    pub fn record(&mut self, product: &Product) -> Result<(), VendingError> {
        self.apply(&product.id, &product.name, product.price);
        let mut journal = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)?;
        writeln!(
            journal,
            "{}|{}|{}",
            product.id,
            product.name,
            product.price.cents()
        )?;
        self.pending += 1;
        if self.pending >= COMPACT_AFTER {
            self.compact()?;
        }
        Ok(())
    }

    /// Rewrites the snapshot atomically and truncates the journal.
    pub fn compact(&mut self) -> Result<(), VendingError> {
        let snapshot = Snapshot {
            counts: self.counts.clone(),
            total_cents: self.total.cents(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(&self.snapshot_path, &json)?;
        if self.journal_path.exists() {
            fs::write(&self.journal_path, "")?;
        }
        self.pending = 0;
        Ok(())
    }

    pub fn units_sold(&self, id: &str) -> u64 {
        self.counts
            .get(&id.to_ascii_uppercase())
            .map(|count| count.sold)
            .unwrap_or(0)
    }

    pub fn total_sales(&self) -> Money {
        self.total
    }

    fn apply(&mut self, id: &str, name: &str, price: Money) {
        let entry = self
            .counts
            .entry(id.to_ascii_uppercase())
            .or_insert_with(|| SaleCount {
                name: name.to_string(),
                sold: 0,
            });
        entry.sold += 1;
        self.total += price;
    }

    fn replay_journal(&mut self) -> Result<(), VendingError> {
        if !self.journal_path.exists() {
            return Ok(());
        }
        let data = fs::read_to_string(&self.journal_path)?;
        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, '|');
            let (Some(id), Some(name), Some(cents)) =
                (fields.next(), fields.next(), fields.next())
            else {
                tracing::warn!(line, "skipping malformed sales journal line");
                continue;
            };
            let Ok(cents) = cents.trim().parse::<i64>() else {
                tracing::warn!(line, "skipping malformed sales journal line");
                continue;
            };
            self.apply(id, name, Money::from_cents(cents));
            self.pending += 1;
        }
        Ok(())
    }
}

/// Shared handle over a [`SalesReport`] so the machine can feed it sales
/// while the CLI reads it back for the report screen.
#[derive(Clone)]
pub struct SharedSalesReport {
    inner: Arc<RwLock<SalesReport>>,
}

impl SharedSalesReport {
    pub fn open(base: &Path) -> Result<Self, VendingError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(SalesReport::open(base)?)),
        })
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SalesReport> {
        self.inner.read().expect("SalesReport lock poisoned")
    }

    /// Best-effort final compaction, for shutdown.
    pub fn flush(&self) {
        let mut report = self.inner.write().expect("SalesReport lock poisoned");
        if let Err(err) = report.compact() {
            tracing::warn!(%err, "sales report compaction failed");
        }
    }
}

impl SalesSink for SharedSalesReport {
    fn record_sale(&mut self, product: &Product) {
        let mut report = self.inner.write().expect("SalesReport lock poisoned");
        if let Err(err) = report.record(product) {
            tracing::warn!(%err, id = %product.id, "sales report write failed; sale dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            price: Money::from_cents(cents),
        }
    }

    #[test]
    fn counts_and_total_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = SalesReport::open(dir.path()).unwrap();
        report.record(&product("A1", "Crisps", 305)).unwrap();
        report.record(&product("A1", "Crisps", 305)).unwrap();
        report.record(&product("C1", "Cola", 125)).unwrap();
        assert_eq!(report.units_sold("a1"), 2);
        assert_eq!(report.units_sold("C1"), 1);
        assert_eq!(report.total_sales(), Money::from_cents(735));
    }

    #[test]
    fn journal_survives_reopen_without_compaction() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut report = SalesReport::open(dir.path()).unwrap();
            report.record(&product("A1", "Crisps", 305)).unwrap();
        }
        let report = SalesReport::open(dir.path()).unwrap();
        assert_eq!(report.units_sold("A1"), 1);
        assert_eq!(report.total_sales(), Money::from_cents(305));
    }

    #[test]
    fn compaction_truncates_journal_and_keeps_totals() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = SalesReport::open(dir.path()).unwrap();
        report.record(&product("A1", "Crisps", 305)).unwrap();
        report.compact().unwrap();
        assert_eq!(
            fs::read_to_string(PathResolver::sales_journal_in(dir.path())).unwrap(),
            ""
        );

        let reopened = SalesReport::open(dir.path()).unwrap();
        assert_eq!(reopened.units_sold("A1"), 1);
        assert_eq!(reopened.total_sales(), Money::from_cents(305));
    }

    #[test]
    fn malformed_journal_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            PathResolver::sales_journal_in(dir.path()),
            "garbage\nA1|Crisps|305\nB1|Broken|not-a-number\n",
        )
        .unwrap();
        let report = SalesReport::open(dir.path()).unwrap();
        assert_eq!(report.units_sold("A1"), 1);
        assert_eq!(report.total_sales(), Money::from_cents(305));
    }
}
