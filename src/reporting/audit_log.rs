use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::currency::Money;
use crate::errors::VendingError;
use crate::machine::TransactionSink;

/// Append-only transaction log, one timestamped line per event:
///
/// ```text
/// 08/25/2026 02:14:09 PM FEED MONEY: $5.00 $10.00
/// ```
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, label: &str, amount: Money, balance: Money) -> Result<(), VendingError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = Local::now().format("%m/%d/%Y %I:%M:%S %p");
        writeln!(file, "{stamp} {label}: {amount} {balance}")?;
        Ok(())
    }
}

impl TransactionSink for AuditLog {
    fn record(&mut self, label: &str, amount: Money, balance: Money) {
        if let Err(err) = self.append(label, amount, balance) {
            tracing::warn!(%err, path = %self.path.display(), "transaction log write failed; entry dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_labelled_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("transactions.log"));
        log.append("FEED MONEY", Money::from_dollars(10), Money::from_dollars(10))
            .unwrap();
        log.append("Cola C1", Money::from_cents(125), Money::from_cents(875))
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("FEED MONEY: $10.00 $10.00"));
        assert!(lines[1].ends_with("Cola C1: $1.25 $8.75"));
    }

    #[test]
    fn record_swallows_write_failures() {
        // Directory path cannot be opened as a file; record must not panic.
        let dir = tempfile::tempdir().unwrap();
        let mut log = AuditLog::new(dir.path().to_path_buf());
        log.record("FEED MONEY", Money::from_dollars(1), Money::from_dollars(1));
    }
}
