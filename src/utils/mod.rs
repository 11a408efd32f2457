use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("vending_core=info".parse().unwrap());

        fmt().with_env_filter(filter).with_writer(io::stderr).init();
    });
}

/// Resolves where the machine keeps its data files (catalog, transaction
/// log, sales report, config).
pub struct PathResolver;

impl PathResolver {
    /// Base directory: `VENDING_CORE_HOME` if set, otherwise a
    /// `vending-core` folder under the platform data directory.
    pub fn base_dir() -> PathBuf {
        if let Some(home) = env::var_os("VENDING_CORE_HOME") {
            return PathBuf::from(home);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vending-core")
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join("config.json")
    }

    pub fn catalog_file_in(base: &Path) -> PathBuf {
        base.join("catalog.txt")
    }

    pub fn transaction_log_in(base: &Path) -> PathBuf {
        base.join("transactions.log")
    }

    pub fn sales_snapshot_in(base: &Path) -> PathBuf {
        base.join("sales.json")
    }

    pub fn sales_journal_in(base: &Path) -> PathBuf {
        base.join("sales.journal")
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes a file by staging to a temporary sibling and renaming over the
/// target, so readers never observe a half-written file.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
