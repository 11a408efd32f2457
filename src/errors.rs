use thiserror::Error;

use crate::catalog::CatalogError;

/// Error type that captures the failures a running machine can hit outside
/// the purchase path itself.
#[derive(Debug, Error)]
pub enum VendingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Failures of the CLI layer on top of [`VendingError`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Vending(#[from] VendingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Vending(err.into())
    }
}
