//! Catalog error model.

use thiserror::Error;

/// Catalog-level error.
///
/// Keep this focused on deterministic failures of pure values. Transport and
/// storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A price string could not be parsed as a non-negative decimal amount.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

impl CatalogError {
    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }
}
