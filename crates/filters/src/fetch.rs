//! Page-fetch collaborator: the seam between pagination and whatever serves pages.

use std::sync::Arc;

use thiserror::Error;

use catalog_products::{Catalog, ProductRecord};

use crate::codec;
use crate::pagination::PAGE_SIZE;
use crate::params::QueryParams;
use crate::predicate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport failed before a response arrived (connection, timeout).
    #[error("page transport failed: {0}")]
    Transport(String),

    /// The collaborator answered, but not with a usable page.
    #[error("invalid page response: {0}")]
    InvalidResponse(String),
}

/// Serves one page of the filtered catalog.
///
/// `filters` are the canonical filter parameters (cursor excluded); the
/// implementation returns at most [`PAGE_SIZE`] records, the slice
/// `[cursor * PAGE_SIZE, cursor * PAGE_SIZE + PAGE_SIZE)` of the filtered
/// result. Retries and timeouts are the implementation's business.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        filters: &QueryParams,
        cursor: usize,
    ) -> Result<Vec<ProductRecord>, FetchError>;
}

#[async_trait::async_trait]
impl<F> PageFetcher for Arc<F>
where
    F: PageFetcher + ?Sized,
{
    async fn fetch_page(
        &self,
        filters: &QueryParams,
        cursor: usize,
    ) -> Result<Vec<ProductRecord>, FetchError> {
        (**self).fetch_page(filters, cursor).await
    }
}

/// Server side of the paged fetch: decode `params` (including `cursor`),
/// filter the catalog and cut out the requested page.
pub fn slice_page(catalog: &Catalog, params: &QueryParams) -> Vec<ProductRecord> {
    let limits = catalog.limits();
    let state = codec::decode(params, limits);
    let start = codec::decode_cursor(params).saturating_mul(PAGE_SIZE);

    predicate::filter_products(catalog.products(), &state, limits)
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect()
}

/// In-process page fetcher over a shared catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogPageFetcher {
    catalog: Arc<Catalog>,
}

impl CatalogPageFetcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

#[async_trait::async_trait]
impl PageFetcher for CatalogPageFetcher {
    async fn fetch_page(
        &self,
        filters: &QueryParams,
        cursor: usize,
    ) -> Result<Vec<ProductRecord>, FetchError> {
        Ok(slice_page(&self.catalog, &filters.with_cursor(cursor)))
    }
}
