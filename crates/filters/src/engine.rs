//! Filter engine: keeps filter state, URL parameters and pagination in step.
//!
//! Two ways of producing the list are supported:
//! - client-side: the whole catalog is in memory and filtered here
//!   ([`FilterEngine::visible`]);
//! - paged: filtering happens behind a [`PageFetcher`], which receives the
//!   canonical parameters verbatim plus a cursor ([`FilterEngine::load_more`]).
//!
//! Either way the flow is one-directional: parameters are decoded into a
//! [`FilterState`], and user edits are encoded back into parameters and
//! committed as if the user had navigated to them.

use std::sync::Arc;

use catalog_products::{Catalog, PriceLimits, ProductRecord};

use crate::codec;
use crate::fetch::PageFetcher;
use crate::pagination::{Observation, PageRequest, PaginationController, PaginationError, ResetKey};
use crate::params::QueryParams;
use crate::predicate;
use crate::state::FilterState;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterMode {
    ClientSide,
    Paged,
}

#[derive(Debug, Clone)]
struct Memo {
    state: FilterState,
    visible: Arc<[ProductRecord]>,
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    limits: PriceLimits,
    catalog: Option<Arc<Catalog>>,
    state: FilterState,
    /// Canonical encoding of `state`.
    params: QueryParams,
    pagination: PaginationController,
    memo: Option<Memo>,
}

impl FilterEngine {
    /// Mount over an in-memory catalog.
    pub fn client_side(catalog: Arc<Catalog>, params: &QueryParams) -> Self {
        Self::mount(catalog.limits(), Some(catalog), params)
    }

    /// Mount in paged mode; only the catalog-wide price limits are known locally.
    pub fn paged(limits: PriceLimits, params: &QueryParams) -> Self {
        Self::mount(limits, None, params)
    }

    fn mount(limits: PriceLimits, catalog: Option<Arc<Catalog>>, params: &QueryParams) -> Self {
        let state = codec::decode(params, limits);
        let params = codec::encode(&state, limits);
        let pagination = PaginationController::new(ResetKey::of(&params));
        Self {
            limits,
            catalog,
            state,
            params,
            pagination,
            memo: None,
        }
    }

    pub fn mode(&self) -> FilterMode {
        match self.catalog {
            Some(_) => FilterMode::ClientSide,
            None => FilterMode::Paged,
        }
    }

    pub fn limits(&self) -> PriceLimits {
        self.limits
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Canonical parameters for the current state (no cursor).
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    /// React to an external parameter change (navigation).
    ///
    /// Returns `true` if the decoded state differs from the current one, in
    /// which case pagination starts over. Parameters that decode to the same
    /// state (different order, redundant defaults) change nothing.
    pub fn on_params_changed(&mut self, params: &QueryParams) -> bool {
        let state = codec::decode(params, self.limits);
        if state == self.state {
            return false;
        }

        self.params = codec::encode(&state, self.limits);
        self.state = state;
        self.pagination.reset(ResetKey::of(&self.params));
        tracing::debug!(query = %self.params.to_query_string(), "filter state changed");
        true
    }

    /// Commit a user edit: encode it, adopt it as the new parameter set and
    /// return the parameters to navigate to.
    pub fn on_submit(&mut self, next: FilterState) -> QueryParams {
        let params = codec::encode(&next, self.limits);
        self.on_params_changed(&params);
        params
    }

    /// The filtered catalog (client-side mode; `None` when paged).
    ///
    /// Memoized on the structural value of the filter state: asking again with
    /// an equal state returns the same shared list without refiltering.
    pub fn visible(&mut self) -> Option<Arc<[ProductRecord]>> {
        let catalog = self.catalog.as_ref()?;

        if let Some(memo) = &self.memo {
            if memo.state == self.state {
                return Some(Arc::clone(&memo.visible));
            }
        }

        let visible: Arc<[ProductRecord]> =
            predicate::filter_products(catalog.products(), &self.state, self.limits)
                .cloned()
                .collect::<Vec<_>>()
                .into();
        tracing::debug!(retained = visible.len(), total = catalog.len(), "filtered catalog");

        self.memo = Some(Memo {
            state: self.state.clone(),
            visible: Arc::clone(&visible),
        });
        Some(visible)
    }

    /// Parameters of a paged fetch for `cursor`: the canonical filter
    /// parameters, reused verbatim, plus the cursor.
    pub fn page_query(&self, cursor: usize) -> QueryParams {
        self.params.with_cursor(cursor)
    }

    /// Install a first page rendered elsewhere (e.g. embedded in the initial
    /// response) so it is not fetched again.
    ///
    /// A full page leaves `has_more` undecided; the returned lookahead request
    /// settles it and is sent by [`Self::prefetch`] (or the next
    /// [`Self::load_more`]).
    pub fn seed_first_page(&mut self, page: Vec<ProductRecord>) -> Option<PageRequest> {
        match self.pagination.seed(page) {
            Observation::Lookahead(request) => Some(request),
            _ => None,
        }
    }

    /// Send whatever fetch the controller is waiting on (a missing displayed
    /// page or the lookahead) without moving the cursor.
    pub async fn prefetch<F>(&mut self, fetcher: &F) -> Result<(), PaginationError>
    where
        F: PageFetcher + ?Sized,
    {
        if let Some(request) = self.pagination.next_request() {
            self.pagination.fetch_into(fetcher, &self.params, request).await?;
        }
        Ok(())
    }

    /// Show the next page through `fetcher`.
    ///
    /// The first call loads page 0 (unless seeded). Later calls advance the
    /// cursor; each displayed page is followed by a lookahead fetch that
    /// decides whether more pages exist. A missing displayed page (failed
    /// earlier) is retried instead of advancing, and an outstanding lookahead
    /// is settled before advancing.
    pub async fn load_more<F>(&mut self, fetcher: &F) -> Result<(), PaginationError>
    where
        F: PageFetcher + ?Sized,
    {
        if let Some(request) = self.pagination.pending_visible() {
            return self.pagination.fetch_into(fetcher, &self.params, request).await;
        }

        self.prefetch(fetcher).await?;
        if let Some(request) = self.pagination.advance()? {
            self.pagination.fetch_into(fetcher, &self.params, request).await?;
        }
        Ok(())
    }

    /// Records loaded so far in paged mode.
    pub fn loaded(&self) -> impl Iterator<Item = &ProductRecord> {
        self.pagination.items()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.state().has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Price;

    use crate::fetch::{CatalogPageFetcher, FetchError};
    use crate::pagination::PAGE_SIZE;
    use crate::state::PriceRange;

    fn four_items() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            ProductRecord::new("Nikki", Price::from_units(10))
                .with_colors(["Green"])
                .with_tags(["Sandals", "Mid-Heels"]),
            ProductRecord::new("Karolina", Price::from_units(25))
                .with_colors(["White"])
                .with_tags(["Mules", "Mid-Heels"]),
            ProductRecord::new("Erica", Price::from_cents(5550))
                .with_colors(["Brown"])
                .with_tags(["Mules", "Flats"]),
            ProductRecord::new("Ellie", Price::from_units(100))
                .with_colors(["White"])
                .with_tags(["Sandals", "Mid-Heels"]),
        ]))
    }

    fn big(n: u64) -> Arc<Catalog> {
        Arc::new(Catalog::new(
            (0..n)
                .map(|i| {
                    let color = if i % 3 == 0 { "White" } else { "Black" };
                    ProductRecord::new(format!("p{i}"), Price::from_units(1 + i)).with_colors([color])
                })
                .collect(),
        ))
    }

    fn names(list: &[ProductRecord]) -> Vec<&str> {
        list.iter().map(ProductRecord::name).collect()
    }

    #[test]
    fn mount_decodes_params() {
        let mut engine = FilterEngine::client_side(four_items(), &QueryParams::parse("color=white"));
        assert_eq!(engine.mode(), FilterMode::ClientSide);
        assert!(engine.state().colors().contains("white"));
        assert_eq!(names(&engine.visible().unwrap()), vec!["Karolina", "Ellie"]);
    }

    #[test]
    fn mount_canonicalizes_params() {
        let engine = FilterEngine::client_side(four_items(), &QueryParams::parse("min=10&max=100&color=WHITE"));
        assert_eq!(engine.params().to_query_string(), "color=white");
    }

    #[test]
    fn visible_is_memoized_on_structural_equality() {
        let mut engine = FilterEngine::client_side(four_items(), &QueryParams::parse("tag=mid-heels"));
        let first = engine.visible().unwrap();

        // Same state reached through a differently spelled query.
        let changed = engine.on_params_changed(&QueryParams::parse("tag=Mid-Heels&min=10"));
        assert!(!changed);
        let second = engine.visible().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn state_change_recomputes() {
        let mut engine = FilterEngine::client_side(four_items(), &QueryParams::new());
        let all = engine.visible().unwrap();
        assert_eq!(all.len(), 4);

        assert!(engine.on_params_changed(&QueryParams::parse("max=55")));
        let cheap = engine.visible().unwrap();
        assert!(!Arc::ptr_eq(&all, &cheap));
        assert_eq!(names(&cheap), vec!["Nikki", "Karolina"]);
    }

    #[test]
    fn submit_returns_canonical_params_and_applies_them() {
        let mut engine = FilterEngine::client_side(four_items(), &QueryParams::new());
        let next = engine
            .state()
            .with_colors(["White", "green"])
            .with_price_range(PriceRange::new(Price::from_units(11), Price::from_units(100)));

        let params = engine.on_submit(next.clone());
        assert_eq!(params.to_query_string(), "color=green&color=white&min=11");
        assert_eq!(engine.state(), &next);
        assert_eq!(names(&engine.visible().unwrap()), vec!["Karolina", "Ellie"]);
    }

    #[test]
    fn submitting_unrestricted_state_clears_params() {
        let mut engine = FilterEngine::client_side(four_items(), &QueryParams::parse("color=white&min=20"));
        let params = engine.on_submit(FilterState::unrestricted(engine.limits()));
        assert!(params.is_empty());
        assert_eq!(engine.visible().unwrap().len(), 4);
    }

    #[test]
    fn inverted_price_bounds_retain_nothing() {
        let catalog = Arc::new(Catalog::new(
            [10, 25, 40, 100]
                .into_iter()
                .map(|units| ProductRecord::new(format!("p{units}"), Price::from_units(units)))
                .collect(),
        ));
        let mut engine = FilterEngine::client_side(catalog, &QueryParams::parse("min=50&max=20"));
        assert!(engine.visible().unwrap().is_empty());
    }

    #[test]
    fn paged_mode_has_no_local_list() {
        let mut engine = FilterEngine::paged(four_items().limits(), &QueryParams::new());
        assert_eq!(engine.mode(), FilterMode::Paged);
        assert!(engine.visible().is_none());
    }

    #[test]
    fn page_query_reuses_canonical_params() {
        let engine = FilterEngine::paged(four_items().limits(), &QueryParams::parse("tag=Mules&max=100"));
        assert_eq!(engine.page_query(2).to_query_string(), "cursor=2&tag=mules");
    }

    #[tokio::test]
    async fn load_more_pages_through_fetcher() {
        let catalog = big(23);
        let fetcher = CatalogPageFetcher::new(catalog.clone());
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());

        engine.load_more(&fetcher).await.unwrap();
        assert_eq!(engine.loaded().count(), PAGE_SIZE);
        assert!(engine.has_more());

        engine.load_more(&fetcher).await.unwrap();
        engine.load_more(&fetcher).await.unwrap();
        assert_eq!(engine.loaded().count(), 23);
        assert!(!engine.has_more());

        let err = engine.load_more(&fetcher).await.unwrap_err();
        assert_eq!(err, PaginationError::Exhausted);
    }

    #[tokio::test]
    async fn navigation_resets_pagination() {
        let catalog = big(40);
        let fetcher = CatalogPageFetcher::new(catalog.clone());
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());
        engine.load_more(&fetcher).await.unwrap();
        engine.load_more(&fetcher).await.unwrap();
        assert_eq!(engine.pagination().state().cursor(), 1);

        let next = engine.state().with_colors(["white"]);
        engine.on_submit(next);
        assert_eq!(engine.pagination().state().cursor(), 0);
        assert_eq!(engine.loaded().count(), 0);

        engine.load_more(&fetcher).await.unwrap();
        assert!(engine.loaded().all(|p| p.canonical_color() == Some("White")));
        assert_eq!(engine.loaded().count(), PAGE_SIZE);
    }

    #[test]
    fn page_from_previous_view_is_dropped() {
        let catalog = big(40);
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());
        let in_flight = engine.pagination().next_request().unwrap();

        engine.on_params_changed(&QueryParams::parse("color=black"));

        let stale_page = (0..PAGE_SIZE)
            .map(|i| ProductRecord::new(format!("old{i}"), Price::from_units(1)))
            .collect();
        let obs = engine.pagination.observe(in_flight, Ok(stale_page)).unwrap();
        assert_eq!(obs, Observation::Stale);
        assert_eq!(engine.loaded().count(), 0);
    }

    #[test]
    fn seeded_first_page_is_not_refetched() {
        let catalog = big(5);
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());
        assert_eq!(engine.seed_first_page(catalog.products().to_vec()), None);
        assert_eq!(engine.loaded().count(), 5);
        assert!(!engine.has_more());
        assert_eq!(engine.pagination().next_request(), None);
    }

    #[tokio::test]
    async fn full_seeded_page_settles_has_more_through_lookahead() {
        let catalog = big(PAGE_SIZE as u64);
        let fetcher = CatalogPageFetcher::new(catalog.clone());
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());

        let lookahead = engine.seed_first_page(catalog.products().to_vec()).unwrap();
        assert_eq!(lookahead.cursor(), 1);

        engine.prefetch(&fetcher).await.unwrap();
        assert!(!engine.has_more());
        assert_eq!(engine.pagination().state().cursor(), 0);
        assert_eq!(engine.loaded().count(), PAGE_SIZE);
    }

    #[tokio::test]
    async fn load_more_after_full_seed_does_not_step_onto_empty_page() {
        let catalog = big(PAGE_SIZE as u64);
        let fetcher = CatalogPageFetcher::new(catalog.clone());
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());
        engine.seed_first_page(catalog.products().to_vec());

        let err = engine.load_more(&fetcher).await.unwrap_err();
        assert_eq!(err, PaginationError::Exhausted);
        assert_eq!(engine.pagination().state().cursor(), 0);
        assert!(!engine.has_more());
        assert_eq!(engine.loaded().count(), PAGE_SIZE);
    }

    #[tokio::test]
    async fn load_more_after_full_seed_continues_when_more_exist() {
        let catalog = big(25);
        let fetcher = CatalogPageFetcher::new(catalog.clone());
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());
        engine.seed_first_page(catalog.products()[..PAGE_SIZE].to_vec());

        engine.load_more(&fetcher).await.unwrap();
        assert_eq!(engine.pagination().state().cursor(), 1);
        assert_eq!(engine.loaded().count(), 2 * PAGE_SIZE);
        assert!(engine.has_more());
    }

    #[tokio::test]
    async fn failed_page_is_retried_on_next_load() {
        struct FlakyOnce {
            inner: CatalogPageFetcher,
            failed: std::sync::atomic::AtomicBool,
        }

        #[async_trait::async_trait]
        impl PageFetcher for FlakyOnce {
            async fn fetch_page(
                &self,
                filters: &QueryParams,
                cursor: usize,
            ) -> Result<Vec<ProductRecord>, FetchError> {
                if !self.failed.swap(true, std::sync::atomic::Ordering::SeqCst) {
                    return Err(FetchError::Transport("timeout".into()));
                }
                self.inner.fetch_page(filters, cursor).await
            }
        }

        let catalog = big(15);
        let fetcher = FlakyOnce {
            inner: CatalogPageFetcher::new(catalog.clone()),
            failed: std::sync::atomic::AtomicBool::new(false),
        };
        let mut engine = FilterEngine::paged(catalog.limits(), &QueryParams::new());

        let err = engine.load_more(&fetcher).await.unwrap_err();
        assert!(matches!(err, PaginationError::Fetch(_)));
        assert_eq!(engine.loaded().count(), 0);
        assert_eq!(engine.pagination().state().cursor(), 0);

        engine.load_more(&fetcher).await.unwrap();
        assert_eq!(engine.loaded().count(), PAGE_SIZE);
        assert!(engine.has_more());
    }
}
