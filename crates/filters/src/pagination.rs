//! Cursor-based incremental loading.
//!
//! The controller owns every pagination state transition but performs no IO
//! itself: it hands out [`PageRequest`]s, the caller fetches them (possibly
//! concurrently with further user input) and feeds results back through
//! [`PaginationController::observe`]. Results are merged only if they were
//! requested under the current [`ResetKey`]; anything older is dropped.
//!
//! "More available" is learned from a lookahead page: after the page at the
//! cursor arrives full, the page at `cursor + 1` is fetched but not shown, and
//! `has_more` becomes "the lookahead is non-empty". This costs one extra
//! request per page; a page response carrying an explicit total or `has_more`
//! would make the lookahead unnecessary.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use thiserror::Error;

use catalog_products::ProductRecord;

use crate::fetch::{FetchError, PageFetcher};
use crate::params::QueryParams;

/// Records per page, shared with the catalog slicer.
pub const PAGE_SIZE: usize = 10;

/// Opaque token identifying the view being paginated.
///
/// A different key means a different result set: pagination starts over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResetKey(u64);

impl ResetKey {
    /// Key derived from a structural hash of the filter parameters.
    pub fn of(params: &QueryParams) -> Self {
        let mut hasher = DefaultHasher::new();
        params.hash(&mut hasher);
        Self(hasher.finish())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageState {
    cursor: usize,
    has_more: bool,
    reset_key: ResetKey,
}

impl PageState {
    fn new(reset_key: ResetKey) -> Self {
        Self {
            cursor: 0,
            has_more: true,
            reset_key,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn reset_key(&self) -> ResetKey {
        self.reset_key
    }
}

/// A page the caller should fetch, tagged with the key it was requested under.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    reset_key: ResetKey,
    cursor: usize,
}

impl PageRequest {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset_key(&self) -> ResetKey {
        self.reset_key
    }
}

/// Outcome of merging a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Merged; nothing else to fetch for now.
    Settled,
    /// A displayed page was merged and was full; fetch this lookahead next.
    Lookahead(PageRequest),
    /// Requested under an older reset key; dropped.
    Stale,
    /// Current key, but no longer relevant to the cursor; dropped.
    Discarded,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("no more pages")]
    Exhausted,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PageState,
    /// Displayed pages, by cursor.
    pages: BTreeMap<usize, Vec<ProductRecord>>,
    /// Fetched page at `cursor + 1`; never displayed until `advance()`.
    lookahead: Option<(usize, Vec<ProductRecord>)>,
}

impl PaginationController {
    pub fn new(reset_key: ResetKey) -> Self {
        Self {
            state: PageState::new(reset_key),
            pages: BTreeMap::new(),
            lookahead: None,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Displayed records, in page order.
    pub fn items(&self) -> impl Iterator<Item = &ProductRecord> {
        self.pages.values().flatten()
    }

    pub fn loaded_pages(&self) -> usize {
        self.pages.len()
    }

    /// Start over under `reset_key`. Returns `false` (and keeps everything) if
    /// the key is unchanged.
    pub fn reset(&mut self, reset_key: ResetKey) -> bool {
        if self.state.reset_key == reset_key {
            return false;
        }
        tracing::debug!(
            discarded_pages = self.pages.len(),
            cursor = self.state.cursor,
            "pagination reset"
        );
        *self = Self::new(reset_key);
        true
    }

    /// Install a first page that is already available (e.g. rendered
    /// server-side), avoiding a fetch.
    ///
    /// Only valid before page 0 has been loaded; otherwise the page is
    /// discarded.
    pub fn seed(&mut self, page: Vec<ProductRecord>) -> Observation {
        if self.state.cursor != 0 || self.pages.contains_key(&0) {
            return Observation::Discarded;
        }
        self.merge_visible(0, page)
    }

    fn request(&self, cursor: usize) -> PageRequest {
        PageRequest {
            reset_key: self.state.reset_key,
            cursor,
        }
    }

    /// The displayed page at the cursor, if it has not arrived yet (initial
    /// load, or retry after a failed fetch).
    pub fn pending_visible(&self) -> Option<PageRequest> {
        (!self.pages.contains_key(&self.state.cursor)).then(|| self.request(self.state.cursor))
    }

    /// The next fetch the controller is waiting on, if any: a missing displayed
    /// page first, then an outstanding lookahead.
    pub fn next_request(&self) -> Option<PageRequest> {
        if let Some(req) = self.pending_visible() {
            return Some(req);
        }
        let next = self.state.cursor + 1;
        let lookahead_buffered = matches!(self.lookahead, Some((c, _)) if c == next);
        (self.state.has_more && !lookahead_buffered).then(|| self.request(next))
    }

    /// Move to the next page.
    ///
    /// A buffered lookahead is promoted to a displayed page without another
    /// fetch; the returned request is then the new lookahead (or `None` if the
    /// promoted page already marks the end). Without a buffered lookahead the
    /// returned request is the new displayed page itself.
    pub fn advance(&mut self) -> Result<Option<PageRequest>, PaginationError> {
        if !self.state.has_more {
            return Err(PaginationError::Exhausted);
        }
        self.state.cursor += 1;
        let cursor = self.state.cursor;

        match self.lookahead.take() {
            Some((c, page)) if c == cursor => match self.merge_visible(cursor, page) {
                Observation::Lookahead(req) => Ok(Some(req)),
                _ => Ok(None),
            },
            _ => Ok(Some(self.request(cursor))),
        }
    }

    /// Merge the result of fetching `request`.
    ///
    /// Results from an older reset key are dropped whether they succeeded or
    /// not. A failure under the current key is returned to the caller and
    /// leaves cursor and `has_more` untouched; retrying is up to the caller
    /// (see [`Self::next_request`]).
    pub fn observe(
        &mut self,
        request: PageRequest,
        result: Result<Vec<ProductRecord>, FetchError>,
    ) -> Result<Observation, FetchError> {
        if request.reset_key != self.state.reset_key {
            tracing::debug!(cursor = request.cursor, "dropping page fetched for a previous view");
            return Ok(Observation::Stale);
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(cursor = request.cursor, "page fetch failed: {e}");
                return Err(e);
            }
        };

        let cursor = self.state.cursor;
        if request.cursor == cursor + 1 {
            self.merge_lookahead(request.cursor, page);
            Ok(Observation::Settled)
        } else if request.cursor <= cursor {
            if self.pages.contains_key(&request.cursor) {
                return Ok(Observation::Discarded);
            }
            Ok(self.merge_visible(request.cursor, page))
        } else {
            Ok(Observation::Discarded)
        }
    }

    fn merge_visible(&mut self, cursor: usize, page: Vec<ProductRecord>) -> Observation {
        let short = page.len() < PAGE_SIZE;
        self.pages.insert(cursor, page);

        if short {
            // End of data: nothing can follow a partial page.
            self.state.has_more = false;
            self.lookahead = None;
            return Observation::Settled;
        }

        if cursor == self.state.cursor {
            if let Some(req) = self.next_request() {
                return Observation::Lookahead(req);
            }
        }
        Observation::Settled
    }

    fn merge_lookahead(&mut self, cursor: usize, page: Vec<ProductRecord>) {
        // Never flips back to true without a reset.
        self.state.has_more = self.state.has_more && !page.is_empty();
        self.lookahead = Some((cursor, page));
    }

    /// Fetch `request` and follow up with the lookahead it triggers, merging
    /// both.
    pub async fn fetch_into<F>(
        &mut self,
        fetcher: &F,
        filters: &QueryParams,
        request: PageRequest,
    ) -> Result<(), PaginationError>
    where
        F: PageFetcher + ?Sized,
    {
        let mut request = request;
        loop {
            let result = fetcher.fetch_page(filters, request.cursor).await;
            match self.observe(request, result)? {
                Observation::Lookahead(next) => request = next,
                Observation::Settled | Observation::Stale | Observation::Discarded => return Ok(()),
            }
        }
    }
}
