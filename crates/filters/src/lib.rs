//! Filter-and-pagination engine for the catalog browser.
//!
//! - `params` / `codec`: filter state <-> flat query parameters
//! - `predicate`: which products a filter state retains
//! - `pagination`: cursor, "has more" and reset handling for incremental loading
//! - `fetch`: the page-fetch seam and the in-process catalog slicer
//! - `engine`: orchestration of the above

pub mod codec;
pub mod engine;
pub mod fetch;
pub mod pagination;
pub mod params;
pub mod predicate;
pub mod state;

pub use codec::{decode, decode_cursor, encode};
pub use engine::{FilterEngine, FilterMode};
pub use fetch::{CatalogPageFetcher, FetchError, PageFetcher, slice_page};
pub use pagination::{
    Observation, PAGE_SIZE, PageRequest, PageState, PaginationController, PaginationError, ResetKey,
};
pub use params::{ParamKey, ParamValue, QueryParams};
pub use predicate::{filter_products, matches};
pub use state::{FilterState, PriceRange};
