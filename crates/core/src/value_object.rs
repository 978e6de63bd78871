//! Value object trait: equality by value, not identity.
//!
//! Catalog values (prices, price limits, filter states) have **no identity** -
//! they are defined entirely by their attribute values. Two filter states
//! decoded from the same query string on different navigations are the same
//! filter state, even though they are different allocations.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// The trait requires `Eq + Hash` on top of the usual `Clone + Debug` so that
/// values can be used as memoization keys: a cached result is reused when a
/// freshly-built value is structurally equal to the previous one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct PriceBand {
///     min: Price,
///     max: Price,
/// }
///
/// impl ValueObject for PriceBand {}
/// ```
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {}
