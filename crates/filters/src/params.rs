//! Flat query parameter map (the URL representation of a view).

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameter names understood by the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Color,
    Tag,
    Min,
    Max,
    Cursor,
}

impl ParamKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::Color => "color",
            ParamKey::Tag => "tag",
            ParamKey::Min => "min",
            ParamKey::Max => "max",
            ParamKey::Cursor => "cursor",
        }
    }
}

/// A parameter value: given once, or repeated.
///
/// The distinction matters: numeric bounds are only honored when given once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::Many(_) => None,
        }
    }

    /// All values, whether given once or repeated.
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(v) => vec![v.as_str()],
            ParamValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(first) => {
                let first = std::mem::take(first);
                *self = ParamValue::Many(vec![first, value]);
            }
            ParamValue::Many(vs) => vs.push(value),
        }
    }
}

/// Ordered map of query parameters.
///
/// Ordering is by key, which keeps serialized query strings (and hashes of the
/// map) stable regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryParams {
    inner: BTreeMap<String, ParamValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form-urlencoded query string (with or without a leading `?`).
    ///
    /// Repeated keys become [`ParamValue::Many`].
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Build from `(key, value)` pairs, in order; repeated keys accumulate.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    /// Add a value, turning an existing single value into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key: String = key.into();
        let value = value.into();
        match self.inner.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => {
                self.inner.insert(key, ParamValue::Single(value));
            }
        }
    }

    pub fn set(&mut self, key: ParamKey, value: ParamValue) {
        self.inner.insert(key.as_str().to_string(), value);
    }

    pub fn get(&self, key: ParamKey) -> Option<&ParamValue> {
        self.inner.get(key.as_str())
    }

    pub fn remove(&mut self, key: ParamKey) -> Option<ParamValue> {
        self.inner.remove(key.as_str())
    }

    /// Copy of these parameters with the page cursor set.
    pub fn with_cursor(&self, cursor: usize) -> Self {
        let mut params = self.clone();
        params.set(ParamKey::Cursor, ParamValue::Single(cursor.to_string()));
        params
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Flattened `(key, value)` pairs, repeated keys expanded in order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(k, v)| v.values().into_iter().map(move |value| (k.as_str(), value)))
            .collect()
    }

    /// Serialize as a form-urlencoded query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}
