//! Store-independent query model.
//!
//! A [`RecordQuery`] is the abstract form of the option dictionaries the
//! benchmark scenarios pass to the store: a list of filters (all of which must
//! match), a projection, a page size and an ordering. Concrete stores translate
//! it into their own query language.

use crate::record::{Record, HASH_META_KEY};
use serde::Serialize;
use std::fmt;

/// Number of values listed before a long value set is abbreviated in
/// [`RecordQuery`]'s `Display` output.
const DISPLAY_VALUES: usize = 1;

/// A single predicate. Filters in a query are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// The record has a metadata entry under `key`.
    MetaKeyExists { key: String },
    /// The record has a metadata entry under `key` whose value is not in `values`.
    MetaValueNotIn { key: String, values: Vec<String> },
    /// The record id is in `ids`. An empty set matches nothing.
    IdIn { ids: Vec<u64> },
}

/// Which columns a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Ids,
    Full,
}

/// How many matching rows a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// Every matching row.
    Unbounded,
    /// At most this many rows. Zero is passed through to the store untouched.
    Limit(u64),
    /// Whatever the store uses when no page size is given.
    StoreDefault,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    /// Newest record first (the store default).
    Newest,
    Random,
}

/// Abstract query against a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordQuery {
    pub filters: Vec<Filter>,
    pub projection: Projection,
    pub page_size: PageSize,
    pub ordering: Ordering,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            projection: Projection::Full,
            page_size: PageSize::StoreDefault,
            ordering: Ordering::Newest,
        }
    }
}

impl RecordQuery {
    /// Create a query with store defaults and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every record carrying the hash metadata key, without a page limit.
    ///
    /// Used by both the Counter and Cleanup.
    pub fn synthetic_ids() -> Self {
        Self::new()
            .filter(Filter::MetaKeyExists {
                key: HASH_META_KEY.to_string(),
            })
            .projection(Projection::Ids)
            .page_size(PageSize::Unbounded)
    }

    /// Add a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the projection.
    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the ordering.
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::MetaKeyExists { key } => write!(f, "meta_key = '{key}'"),
            Filter::MetaValueNotIn { key, values } => {
                write!(f, "meta_key = '{key}' AND meta_value NOT IN [")?;
                let shown: Vec<&str> = values
                    .iter()
                    .take(DISPLAY_VALUES)
                    .map(String::as_str)
                    .collect();
                write!(f, "{}", shown.join(", "))?;
                if values.len() > DISPLAY_VALUES {
                    write!(f, ", ... {} more", values.len() - DISPLAY_VALUES)?;
                }
                write!(f, "]")
            }
            Filter::IdIn { ids } => write!(f, "id IN [{} ids]", ids.len()),
        }
    }
}

impl fmt::Display for RecordQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "filters:")?;
        if self.filters.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for filter in &self.filters {
            writeln!(f, "  {filter}")?;
        }
        let projection = match self.projection {
            Projection::Ids => "ids",
            Projection::Full => "full",
        };
        writeln!(f, "projection: {projection}")?;
        match self.page_size {
            PageSize::Unbounded => writeln!(f, "page_size: unbounded")?,
            PageSize::Limit(n) => writeln!(f, "page_size: {n}")?,
            PageSize::StoreDefault => writeln!(f, "page_size: store default")?,
        }
        let ordering = match self.ordering {
            Ordering::Newest => "newest",
            Ordering::Random => "random",
        };
        write!(f, "ordering: {ordering}")
    }
}

/// One row returned by a query, shaped by the query's [`Projection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueriedRecord {
    Id(u64),
    Full(Record),
}

impl QueriedRecord {
    pub fn id(&self) -> u64 {
        match self {
            QueriedRecord::Id(id) => *id,
            QueriedRecord::Full(record) => record.id,
        }
    }
}

/// Rows returned by a query plus the total number of matching rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub items: Vec<QueriedRecord>,
    /// Rows matching the filters, ignoring the page size.
    pub total_count: u64,
}

impl QueryResult {
    /// Ids of the returned rows, in result order.
    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(QueriedRecord::id).collect()
    }

    /// Number of returned rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
