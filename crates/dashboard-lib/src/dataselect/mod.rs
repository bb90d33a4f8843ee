//! Generic sort, filter and pagination over list items
//!
//! Any resource type can be run through [`select`] by implementing
//! [`DataCell`]. The pipeline always filters, then sorts, then captures the
//! total count, then slices out the requested page.

mod query;

#[cfg(test)]
mod tests;

pub use query::SelectionRequest;

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Item properties that can be sorted or filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Name,
    Namespace,
    CreationTimestamp,
    DesiredReplicas,
    ObservedReplicas,
}

impl PropertyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyName::Name => "name",
            PropertyName::Namespace => "namespace",
            PropertyName::CreationTimestamp => "creationTimestamp",
            PropertyName::DesiredReplicas => "desiredReplicas",
            PropertyName::ObservedReplicas => "observedReplicas",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyName {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(PropertyName::Name),
            "namespace" => Ok(PropertyName::Namespace),
            "creationTimestamp" => Ok(PropertyName::CreationTimestamp),
            "desiredReplicas" => Ok(PropertyName::DesiredReplicas),
            "observedReplicas" => Ok(PropertyName::ObservedReplicas),
            other => Err(DashboardError::InvalidQuery(format!(
                "unknown property '{}'",
                other
            ))),
        }
    }
}

/// A property value that knows how to order itself against another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparableValue {
    Str(String),
    Int(i64),
    Time(DateTime<Utc>),
}

impl ComparableValue {
    fn rank(&self) -> u8 {
        match self {
            ComparableValue::Str(_) => 0,
            ComparableValue::Int(_) => 1,
            ComparableValue::Time(_) => 2,
        }
    }

    /// Case-insensitive substring match; only string values can match
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            ComparableValue::Str(value) => value.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        }
    }
}

impl PartialOrd for ComparableValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparableValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ComparableValue::Str(a), ComparableValue::Str(b)) => a.cmp(b),
            (ComparableValue::Int(a), ComparableValue::Int(b)) => a.cmp(b),
            (ComparableValue::Time(a), ComparableValue::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Capabilities an item needs to go through the selector
pub trait DataCell {
    /// Value of `name` for this item, or `None` if the item lacks it
    fn property(&self, name: PropertyName) -> Option<ComparableValue>;

    fn matches_text(&self, name: PropertyName, needle: &str) -> bool {
        self.property(name)
            .map(|value| value.contains_text(needle))
            .unwrap_or(false)
    }
}

/// Free-text filter applied to one or more properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub properties: Vec<PropertyName>,
}

impl FilterQuery {
    pub fn new(text: impl Into<String>, properties: Vec<PropertyName>) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }

    /// Filter on the name property only
    pub fn by_name(text: impl Into<String>) -> Self {
        Self::new(text, vec![PropertyName::Name])
    }

    fn matches<T: DataCell>(&self, item: &T) -> bool {
        self.properties
            .iter()
            .any(|property| item.matches_text(*property, &self.text))
    }
}

/// One sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub property: PropertyName,
    pub ascending: bool,
}

impl SortBy {
    pub fn ascending(property: PropertyName) -> Self {
        Self {
            property,
            ascending: true,
        }
    }

    pub fn descending(property: PropertyName) -> Self {
        Self {
            property,
            ascending: false,
        }
    }
}

/// Sort criteria, applied in order until one distinguishes two items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortQuery {
    pub by: Vec<SortBy>,
}

impl SortQuery {
    pub fn new(by: Vec<SortBy>) -> Self {
        Self { by }
    }

    fn compare<T: DataCell>(&self, a: &T, b: &T) -> Ordering {
        for criterion in &self.by {
            let ordering = a
                .property(criterion.property)
                .cmp(&b.property(criterion.property));
            let ordering = if criterion.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Zero-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationQuery {
    pub items_per_page: usize,
    pub page: usize,
}

impl PaginationQuery {
    pub fn new(items_per_page: usize, page: usize) -> Self {
        Self {
            items_per_page,
            page,
        }
    }

    /// Index range of this page within `total` items, clipped to bounds
    fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self
            .page
            .checked_mul(self.items_per_page)
            .unwrap_or(usize::MAX)
            .min(total);
        let end = start.saturating_add(self.items_per_page).min(total);
        start..end
    }
}

/// Full selection configuration. `None` parts are the identity transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSelectQuery {
    pub filter: Option<FilterQuery>,
    pub sort: Option<SortQuery>,
    pub pagination: Option<PaginationQuery>,
}

impl DataSelectQuery {
    /// Query that returns every item in source order
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterQuery) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortQuery) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationQuery) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Output of [`select`]
#[derive(Debug, Clone, PartialEq)]
pub struct Selected<T> {
    /// Items of the requested page, in selection order
    pub items: Vec<T>,
    /// Count after filtering, before pagination
    pub total_items: usize,
}

/// Filter, sort and paginate `items`
pub fn select<T: DataCell>(items: Vec<T>, query: &DataSelectQuery) -> Selected<T> {
    let mut items = match &query.filter {
        Some(filter) if !filter.text.is_empty() => {
            items.into_iter().filter(|item| filter.matches(item)).collect()
        }
        _ => items,
    };

    if let Some(sort) = &query.sort {
        // sort_by is stable, equal items keep their source order
        items.sort_by(|a, b| sort.compare(a, b));
    }

    let total_items = items.len();

    let items = match &query.pagination {
        Some(pagination) => {
            let range = pagination.range(total_items);
            items.drain(range).collect()
        }
        None => items,
    };

    Selected { items, total_items }
}
