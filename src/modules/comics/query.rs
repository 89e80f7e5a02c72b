//! Translation of raw query-string parameters into store queries.
//!
//! All inbound values arrive as text. Each builder parses and checks them
//! explicitly before anything reaches the store.

use thiserror::Error;

use catalog_db::{Condition, Operator, Predicate, SortDirection, SortOrder};
use catalog_kernel::settings::CatalogSettings;

/// Fields a listing may be sorted by, in the order they are reported.
pub const SORT_FIELDS: [&str; 6] = [
    "bookName",
    "authorName",
    "yearOfPublication",
    "price",
    "discount",
    "numberOfPages",
];

/// Fields a listing may be filtered by, in the order they are reported.
pub const FILTER_FIELDS: [&str; 7] = [
    "bookName",
    "authorName",
    "yearOfPublication",
    "price",
    "discount",
    "numberOfPages",
    "condition",
];

/// Query keys reserved for pagination.
pub const PAGINATION_KEYS: [&str; 2] = ["page", "limit"];

const DESCENDING: &str = "desc";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Sorting option error. Valid options: {options}", options = SORT_FIELDS.join(", "))]
    MissingSortField,

    #[error("Invalid sort field: {0}. Valid options: {options}", options = SORT_FIELDS.join(", "))]
    InvalidSortField(String),

    #[error("Filter option error. Valid options: {options}", options = FILTER_FIELDS.join(", "))]
    NoFilterProvided,

    #[error(
        "Invalid filter field: {0}. Valid options are: {options}",
        options = FILTER_FIELDS.join(", ")
    )]
    InvalidFilterField(String),

    #[error("Filter \"{0}\" must be a number.")]
    NonNumericFilterValue(String),

    #[error("Pagination parameter \"{name}\" must be a positive integer, got \"{value}\".")]
    InvalidPageParameter { name: &'static str, value: String },

    #[error("Pagination parameter \"limit\" must not exceed {max}.")]
    PageSizeTooLarge { max: u64 },
}

impl QueryError {
    /// Machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::MissingSortField => "missing_sort_field",
            QueryError::InvalidSortField(_) => "invalid_sort_field",
            QueryError::NoFilterProvided => "no_filter_provided",
            QueryError::InvalidFilterField(_) => "invalid_filter_field",
            QueryError::NonNumericFilterValue(_) => "non_numeric_filter_value",
            QueryError::InvalidPageParameter { .. } => "invalid_page_parameter",
            QueryError::PageSizeTooLarge { .. } => "page_size_too_large",
        }
    }
}

/// Validated sort descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn to_order(&self) -> SortOrder {
        SortOrder::new(self.field, self.direction)
    }
}

/// Build a sort descriptor from the `sort` and `order` parameters.
///
/// Only the literal `desc` selects descending order; any other `order`
/// value, or none, sorts ascending.
pub fn build_sort(sort: Option<&str>, order: Option<&str>) -> Result<SortSpec, QueryError> {
    let sort = match sort {
        Some(sort) if !sort.is_empty() => sort,
        _ => return Err(QueryError::MissingSortField),
    };

    let field = SORT_FIELDS
        .iter()
        .copied()
        .find(|candidate| *candidate == sort)
        .ok_or_else(|| QueryError::InvalidSortField(sort.to_string()))?;

    let direction = if order == Some(DESCENDING) {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    Ok(SortSpec { field, direction })
}

/// How a filter value is interpreted for a given field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    /// Case-insensitive substring
    Text,
    /// Exact text
    Exact,
    /// Exact number
    Number,
    /// Upper bound, inclusive
    Max,
    /// Lower bound, inclusive
    Min,
}

fn filter_kind(field: &str) -> Option<FilterKind> {
    match field {
        "bookName" | "authorName" => Some(FilterKind::Text),
        "condition" => Some(FilterKind::Exact),
        "yearOfPublication" => Some(FilterKind::Number),
        "price" => Some(FilterKind::Max),
        "discount" | "numberOfPages" => Some(FilterKind::Min),
        _ => None,
    }
}

/// Validated conjunctive filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    conditions: Vec<Condition>,
}

impl FilterSpec {
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn to_predicate(&self) -> Predicate {
        self.conditions.iter().cloned().collect()
    }
}

/// Build a filter from query pairs in the order they appeared.
///
/// Pagination keys are skipped. Unknown keys and non-numeric values for
/// numeric fields fail on the first offending pair; recognized keys with an
/// empty value are ignored.
pub fn build_filter(params: &[(String, String)]) -> Result<FilterSpec, QueryError> {
    let mut conditions = Vec::new();

    for (key, value) in params {
        if PAGINATION_KEYS.contains(&key.as_str()) {
            continue;
        }

        let kind = filter_kind(key).ok_or_else(|| QueryError::InvalidFilterField(key.clone()))?;
        if value.is_empty() {
            continue;
        }

        let operator = match kind {
            FilterKind::Text => Operator::Contains(value.clone()),
            FilterKind::Exact => Operator::Equals(serde_json::Value::String(value.clone())),
            FilterKind::Number => Operator::Equals(parse_number(key, value)?.into()),
            FilterKind::Max => Operator::AtMost(parse_number(key, value)?),
            FilterKind::Min => Operator::AtLeast(parse_number(key, value)?),
        };

        conditions.push(Condition::new(key.as_str(), operator));
    }

    if conditions.is_empty() {
        return Err(QueryError::NoFilterProvided);
    }

    Ok(FilterSpec { conditions })
}

fn parse_number(key: &str, value: &str) -> Result<f64, QueryError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| QueryError::NonNumericFilterValue(key.to_string()))
}

/// Requested page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Parse `page` and `limit`, applying the configured defaults when absent.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        settings: &CatalogSettings,
    ) -> Result<Self, QueryError> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let limit = parse_positive("limit", limit)?.unwrap_or(settings.default_page_size);

        if limit > settings.max_page_size {
            return Err(QueryError::PageSizeTooLarge {
                max: settings.max_page_size,
            });
        }

        Ok(Self { page, limit })
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed to show `total_records`.
    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.limit)
    }
}

fn parse_positive(name: &'static str, value: Option<&str>) -> Result<Option<u64>, QueryError> {
    let Some(raw) = value.filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(number) if number >= 1 => Ok(Some(number)),
        _ => Err(QueryError::InvalidPageParameter {
            name,
            value: raw.to_string(),
        }),
    }
}
