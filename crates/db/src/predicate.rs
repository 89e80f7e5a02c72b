//! Predicate and ordering language understood by every [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::DocumentStore

use std::cmp::Ordering;

use serde_json::Value;

use crate::Document;

/// Comparison applied to a single document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Field equals the value. Numbers compare numerically.
    Equals(Value),
    /// Text field contains the needle, ignoring case.
    Contains(String),
    /// Numeric field is less than or equal to the bound.
    AtMost(f64),
    /// Numeric field is greater than or equal to the bound.
    AtLeast(f64),
}

/// One field condition of a [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator,
        }
    }

    fn matches(&self, document: &Document) -> bool {
        let Some(value) = document.get(&self.field) else {
            return false;
        };

        match &self.operator {
            Operator::Equals(expected) => values_equal(value, expected),
            Operator::Contains(needle) => value
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
            Operator::AtMost(bound) => value.as_f64().is_some_and(|number| number <= *bound),
            Operator::AtLeast(bound) => value.as_f64().is_some_and(|number| number >= *bound),
        }
    }
}

/// Conjunction of field conditions. An empty predicate matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Predicate matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a condition that must hold in addition to the existing ones.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| condition.matches(document))
    }
}

impl FromIterator<Condition> for Predicate {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Total order on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Compare two documents on the sort field. Ties yield `Equal` so a
    /// stable sort keeps store order.
    pub fn compare(&self, left: &Document, right: &Document) -> Ordering {
        let ordering = compare_values(left.get(&self.field), right.get(&self.field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Options narrowing a `find` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<SortOrder>,
    pub skip: u64,
    pub limit: u64,
}

impl FindOptions {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            sort: None,
            skip,
            limit,
        }
    }

    pub fn sorted_by(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

// missing/null < numbers < text < booleans < everything else
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Bool(_)) => 3,
        Some(_) => 4,
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}
