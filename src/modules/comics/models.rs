use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use catalog_db::{Condition as FieldCondition, Document, Operator, Predicate};

/// Physical condition of a comic book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }

    /// Strict parse; only the exact lowercase tokens are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Condition::New),
            "used" => Some(Condition::Used),
            _ => None,
        }
    }
}

/// A comic book as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicRecord {
    /// Store-assigned identifier
    pub id: String,
    pub book_name: String,
    pub author_name: String,
    pub year_of_publication: i64,
    pub price: f64,
    /// Percentage in `[0, 100]`
    #[serde(default)]
    pub discount: f64,
    pub number_of_pages: i64,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Store-assigned creation time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Request body for create and update. Every field is optional so that
/// absence can be reported by validation rather than by deserialization.
/// `id` and `createdAt` are not accepted from clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_publication: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComicCandidate {
    /// Predicate matching stored records whose fields equal every field
    /// provided here.
    pub fn exact_match(&self) -> Result<Predicate, serde_json::Error> {
        let serde_json::Value::Object(fields) = serde_json::to_value(self)? else {
            return Ok(Predicate::all());
        };

        Ok(fields
            .into_iter()
            .map(|(field, value)| FieldCondition::new(field, Operator::Equals(value)))
            .collect())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A candidate that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicFields {
    pub book_name: String,
    pub author_name: String,
    pub year_of_publication: i64,
    pub price: f64,
    pub discount: f64,
    pub number_of_pages: i64,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComicFields {
    pub fn into_document(self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(document) => Ok(document),
            _ => Ok(Document::new()),
        }
    }
}
