//! Startup checks for documents loaded from a seed file.

use anyhow::{anyhow, Context};
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use catalog_db::{Document, CREATED_AT_FIELD, ID_FIELD};

use super::models::ComicCandidate;
use super::validation::validate_record_fields;

/// Run every seed entry through the record rules and rebuild it from the
/// validated fields. `id` is carried over, and so is `createdAt` when it is an
/// RFC 3339 timestamp. The first bad entry fails the whole file.
pub fn prepare_seed(documents: Vec<Document>) -> anyhow::Result<Vec<Document>> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            prepare_entry(document).with_context(|| format!("invalid seed entry at index {index}"))
        })
        .collect()
}

fn prepare_entry(document: Document) -> anyhow::Result<Document> {
    let id = document.get(ID_FIELD).cloned();
    let created_at = document.get(CREATED_AT_FIELD).cloned();

    let candidate: ComicCandidate = serde_json::from_value(Value::Object(document))?;
    let mut prepared = validate_record_fields(&candidate)?.into_document()?;

    if let Some(id) = id {
        prepared.insert(ID_FIELD.to_string(), id);
    }
    if let Some(created_at) = created_at {
        let text = created_at
            .as_str()
            .ok_or_else(|| anyhow!("createdAt must be a string"))?;
        OffsetDateTime::parse(text, &Rfc3339)
            .with_context(|| format!("createdAt \"{text}\" is not an RFC 3339 timestamp"))?;
        prepared.insert(CREATED_AT_FIELD.to_string(), created_at);
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(document) => document,
            other => panic!("not an object: {other}"),
        }
    }

    fn valid() -> Value {
        json!({
            "bookName": "Akira",
            "authorName": "Katsuhiro Otomo",
            "yearOfPublication": 1982,
            "price": 24.99,
            "numberOfPages": 364,
            "condition": "used"
        })
    }

    #[test]
    fn valid_entries_keep_identity_fields() {
        let mut entry = valid();
        entry["id"] = json!("0190a3f6-0000-7000-8000-000000000000");
        entry["createdAt"] = json!("2024-05-01T12:00:00Z");

        let prepared = prepare_seed(vec![document(entry)]).unwrap();
        assert_eq!(prepared[0]["id"], "0190a3f6-0000-7000-8000-000000000000");
        assert_eq!(prepared[0]["createdAt"], "2024-05-01T12:00:00Z");
        assert_eq!(prepared[0]["discount"], 0.0);
    }

    #[test]
    fn incomplete_entry_names_its_index() {
        let entries = vec![document(valid()), document(json!({ "bookName": "X" }))];
        let err = prepare_seed(entries).unwrap_err();
        assert_eq!(err.to_string(), "invalid seed entry at index 1");
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let mut entry = valid();
        entry["createdAt"] = json!("yesterday");
        let err = prepare_seed(vec![document(entry)]).unwrap_err();
        assert!(format!("{err:#}").contains("yesterday"));
    }
}
