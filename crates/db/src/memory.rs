use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    Document, DocumentStore, FindOptions, Predicate, StoreError, StoreResult, CREATED_AT_FIELD,
    ID_FIELD,
};

/// In-process document store.
///
/// Documents live in insertion order, which is the natural order returned by
/// unsorted queries and the tie-break for sorted ones. Writers take the lock
/// exclusively, so concurrent writes to one document are last-write-wins.
pub struct MemoryStore {
    collection: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Append documents, keeping any valid `id` and `createdAt` they carry.
    pub async fn seed(&self, documents: Vec<Document>) -> StoreResult<usize> {
        let mut stamped = Vec::with_capacity(documents.len());
        for mut document in documents {
            let keep_id = document
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(|id| id.to_string());
            let id = keep_id.unwrap_or_else(new_id);
            document.insert(ID_FIELD.to_string(), Value::String(id));

            if !document.contains_key(CREATED_AT_FIELD) {
                document.insert(CREATED_AT_FIELD.to_string(), Value::String(now()?));
            }
            stamped.push(document);
        }

        let count = stamped.len();
        self.documents.write().await.extend(stamped);
        tracing::info!(collection = %self.collection, documents = count, "seeded memory store");
        Ok(count)
    }
}

/// Read a seed file holding a JSON array of documents.
pub async fn read_seed_file(path: impl AsRef<Path>) -> StoreResult<Vec<Document>> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path).await.map_err(|source| StoreError::Seed {
        path: path.display().to_string(),
        source,
    })?;

    match serde_json::from_slice::<Value>(&raw)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(document) => Ok(document),
                _ => Err(StoreError::SeedShape(path.display().to_string())),
            })
            .collect(),
        _ => Err(StoreError::SeedShape(path.display().to_string())),
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

fn now() -> StoreResult<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

/// Normalize a caller-supplied id to the stored form.
fn canonical_id(id: &str) -> StoreResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn has_id(document: &Document, id: &str) -> bool {
    document.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        predicate: &Predicate,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut matched: Vec<&Document> = documents
            .iter()
            .filter(|document| predicate.matches(document))
            .collect();

        if let Some(order) = &options.sort {
            matched.sort_by(|left, right| order.compare(left, right));
        }

        Ok(matched
            .into_iter()
            .skip(to_usize(options.skip))
            .take(to_usize(options.limit))
            .cloned()
            .collect())
    }

    async fn find_one(&self, predicate: &Predicate) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|document| predicate.matches(document))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        let id = canonical_id(id)?;
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|document| has_id(document, &id)).cloned())
    }

    async fn insert(&self, mut document: Document) -> StoreResult<Document> {
        document.insert(ID_FIELD.to_string(), Value::String(new_id()));
        document.insert(CREATED_AT_FIELD.to_string(), Value::String(now()?));

        self.documents.write().await.push(document.clone());
        tracing::debug!(collection = %self.collection, "document inserted");
        Ok(document)
    }

    async fn replace_by_id(&self, id: &str, mut document: Document) -> StoreResult<Option<Document>> {
        let id = canonical_id(id)?;
        let mut documents = self.documents.write().await;
        let Some(slot) = documents.iter_mut().find(|document| has_id(document, &id)) else {
            return Ok(None);
        };

        document.insert(ID_FIELD.to_string(), Value::String(id));
        match slot.get(CREATED_AT_FIELD) {
            Some(created_at) => {
                document.insert(CREATED_AT_FIELD.to_string(), created_at.clone());
            }
            None => {
                document.remove(CREATED_AT_FIELD);
            }
        }

        *slot = document.clone();
        Ok(Some(document))
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Document>> {
        let id = canonical_id(id)?;
        let mut documents = self.documents.write().await;
        Ok(documents
            .iter()
            .position(|document| has_id(document, &id))
            .map(|index| documents.remove(index)))
    }

    async fn count(&self, predicate: &Predicate) -> StoreResult<u64> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|document| predicate.matches(document))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, Operator, SortDirection, SortOrder};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn store_with_prices(prices: &[f64]) -> MemoryStore {
        let store = MemoryStore::new("test");
        for (index, price) in prices.iter().enumerate() {
            store
                .insert(doc(json!({"rank": index, "price": price})))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let store = MemoryStore::new("test");
        let stored = store
            .insert(doc(json!({"id": "caller-chosen", "name": "x"})))
            .await
            .unwrap();

        let id = stored[ID_FIELD].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert!(stored[CREATED_AT_FIELD].is_string());
        assert_eq!(store.find_by_id(id).await.unwrap(), Some(stored.clone()));
    }

    #[tokio::test]
    async fn find_skips_and_limits_in_insertion_order() {
        let store = store_with_prices(&[5.0, 1.0, 3.0, 2.0]).await;
        let page = store
            .find(&Predicate::all(), &FindOptions::new(1, 2))
            .await
            .unwrap();
        let ranks: Vec<_> = page.iter().map(|d| d["rank"].as_u64().unwrap()).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[tokio::test]
    async fn sort_is_stable_on_ties() {
        let store = store_with_prices(&[2.0, 1.0, 2.0, 1.0]).await;
        let options = FindOptions::new(0, 10)
            .sorted_by(SortOrder::new("price", SortDirection::Descending));
        let sorted = store.find(&Predicate::all(), &options).await.unwrap();
        let ranks: Vec<_> = sorted.iter().map(|d| d["rank"].as_u64().unwrap()).collect();
        assert_eq!(ranks, vec![0, 2, 1, 3]);
    }

    #[tokio::test]
    async fn count_respects_predicate() {
        let store = store_with_prices(&[5.0, 1.0, 3.0]).await;
        let cheap = Predicate::all().and(Condition::new("price", Operator::AtMost(3.0)));
        assert_eq!(store.count(&cheap).await.unwrap(), 2);
        assert_eq!(store.count(&Predicate::all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn replace_keeps_identity_and_position() {
        let store = store_with_prices(&[5.0, 1.0]).await;
        let first = store
            .find(&Predicate::all(), &FindOptions::new(0, 1))
            .await
            .unwrap()
            .remove(0);
        let id = first[ID_FIELD].as_str().unwrap().to_string();

        let replaced = store
            .replace_by_id(
                &id,
                doc(json!({"price": 7.0, "createdAt": "1970-01-01T00:00:00Z", "id": "other"})),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced[ID_FIELD], first[ID_FIELD]);
        assert_eq!(replaced[CREATED_AT_FIELD], first[CREATED_AT_FIELD]);
        assert!(replaced.get("rank").is_none());

        let all = store
            .find(&Predicate::all(), &FindOptions::new(0, 10))
            .await
            .unwrap();
        assert_eq!(all[0], replaced);
    }

    #[tokio::test]
    async fn missing_and_malformed_ids() {
        let store = MemoryStore::new("test");
        let unknown = Uuid::now_v7().to_string();
        assert!(store.find_by_id(&unknown).await.unwrap().is_none());
        assert!(store.delete_by_id(&unknown).await.unwrap().is_none());
        assert!(store
            .replace_by_id(&unknown, Document::new())
            .await
            .unwrap()
            .is_none());

        let err = store.find_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(ref id) if id == "not-an-id"));
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = store_with_prices(&[1.0]).await;
        let stored = store.find_one(&Predicate::all()).await.unwrap().unwrap();
        let id = stored[ID_FIELD].as_str().unwrap();

        assert_eq!(store.delete_by_id(id).await.unwrap(), Some(stored.clone()));
        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert_eq!(store.count(&Predicate::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn seed_file_loads_documents() {
        let path = std::env::temp_dir().join(format!("catalog-seed-{}.json", Uuid::new_v4()));
        let kept = Uuid::now_v7().to_string();
        std::fs::write(
            &path,
            json!([{"id": kept, "price": 1}, {"price": 2}]).to_string(),
        )
        .unwrap();

        let store = MemoryStore::new("comics");
        let documents = read_seed_file(&path).await.unwrap();
        assert_eq!(store.seed(documents).await.unwrap(), 2);
        assert_eq!(store.count(&Predicate::all()).await.unwrap(), 2);
        assert!(store.find_by_id(&kept).await.unwrap().is_some());

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn seed_file_must_be_an_array() {
        let path = std::env::temp_dir().join(format!("catalog-seed-{}.json", Uuid::new_v4()));
        std::fs::write(&path, r#"{"price": 1}"#).unwrap();

        let err = read_seed_file(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::SeedShape(_)));

        let missing = read_seed_file(path.with_extension("missing")).await.unwrap_err();
        assert!(matches!(missing, StoreError::Seed { .. }));

        std::fs::remove_file(&path).ok();
    }
}
