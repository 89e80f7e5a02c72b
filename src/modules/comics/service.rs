use std::sync::Arc;

use thiserror::Error;

use catalog_db::{Document, DocumentStore, FindOptions, Predicate, StoreError};

use super::models::{ComicCandidate, ComicRecord};
use super::query::{build_filter, build_sort, FilterSpec, PageRequest, QueryError};
use super::validation::{validate_record_fields, ValidationError};

pub const NOT_FOUND_MESSAGE: &str = "Comic book not found";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Comic book with these attributes already exists.")]
    Duplicate,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    fn not_found() -> Self {
        CatalogError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One page of records plus the counts needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<ComicRecord>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
}

/// Orchestrates validation, query building, and store access for comic
/// records.
#[derive(Clone)]
pub struct ComicService {
    store: Arc<dyn DocumentStore>,
}

impl ComicService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a record unless one with the same provided fields exists.
    pub async fn create(&self, candidate: ComicCandidate) -> CatalogResult<ComicRecord> {
        // An empty body has nothing to compare and falls through to validation.
        if !candidate.is_empty() {
            let predicate = candidate.exact_match().map_err(StoreError::from)?;
            if self.store.find_one(&predicate).await?.is_some() {
                tracing::debug!("rejected duplicate comic book");
                return Err(CatalogError::Duplicate);
            }
        }

        let fields = validate_record_fields(&candidate)?;
        let document = fields.into_document().map_err(StoreError::from)?;
        let record = decode(self.store.insert(document).await?)?;

        tracing::info!(id = %record.id, book = %record.book_name, "comic book created");
        Ok(record)
    }

    /// Replace the record at `id` with a fully validated field set.
    pub async fn update(&self, id: &str, candidate: ComicCandidate) -> CatalogResult<ComicRecord> {
        let fields = validate_record_fields(&candidate)?;
        let document = fields.into_document().map_err(StoreError::from)?;

        let stored = self
            .store
            .replace_by_id(id, document)
            .await?
            .ok_or_else(CatalogError::not_found)?;

        tracing::info!(id = %id, "comic book updated");
        decode(stored)
    }

    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        self.store
            .delete_by_id(id)
            .await?
            .ok_or_else(CatalogError::not_found)?;

        tracing::info!(id = %id, "comic book deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> CatalogResult<ComicRecord> {
        let document = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(CatalogError::not_found)?;
        decode(document)
    }

    /// A page of records in store order.
    pub async fn list(&self, page: PageRequest) -> CatalogResult<Page> {
        let options = FindOptions::new(page.skip(), page.limit);
        self.page_of(&Predicate::all(), options, page).await
    }

    /// A page of records sorted by one field. An empty page is reported as
    /// not found, including pages past the end.
    pub async fn list_sorted(
        &self,
        sort: Option<&str>,
        order: Option<&str>,
        page: PageRequest,
    ) -> CatalogResult<Page> {
        let spec = build_sort(sort, order)?;
        let options = FindOptions::new(page.skip(), page.limit).sorted_by(spec.to_order());

        let result = self.page_of(&Predicate::all(), options, page).await?;
        if result.records.is_empty() {
            return Err(CatalogError::NotFound(format!(
                "No comics found for sorting by {}.",
                spec.field
            )));
        }

        tracing::debug!(
            sort = spec.field,
            direction = ?spec.direction,
            returned = result.records.len(),
            "sorted listing"
        );
        Ok(result)
    }

    /// A page of records matching the filter parameters. Totals count the
    /// filtered set; an empty page is reported as not found.
    pub async fn list_filtered(
        &self,
        params: &[(String, String)],
        page: PageRequest,
    ) -> CatalogResult<Page> {
        let spec: FilterSpec = build_filter(params)?;
        let predicate = spec.to_predicate();
        let options = FindOptions::new(page.skip(), page.limit);

        let result = self.page_of(&predicate, options, page).await?;
        if result.records.is_empty() {
            return Err(CatalogError::NotFound(
                "No comics found matching the provided filters.".to_string(),
            ));
        }

        tracing::debug!(
            conditions = spec.conditions().len(),
            matched = result.total_records,
            "filtered listing"
        );
        Ok(result)
    }

    async fn page_of(
        &self,
        predicate: &Predicate,
        options: FindOptions,
        page: PageRequest,
    ) -> CatalogResult<Page> {
        let documents = self.store.find(predicate, &options).await?;
        let total_records = self.store.count(predicate).await?;

        let records = documents
            .into_iter()
            .map(decode)
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Page {
            records,
            current_page: page.page,
            total_pages: page.total_pages(total_records),
            total_records,
        })
    }
}

fn decode(document: Document) -> CatalogResult<ComicRecord> {
    serde_json::from_value(serde_json::Value::Object(document))
        .map_err(|e| CatalogError::Store(StoreError::from(e)))
}
