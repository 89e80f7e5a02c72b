pub mod models;
pub mod query;
pub mod routes;
pub mod seed;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};

use catalog_kernel::{settings::CatalogSettings, InitCtx, Module};

use routes::ComicsState;
use service::ComicService;

/// Comic book catalog: CRUD plus paginated, sorted, and filtered listings.
pub struct ComicsModule {
    state: Arc<ComicsState>,
}

impl ComicsModule {
    pub fn new(service: ComicService, catalog: CatalogSettings) -> Self {
        Self {
            state: Arc::new(ComicsState { service, catalog }),
        }
    }
}

#[async_trait]
impl Module for ComicsModule {
    fn name(&self) -> &'static str {
        "comics"
    }

    fn mount_path(&self) -> String {
        "/api".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            default_page_size = self.state.catalog.default_page_size,
            max_page_size = self.state.catalog.max_page_size,
            "comics module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "comics module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "comics module stopped");
        Ok(())
    }
}

/// Create a new instance of the comics module
pub fn create_module(service: ComicService, catalog: CatalogSettings) -> Arc<dyn Module> {
    Arc::new(ComicsModule::new(service, catalog))
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn record_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "success": { "type": "boolean" },
                        "data": { "$ref": "#/components/schemas/Comic" }
                    }
                }
            }
        }
    })
}

fn page_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "success": { "type": "boolean" },
                        "data": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Comic" }
                        },
                        "pagination": { "$ref": "#/components/schemas/Pagination" }
                    }
                }
            }
        }
    })
}

fn query_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": { "type": "string" }
    })
}

fn id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn candidate_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ComicInput" }
            }
        }
    })
}

fn openapi_fragment() -> Value {
    let page = query_param("page", "1-based page number");
    let limit = query_param("limit", "Records per page");

    let mut filter_params: Vec<Value> = query::FILTER_FIELDS
        .iter()
        .map(|field| query_param(field, "Filter value"))
        .collect();
    filter_params.push(page.clone());
    filter_params.push(limit.clone());

    json!({
        "paths": {
            "/addComic": {
                "post": {
                    "summary": "Create a comic book",
                    "tags": ["Comics"],
                    "requestBody": candidate_body(),
                    "responses": {
                        "201": record_response("Created"),
                        "400": error_response("Validation failure or duplicate")
                    }
                }
            },
            "/updateComic/{id}": {
                "put": {
                    "summary": "Replace a comic book",
                    "tags": ["Comics"],
                    "parameters": [id_param()],
                    "requestBody": candidate_body(),
                    "responses": {
                        "200": record_response("Updated"),
                        "400": error_response("Validation failure"),
                        "404": error_response("Comic book not found")
                    }
                }
            },
            "/deleteComic/{id}": {
                "delete": {
                    "summary": "Delete a comic book",
                    "tags": ["Comics"],
                    "parameters": [id_param()],
                    "responses": {
                        "200": {
                            "description": "Deleted",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                }
                            }
                        },
                        "404": error_response("Comic book not found")
                    }
                }
            },
            "/allComics": {
                "get": {
                    "summary": "List comic books",
                    "tags": ["Comics"],
                    "parameters": [page, limit],
                    "responses": {
                        "200": page_response("One page of comic books"),
                        "400": error_response("Invalid pagination")
                    }
                }
            },
            "/allComics/filter": {
                "get": {
                    "summary": "Filter comic books",
                    "tags": ["Comics"],
                    "parameters": filter_params,
                    "responses": {
                        "200": page_response("Matching comic books"),
                        "400": error_response("Invalid filter"),
                        "404": error_response("No matching comic books")
                    }
                }
            },
            "/allComics/sort": {
                "get": {
                    "summary": "Sort comic books",
                    "tags": ["Comics"],
                    "parameters": [
                        query_param("sort", "Field to sort by"),
                        query_param("order", "\"desc\" for descending, anything else ascending"),
                        page,
                        limit
                    ],
                    "responses": {
                        "200": page_response("Sorted comic books"),
                        "400": error_response("Invalid sort field"),
                        "404": error_response("Empty page")
                    }
                }
            },
            "/comic/{id}": {
                "get": {
                    "summary": "Fetch a comic book",
                    "tags": ["Comics"],
                    "parameters": [id_param()],
                    "responses": {
                        "200": record_response("The comic book"),
                        "404": error_response("Comic book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Comic": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "bookName": { "type": "string" },
                        "authorName": { "type": "string" },
                        "yearOfPublication": { "type": "integer" },
                        "price": { "type": "number" },
                        "discount": { "type": "number", "minimum": 0, "maximum": 100 },
                        "numberOfPages": { "type": "integer" },
                        "condition": { "type": "string", "enum": ["new", "used"] },
                        "description": { "type": "string" },
                        "createdAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "bookName", "authorName", "yearOfPublication",
                        "price", "numberOfPages", "condition", "createdAt"
                    ]
                },
                "ComicInput": {
                    "type": "object",
                    "properties": {
                        "bookName": { "type": "string" },
                        "authorName": { "type": "string" },
                        "yearOfPublication": { "type": "integer", "minimum": 0 },
                        "price": { "type": "number", "minimum": 0 },
                        "discount": { "type": "number", "minimum": 0, "maximum": 100 },
                        "numberOfPages": { "type": "integer", "minimum": 0 },
                        "condition": { "type": "string", "enum": ["new", "used"] },
                        "description": { "type": "string" }
                    },
                    "required": [
                        "bookName", "authorName", "yearOfPublication",
                        "price", "numberOfPages", "condition"
                    ]
                }
            }
        }
    })
}
