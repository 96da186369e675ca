use crate::app::{CatalogService, CategoryService, OrderService, PhotoReader};
use crate::domain::model::{Category, ProductSummary, ProductView};
use crate::storage::postgres::{PgCategoryRepository, PgOrderRepository, PgProductRepository};
use crate::storage::{CategoryRepository, MemoryStore, OrderRepository, ProductRepository};
use crate::transport::http::auth::Authenticator;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub catalog: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
    pub authenticator: Arc<dyn Authenticator>,
    /// Directory multipart photo parts are spooled into.
    pub upload_dir: PathBuf,
    /// Present for the Postgres backend; the health probe pings it.
    pub pool: Option<PgPool>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        reader: Arc<dyn PhotoReader>,
        authenticator: Arc<dyn Authenticator>,
        upload_dir: PathBuf,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(categories.clone())),
            catalog: Arc::new(CatalogService::new(products, categories, reader)),
            orders: Arc::new(OrderService::new(orders)),
            authenticator,
            upload_dir,
            pool,
        }
    }

    /// All three repositories served by one in-memory store.
    pub fn with_memory_store(
        store: &MemoryStore,
        reader: Arc<dyn PhotoReader>,
        authenticator: Arc<dyn Authenticator>,
        upload_dir: PathBuf,
    ) -> Self {
        let store = Arc::new(store.clone());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            reader,
            authenticator,
            upload_dir,
            None,
        )
    }

    pub fn with_postgres(
        pool: PgPool,
        reader: Arc<dyn PhotoReader>,
        authenticator: Arc<dyn Authenticator>,
        upload_dir: PathBuf,
    ) -> Self {
        Self::new(
            Arc::new(PgCategoryRepository::new(pool.clone())),
            Arc::new(PgProductRepository::new(pool.clone())),
            Arc::new(PgOrderRepository::new(pool.clone())),
            reader,
            authenticator,
            upload_dir,
            Some(pool),
        )
    }
}

// --- Requests ---

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct ProductFilterRequest {
    /// Category ids; empty means any category.
    #[serde(default)]
    pub checked: Vec<Uuid>,
    /// Empty, or `[min, max]` inclusive price bounds.
    #[serde(default)]
    pub radio: Vec<f64>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct OrderStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Multipart form accepted by product create/update (documentation only).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    /// Category id.
    pub category: String,
    pub quantity: String,
    /// `true`/`false` (or `1`/`0`).
    pub shipping: String,
    /// Optional image, at most 1,000,000 bytes.
    #[schema(format = Binary)]
    pub photo: Option<String>,
}

// --- Responses ---

/// Generic `{success, message}` envelope, also used for failures.
#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    /// Raw store error, only on 500s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }
}

/// `{error}` body used by product mutations.
#[derive(Serialize, Debug, ToSchema)]
pub struct ProductErrorResponse {
    pub error: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CategoryResponse {
    pub success: bool,
    pub message: String,
    pub category: Option<Category>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CategoryListResponse {
    pub success: bool,
    pub message: String,
    pub category: Vec<Category>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductWriteResponse {
    pub success: bool,
    pub message: String,
    pub products: ProductSummary,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct LatestProductsResponse {
    pub success: bool,
    #[serde(rename = "countTotal")]
    pub count_total: usize,
    pub message: String,
    pub products: Vec<ProductView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SingleProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Option<ProductView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<ProductSummary>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PopulatedProductsResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductCountResponse {
    pub success: bool,
    pub total: u64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductCategoryResponse {
    pub success: bool,
    pub category: Option<Category>,
    pub products: Vec<ProductView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn json_422(err: JsonRejection) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(MessageResponse::failed(format!("Invalid JSON body: {}", err))),
    )
        .into_response()
}
