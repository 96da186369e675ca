//! Repository contracts, one per entity.
//!
//! Services hold these as `Arc<dyn ...>` so a Postgres pool and the in-memory store are
//! interchangeable. None of the operations are transactional across calls; callers
//! that check-then-write accept the race.

use crate::domain::model::{
    Category, NewOrder, Order, OrderView, Photo, Product, ProductFilter, ProductSummary,
    ProductView,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Failures surfaced by a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The record's own validation refused the write.
    #[error("{0}")]
    InvalidRecord(String),
    /// A persisted value could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Exact (case-sensitive) name lookup.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>>;

    async fn insert(&self, category: &Category) -> StoreResult<Category>;

    /// Renames a category, returning `None` when `id` does not exist.
    async fn update(&self, id: Uuid, name: &str, slug: &str) -> StoreResult<Option<Category>>;

    async fn list_all(&self) -> StoreResult<Vec<Category>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>>;

    /// Removes the category if present. Referencing products are left untouched.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts or replaces the record by id. `created_at` of an existing row is kept.
    async fn save(&self, product: &Product) -> StoreResult<Product>;

    /// Full record including photo bytes.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<ProductView>>;

    /// Newest first, at most `limit`, category populated.
    async fn latest(&self, limit: usize) -> StoreResult<Vec<ProductView>>;

    /// `None` when the product is absent, `Some(None)` when it has no photo.
    async fn find_photo(&self, id: Uuid) -> StoreResult<Option<Option<Photo>>>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn filter(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductSummary>>;

    /// Fast estimate of the number of products.
    async fn estimated_count(&self) -> StoreResult<u64>;

    /// Newest first, skipping `offset` records.
    async fn page(&self, offset: usize, limit: usize) -> StoreResult<Vec<ProductSummary>>;

    async fn search(&self, keyword: &str) -> StoreResult<Vec<ProductSummary>>;

    /// Up to `limit` products of `category`, excluding `exclude`.
    async fn related(
        &self,
        exclude: Uuid,
        category: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<ProductView>>;

    async fn by_category(&self, category: Uuid) -> StoreResult<Vec<ProductView>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Entry point for the checkout flow. Orders start as `Not Process`.
    async fn insert(&self, order: NewOrder) -> StoreResult<Order>;

    async fn find_by_buyer(&self, buyer: Uuid) -> StoreResult<Vec<OrderView>>;

    /// Every order, newest first.
    async fn list_all(&self) -> StoreResult<Vec<OrderView>>;

    /// Writes `status` after the record validates it. `None` when `id` does not exist.
    async fn update_status(&self, id: Uuid, status: &str) -> StoreResult<Option<Order>>;
}
