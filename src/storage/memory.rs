//! In-memory implementation of all three repositories.
//!
//! Backs the test suite and `STORE_BACKEND=memory`. Newest-first ordering ties on
//! `created_at` are broken by insertion sequence so pagination stays deterministic.

use crate::domain::model::{
    matches_keyword, BuyerRef, Category, NewOrder, Order, OrderStatus, OrderView, Photo, Product,
    ProductFilter, ProductSummary, ProductView,
};
use crate::storage::repository::{
    CategoryRepository, OrderRepository, ProductRepository, StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    next_seq: u64,
    categories: Vec<Category>,
    products: Vec<(u64, Product)>,
    orders: Vec<(u64, Order)>,
    users: HashMap<Uuid, String>,
}

impl State {
    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn category(&self, id: Uuid) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }

    fn view(&self, product: &Product) -> ProductView {
        ProductView::from_summary(product.summary(), self.category(product.category))
    }

    fn products_newest_first(&self) -> Vec<&Product> {
        let mut rows: Vec<&(u64, Product)> = self.products.iter().collect();
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        rows.into_iter().map(|(_, p)| p).collect()
    }

    fn order_view(&self, order: &Order) -> OrderView {
        let products = order
            .products
            .iter()
            .map(|pid| {
                self.products
                    .iter()
                    .find(|(_, p)| p.id == *pid)
                    .map(|(_, p)| p.summary())
            })
            .collect();
        let buyer = self.users.get(&order.buyer).map(|name| BuyerRef {
            id: order.buyer,
            name: name.clone(),
        });
        OrderView {
            id: order.id,
            products,
            payment: order.payment.clone(),
            buyer,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Shared, cloneable in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so orders can resolve the buyer's name.
    pub async fn register_user(&self, id: Uuid, name: impl Into<String>) {
        let mut state = self.state.write().await;
        state.users.insert(id, name.into());
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, category: &Category) -> StoreResult<Category> {
        let mut state = self.state.write().await;
        state.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn update(&self, id: Uuid, name: &str, slug: &str) -> StoreResult<Option<Category>> {
        let mut state = self.state.write().await;
        Ok(state.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.slug = slug.to_string();
            c.clone()
        }))
    }

    async fn list_all(&self) -> StoreResult<Vec<Category>> {
        Ok(self.state.read().await.categories.clone())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.state.read().await.category(id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.categories.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn save(&self, product: &Product) -> StoreResult<Product> {
        let mut state = self.state.write().await;
        let mut saved = product.clone();
        saved.updated_at = Utc::now();
        match state.products.iter_mut().find(|(_, p)| p.id == product.id) {
            Some((_, existing)) => {
                saved.created_at = existing.created_at;
                *existing = saved.clone();
            }
            None => {
                let seq = state.bump();
                state.products.push((seq, saved.clone()));
            }
        }
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|(_, p)| p.id == id).map(|(_, p)| p.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<ProductView>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .find(|(_, p)| p.slug == slug)
            .map(|(_, p)| state.view(p)))
    }

    async fn latest(&self, limit: usize) -> StoreResult<Vec<ProductView>> {
        let state = self.state.read().await;
        Ok(state
            .products_newest_first()
            .into_iter()
            .take(limit)
            .map(|p| state.view(p))
            .collect())
    }

    async fn find_photo(&self, id: Uuid) -> StoreResult<Option<Option<Photo>>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(_, p)| p.photo.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.products.retain(|(_, p)| p.id != id);
        Ok(())
    }

    async fn filter(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductSummary>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .map(|(_, p)| p.summary())
            .filter(|p| filter.matches(p))
            .collect())
    }

    async fn estimated_count(&self) -> StoreResult<u64> {
        Ok(self.state.read().await.products.len() as u64)
    }

    async fn page(&self, offset: usize, limit: usize) -> StoreResult<Vec<ProductSummary>> {
        let state = self.state.read().await;
        Ok(state
            .products_newest_first()
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(Product::summary)
            .collect())
    }

    async fn search(&self, keyword: &str) -> StoreResult<Vec<ProductSummary>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .map(|(_, p)| p.summary())
            .filter(|p| matches_keyword(p, keyword))
            .collect())
    }

    async fn related(
        &self,
        exclude: Uuid,
        category: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<ProductView>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|(_, p)| p.category == category && p.id != exclude)
            .take(limit)
            .map(|(_, p)| state.view(p))
            .collect())
    }

    async fn by_category(&self, category: Uuid) -> StoreResult<Vec<ProductView>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|(_, p)| p.category == category)
            .map(|(_, p)| state.view(p))
            .collect())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert(&self, order: NewOrder) -> StoreResult<Order> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            products: order.products,
            payment: order.payment,
            buyer: order.buyer,
            status: OrderStatus::default(),
            created_at: now,
            updated_at: now,
        };
        let seq = state.bump();
        state.orders.push((seq, order.clone()));
        Ok(order)
    }

    async fn find_by_buyer(&self, buyer: Uuid) -> StoreResult<Vec<OrderView>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .filter(|(_, o)| o.buyer == buyer)
            .map(|(_, o)| state.order_view(o))
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<OrderView>> {
        let state = self.state.read().await;
        let mut rows: Vec<&(u64, Order)> = state.orders.iter().collect();
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        Ok(rows.into_iter().map(|(_, o)| state.order_view(o)).collect())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> StoreResult<Option<Order>> {
        let mut state = self.state.write().await;
        let Some((_, order)) = state.orders.iter_mut().find(|(_, o)| o.id == id) else {
            return Ok(None);
        };
        let mut updated = order.clone();
        updated
            .apply_status(status)
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        *order = updated.clone();
        Ok(Some(updated))
    }
}
