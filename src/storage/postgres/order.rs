use super::product::row_to_summary;
use crate::domain::model::{
    BuyerRef, InvalidStatus, NewOrder, Order, OrderStatus, OrderView, ProductSummary,
};
use crate::storage::repository::{OrderRepository, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "o.id, o.products, o.payment, o.buyer, o.status, o.created_at, o.updated_at";

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_views(&self, rows: Vec<PgRow>) -> StoreResult<Vec<OrderView>> {
        let orders: Vec<(Order, Option<String>)> = rows
            .iter()
            .map(|row| -> StoreResult<(Order, Option<String>)> {
                Ok((row_to_order(row)?, row.try_get("buyer_name")?))
            })
            .collect::<StoreResult<_>>()?;

        let mut product_ids: Vec<Uuid> = orders
            .iter()
            .flat_map(|(order, _)| order.products.iter().copied())
            .collect();
        product_ids.sort();
        product_ids.dedup();

        let products: HashMap<Uuid, ProductSummary> = if product_ids.is_empty() {
            HashMap::new()
        } else {
            let rows = sqlx::query(
                "SELECT p.id, p.name, p.slug, p.description, p.price, p.category, p.quantity,
                        p.shipping, p.created_at, p.updated_at
                 FROM products p WHERE p.id = ANY($1)",
            )
            .bind(&product_ids)
            .fetch_all(&self.pool)
            .await?;
            rows.iter()
                .map(|row| row_to_summary(row).map(|p| (p.id, p)))
                .collect::<StoreResult<_>>()?
        };

        Ok(orders
            .into_iter()
            .map(|(order, buyer_name)| OrderView {
                id: order.id,
                products: order
                    .products
                    .iter()
                    .map(|pid| products.get(pid).cloned())
                    .collect(),
                payment: order.payment,
                buyer: buyer_name.map(|name| BuyerRef {
                    id: order.buyer,
                    name,
                }),
                status: order.status,
                created_at: order.created_at,
                updated_at: order.updated_at,
            })
            .collect())
    }
}

fn row_to_order(row: &PgRow) -> StoreResult<Order> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e: InvalidStatus| StoreError::Corrupt(e.to_string()))?;
    let payment: JsonValue = row.try_get("payment")?;
    Ok(Order {
        id: row.try_get("id")?,
        products: row.try_get("products")?,
        payment,
        buyer: row.try_get("buyer")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert(&self, order: NewOrder) -> StoreResult<Order> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO orders AS o (id, products, payment, buyer, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING o.id, o.products, o.payment, o.buyer, o.status, o.created_at, o.updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&order.products)
        .bind(&order.payment)
        .bind(order.buyer)
        .bind(OrderStatus::default().as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        row_to_order(&row)
    }

    async fn find_by_buyer(&self, buyer: Uuid) -> StoreResult<Vec<OrderView>> {
        let rows = sqlx::query(&format!(
            "SELECT {}, u.name AS buyer_name FROM orders o
             LEFT JOIN users u ON u.id = o.buyer
             WHERE o.buyer = $1",
            ORDER_COLUMNS
        ))
        .bind(buyer)
        .fetch_all(&self.pool)
        .await?;
        self.fetch_views(rows).await
    }

    async fn list_all(&self) -> StoreResult<Vec<OrderView>> {
        let rows = sqlx::query(&format!(
            "SELECT {}, u.name AS buyer_name FROM orders o
             LEFT JOIN users u ON u.id = o.buyer
             ORDER BY o.created_at DESC, o.id DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        self.fetch_views(rows).await
    }

    async fn update_status(&self, id: Uuid, status: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {} FROM orders o WHERE o.id = $1", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut order = row_to_order(&row)?;
        order
            .apply_status(status)
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let row = sqlx::query(&format!(
            "UPDATE orders AS o SET status = $2, updated_at = $3 WHERE o.id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_order).transpose()
    }
}
