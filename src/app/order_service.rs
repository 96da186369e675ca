use crate::app::error::ServiceResult;
use crate::domain::model::{Order, OrderView};
use crate::storage::OrderRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn list_for_buyer(&self, buyer: Uuid) -> ServiceResult<Vec<OrderView>> {
        Ok(self.orders.find_by_buyer(buyer).await?)
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> ServiceResult<Vec<OrderView>> {
        Ok(self.orders.list_all().await?)
    }

    /// Hands `status` to the store unchecked; the order record rejects values outside
    /// its enum. Any status may follow any other.
    pub async fn set_status(&self, order_id: Uuid, status: &str) -> ServiceResult<Option<Order>> {
        let updated = self.orders.update_status(order_id, status).await?;
        tracing::info!(order_id = %order_id, status, found = updated.is_some(), "order status set");
        Ok(updated)
    }
}
