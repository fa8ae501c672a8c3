//! A stand-in for the remote orders service.
//!
//! Every call sleeps for a configurable latency so bulk runs actually
//! overlap. Shipped orders refuse deletion, which gives the bulk delete
//! something to report as a partial failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use listkit::{ActionError, ActionReply, RecordAction, RecordSource, SourceError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::orders::Order;

#[derive(Debug, Clone)]
pub struct OrdersApi {
    orders: Arc<Mutex<Vec<Order>>>,
    latency: Duration,
    offline: bool,
}

impl OrdersApi {
    pub fn new(orders: Vec<Order>, latency: Duration) -> Self {
        OrdersApi {
            orders: Arc::new(Mutex::new(orders)),
            latency,
            offline: false,
        }
    }

    /// Every call fails with "service unavailable".
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl RecordSource<Order> for OrdersApi {
    async fn fetch(&self) -> Result<Vec<Order>, SourceError> {
        self.round_trip().await;
        if self.offline {
            return Err(SourceError::Unavailable("orders service is offline".into()));
        }
        Ok(self.orders.lock().await.clone())
    }
}

/// `DELETE /orders/{id}`.
pub struct DeleteOrder {
    api: OrdersApi,
}

impl DeleteOrder {
    pub fn new(api: OrdersApi) -> Self {
        DeleteOrder { api }
    }
}

#[async_trait]
impl RecordAction<u32> for DeleteOrder {
    fn name(&self) -> &str {
        "delete"
    }

    async fn perform(&self, id: u32) -> Result<ActionReply, ActionError> {
        self.api.round_trip().await;
        if self.api.offline {
            return Err(ActionError::Unavailable("orders service is offline".into()));
        }

        let mut orders = self.api.orders.lock().await;
        let Some(pos) = orders.iter().position(|o| o.id == id) else {
            return Ok(ActionReply::refused(format!("order {} no longer exists", id)));
        };
        if orders[pos].status == "shipped" {
            return Err(ActionError::Rejected(format!(
                "order {} has already shipped",
                id
            )));
        }

        orders.remove(pos);
        debug!(id, "order deleted");
        Ok(ActionReply::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::seed;
    use listkit::Timestamp;

    fn api() -> OrdersApi {
        OrdersApi::new(seed(8, Timestamp::from_secs(1_700_000_000)), Duration::ZERO)
    }

    #[tokio::test]
    async fn shipped_orders_refuse_deletion() {
        let api = api();
        let delete = DeleteOrder::new(api.clone());
        let orders = api.fetch().await.unwrap();
        let shipped = orders.iter().find(|o| o.status == "shipped").unwrap().id;
        let pending = orders.iter().find(|o| o.status == "pending").unwrap().id;

        assert!(matches!(
            delete.perform(shipped).await,
            Err(ActionError::Rejected(_))
        ));
        assert!(delete.perform(pending).await.unwrap().success);
        assert_eq!(api.len().await, 7);
    }

    #[tokio::test]
    async fn missing_order_is_refused() {
        let delete = DeleteOrder::new(api());
        let reply = delete.perform(999).await.unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message.as_deref(), Some("order 999 no longer exists"));
    }

    #[tokio::test]
    async fn offline_service_fails_fetch() {
        let api = api().offline();
        assert!(matches!(
            api.fetch().await,
            Err(SourceError::Unavailable(_))
        ));
    }
}
