//! Order creation

use common::error::DatabaseError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    models::{NewOrder, Order},
    repositories::OrderStore,
    validation,
};

/// Order service errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to persist order: {0}")]
    Persistence(#[from] DatabaseError),
}

/// Order service
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    /// Create a new order service
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Persist an order as given. The user and product ids are not checked.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order, OrderError> {
        validation::validate_quantity(new_order.quantity).map_err(OrderError::Validation)?;

        info!(
            "Creating order: user {} product {} quantity {}",
            new_order.user_id, new_order.product_id, new_order.quantity
        );

        self.orders.create(new_order).await.map_err(|e| {
            error!("Failed to create order: {}", e);
            OrderError::Persistence(e)
        })
    }
}
