//! PostgreSQL order repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};

use super::OrderStore;
use crate::models::{NewOrder, Order};

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, new_order: NewOrder) -> DatabaseResult<Order> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_order.user_id)
        .bind(new_order.product_id)
        .bind(new_order.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(Order {
            id: row.get("id"),
            user_id: new_order.user_id,
            product_id: new_order.product_id,
            quantity: new_order.quantity,
        })
    }
}
