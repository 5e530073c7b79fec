//! Order model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Order entity
///
/// `user_id` and `product_id` are stored as given; nothing checks that the
/// referenced rows exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

/// New order creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}
