//! Product model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Product entity. Products are loaded out of band; the API only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit
    pub price: i64,
}
