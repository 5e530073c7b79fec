//! Storage traits and their implementations

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{NewOrder, NewUser, Order, Product, User};

pub mod memory;
pub mod order;
pub mod product;
pub mod user;

pub use memory::MemoryStore;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

/// Storage of user records
///
/// `create` must reject a duplicate email with
/// [`DatabaseError::UniqueViolation`](common::error::DatabaseError::UniqueViolation).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find the oldest user with this username
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    /// Insert a new user and return it with its assigned id
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User>;
}

/// Storage of order records
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order and return it with its assigned id
    async fn create(&self, new_order: NewOrder) -> DatabaseResult<Order>;
}

/// Read access to product records
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// List every product, ordered by id
    async fn list(&self) -> DatabaseResult<Vec<Product>>;
}
