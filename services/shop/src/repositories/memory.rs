//! In-memory storage
//!
//! Mirrors the constraints of the PostgreSQL schema: unique emails, and unique
//! usernames when enabled. Nothing is persisted across restarts.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{OrderStore, ProductStore, UserStore};
use crate::models::{NewOrder, NewUser, Order, Product, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    orders: Vec<Order>,
    products: Vec<Product>,
}

/// Store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    unique_usernames: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(unique_usernames: bool) -> Self {
        Self {
            tables: Arc::default(),
            unique_usernames,
        }
    }

    /// Add a product; the API itself never creates them
    pub async fn insert_product(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Product {
        let mut tables = self.tables.lock().await;
        let product = Product {
            id: next_id(tables.products.len()),
            name: name.into(),
            description: description.into(),
            price,
        };
        tables.products.push(product.clone());
        product
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |n| n + 1)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation {
                constraint: "users_email_key".to_string(),
            });
        }
        if self.unique_usernames && tables.users.iter().any(|u| u.username == new_user.username)
        {
            return Err(DatabaseError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            });
        }

        let user = User {
            id: next_id(tables.users.len()),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create(&self, new_order: NewOrder) -> DatabaseResult<Order> {
        let mut tables = self.tables.lock().await;
        let order = Order {
            id: next_id(tables.orders.len()),
            user_id: new_order.user_id,
            product_id: new_order.product_id,
            quantity: new_order.quantity,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> DatabaseResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables.products.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let store = MemoryStore::new(true);
        let first = UserStore::create(&store, new_user("alice", "alice@x.com"))
            .await
            .unwrap();
        let second = UserStore::create(&store, new_user("bob", "bob@x.com"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new(false);
        UserStore::create(&store, new_user("alice", "alice@x.com"))
            .await
            .unwrap();

        let err = UserStore::create(&store, new_user("other", "alice@x.com"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_username_uniqueness_follows_flag() {
        let relaxed = MemoryStore::new(false);
        UserStore::create(&relaxed, new_user("alice", "a1@x.com"))
            .await
            .unwrap();
        UserStore::create(&relaxed, new_user("alice", "a2@x.com"))
            .await
            .unwrap();
        let found = relaxed.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.email, "a1@x.com");

        let strict = MemoryStore::new(true);
        UserStore::create(&strict, new_user("alice", "a1@x.com"))
            .await
            .unwrap();
        let err = UserStore::create(&strict, new_user("alice", "a2@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::UniqueViolation { constraint } if constraint == "users_username_key"
        ));
    }

    #[tokio::test]
    async fn test_products_are_listed_in_insert_order() {
        let store = MemoryStore::new(true);
        store.insert_product("Mug", "Ceramic", 1299).await;
        store.insert_product("Tee", "Cotton", 2500).await;

        let products = store.list().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[1].name, "Tee");
    }
}
