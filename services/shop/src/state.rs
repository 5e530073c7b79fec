//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    jwt::JwtService,
    password::PasswordService,
    repositories::{MemoryStore, OrderRepository, ProductRepository, ProductStore, UserRepository},
    services::{AccountPolicy, AccountService, OrderService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when running against PostgreSQL; used by the health check
    pub db_pool: Option<PgPool>,
    pub accounts: AccountService,
    pub orders: OrderService,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    /// State backed by PostgreSQL repositories
    pub fn with_postgres(
        pool: PgPool,
        passwords: PasswordService,
        jwt_service: JwtService,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            accounts: AccountService::new(
                Arc::new(UserRepository::new(pool.clone())),
                passwords,
                jwt_service,
                policy,
            ),
            orders: OrderService::new(Arc::new(OrderRepository::new(pool.clone()))),
            products: Arc::new(ProductRepository::new(pool.clone())),
            db_pool: Some(pool),
        }
    }

    /// State backed by a single in-memory store
    pub fn with_memory(
        store: MemoryStore,
        passwords: PasswordService,
        jwt_service: JwtService,
        policy: AccountPolicy,
    ) -> Self {
        let store = Arc::new(store);
        Self {
            db_pool: None,
            accounts: AccountService::new(store.clone(), passwords, jwt_service, policy),
            orders: OrderService::new(store.clone()),
            products: store,
        }
    }
}
