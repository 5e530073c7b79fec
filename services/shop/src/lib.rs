//! Shop backend: signup, login with bearer tokens, and order creation.
//!
//! The crate is split the same way requests flow through it: [`routes`] maps
//! HTTP onto the [`services`], which use [`password`] and [`jwt`] for
//! credentials and the [`repositories`] for storage.

pub mod database;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
