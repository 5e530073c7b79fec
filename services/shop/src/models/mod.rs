//! Shop data models

pub mod order;
pub mod product;
pub mod user;

// Re-export for convenience
pub use order::{NewOrder, Order};
pub use product::Product;
pub use user::{NewUser, User, UserResponse};
