//! Business logic behind the HTTP handlers

pub mod account;
pub mod order;

pub use account::{AccessToken, AccountError, AccountPolicy, AccountService};
pub use order::{OrderError, OrderService};
