//! Schema bootstrap for the shop database

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

const CREATE_TABLES: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price BIGINT NOT NULL
    )
    "#,
    // No foreign keys: orders may point at users or products that do not exist.
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        product_id BIGINT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0)
    )
    "#,
];

/// Statements creating the schema, in execution order
pub fn schema_statements(unique_usernames: bool) -> Vec<&'static str> {
    let username_index = if unique_usernames {
        "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)"
    } else {
        "CREATE INDEX IF NOT EXISTS users_username_idx ON users (username)"
    };

    CREATE_TABLES
        .iter()
        .copied()
        .chain(std::iter::once(username_index))
        .collect()
}

/// Create the tables if they are missing
pub async fn ensure_schema(pool: &PgPool, unique_usernames: bool) -> DatabaseResult<()> {
    info!("Ensuring database schema");

    for statement in schema_statements(unique_usernames) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    Ok(())
}
