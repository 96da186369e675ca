//! Postgres-backed repositories.
//!
//! Tables are created on startup with `CREATE TABLE IF NOT EXISTS`; there is no
//! foreign key between `products.category` and `categories.id`, or between
//! `orders.products` and `products.id`, so deletes never cascade.

pub mod category;
pub mod order;
pub mod product;

pub use category::PgCategoryRepository;
pub use order::PgOrderRepository;
pub use product::PgProductRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Opens a pool against `database_url`.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Creates the catalog, order and user tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            category UUID NOT NULL,
            quantity BIGINT NOT NULL,
            photo_data BYTEA,
            photo_content_type TEXT,
            shipping BOOLEAN NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS products_created_at_idx ON products (created_at DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS products_category_idx ON products (category)")
        .execute(pool)
        .await?;

    // Owned by the auth subsystem; only `name` is read here, to populate order buyers.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            products UUID[] NOT NULL DEFAULT '{}',
            payment JSONB NOT NULL DEFAULT '{}'::jsonb,
            buyer UUID NOT NULL,
            status TEXT NOT NULL DEFAULT 'Not Process'
                CHECK (status IN ('Not Process', 'Processing', 'Shipped', 'deliverd', 'cancel')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
