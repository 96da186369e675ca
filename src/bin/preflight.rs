//! Checks that the configured environment can serve traffic, without starting the server.

use storefront_catalog::infra::config::{Config, StoreBackend};
use storefront_catalog::infra::logging;
use storefront_catalog::storage::postgres;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--apply-schema]\n\
         \n\
         Reads the same env vars as api_server:\n\
           STORE_BACKEND, DATABASE_URL, BIND_ADDR, DB_MAX_CONNECTIONS,\n\
           DB_ACQUIRE_TIMEOUT_SECS, UPLOAD_DIR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let apply_schema = args.iter().any(|a| a == "--apply-schema");

    let config = Config::from_env()?;
    logging::init();

    tracing::info!(
        backend = ?config.store_backend,
        bind_addr = %config.bind_addr,
        upload_dir = %config.upload_dir.display(),
        "preflight"
    );

    // Upload spool must be writable.
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let probe = tempfile::Builder::new()
        .prefix("preflight-")
        .tempfile_in(&config.upload_dir)?;
    tokio::fs::write(probe.path(), b"ok").await?;
    tracing::info!("upload directory is writable");

    if config.store_backend == StoreBackend::Memory {
        tracing::info!("in-memory store selected; nothing else to check");
        return Ok(());
    }

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = postgres::connect(url, 1, config.db_acquire_timeout).await?;
    let version: String = sqlx::query_scalar("SELECT version()").fetch_one(&pool).await?;
    tracing::info!(%version, "database reachable");

    if apply_schema {
        postgres::ensure_schema(&pool).await?;
        tracing::info!("schema applied");
    } else {
        let present: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = current_schema()
               AND table_name IN ('categories', 'products', 'users', 'orders')",
        )
        .fetch_all(&pool)
        .await?;
        if present.len() < 4 {
            tracing::warn!(?present, "schema incomplete; rerun with --apply-schema or start api_server");
        } else {
            tracing::info!("schema present");
        }
    }

    tracing::info!("preflight OK");
    Ok(())
}
