use commerce_services::infra::{CatalogBackend, Config};
use sqlx::postgres::PgPoolOptions;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Checks configuration and database connectivity for api_server and catalog_server.\n\
         Reads env vars (or .env):\n\
           DATABASE_URL, API_BIND_ADDR, CATALOG_BIND_ADDR, CATALOG_STORE, DB_MAX_CONNECTIONS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if anything is malformed)
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  API_BIND_ADDR={}", config.api_bind_addr);
    println!("  CATALOG_BIND_ADDR={}", config.catalog_bind_addr);
    println!("  CATALOG_STORE={:?}", config.catalog_backend);
    println!("  DB_MAX_CONNECTIONS={}", config.max_connections);

    let database_url = match config.require_database_url() {
        Ok(url) => url,
        Err(e) if config.catalog_backend == CatalogBackend::Memory => {
            println!("  DATABASE_URL: not set ({}); only catalog_server with CATALOG_STORE=memory can run", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot connect to DATABASE_URL: {}", e))?;
    let version: String = sqlx::query_scalar("SELECT version()").fetch_one(&pool).await?;
    println!("  Postgres: {}", version);

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables
         WHERE table_schema = 'public' AND table_name IN ('products', 'users', 'orders', 'documents')
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await?;
    if tables.is_empty() {
        println!("  Tables: none yet (created on first server start)");
    } else {
        println!("  Tables: {}", tables.join(", "));
    }

    pool.close().await;
    println!("> Preflight OK");
    Ok(())
}
