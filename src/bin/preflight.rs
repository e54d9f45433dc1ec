use storefront_api::infra::logging::init_tracing;
use storefront_api::storage::schema::managed_tables;
use storefront_api::{Config, PostgresStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--migrate]\n\
         \n\
         Requires env vars:\n\
           JWT_SECRET\n\
         Optional:\n\
           DATABASE_URL (checked for connectivity; --migrate creates tables),\n\
           BIND_ADDR, TOKEN_TTL_SECS, PASSWORD_HASH_MEMORY_KIB, PASSWORD_HASH_ITERATIONS,\n\
           GRAPHQL_MAX_DEPTH, GRAPHQL_MAX_COMPLEXITY\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let migrate = args.iter().any(|a| a == "--migrate");

    // Force-read config (nice error messages if missing)
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!(
        "  TOKEN_TTL={}",
        config
            .auth
            .token_ttl
            .map(|ttl| format!("{}s", ttl.num_seconds()))
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "  PASSWORD_HASH cost: {} KiB, {} iterations",
        config.auth.hash_cost.memory_kib, config.auth.hash_cost.iterations
    );
    println!(
        "  GraphQL limits: depth {}, complexity {}",
        config.graphql.max_depth, config.graphql.max_complexity
    );

    // Hash parameters are validated by building a hasher once.
    storefront_api::crypto::PasswordHasher::new(config.auth.hash_cost)?;
    println!("  Password hash parameters are valid.");

    let Some(db) = &config.database else {
        println!("  DATABASE_URL not set: the server will use the in-memory store.");
        println!("> Preflight OK.");
        return Ok(());
    };

    let store = PostgresStore::connect(&db.url, 1).await?;
    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(store.pool())
        .await?;
    println!("  Database reachable: {}", version);

    if migrate {
        store.migrate().await?;
        println!("  Tables created (or already present).");
    }

    for table in managed_tables() {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables
             WHERE table_schema = 'public' AND table_name = $1)",
        )
        .bind(table.table_name())
        .fetch_one(store.pool())
        .await?;
        if exists {
            println!("  Table {} present.", table.table_name());
        } else if !migrate {
            return Err(anyhow::anyhow!(
                "Table {} does not exist. Re-run with --migrate",
                table.table_name()
            ));
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
