use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timebook_core::config::required;
use timebook_reconcile::ReconcileConfig;
use timebook_worker::{execute, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timebook_worker=info,timebook_reconcile=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let database_url = required("DATABASE_URL")?;
    let config = ReconcileConfig::from_env()?;

    let pool = timebook_db::create_pool(&database_url).await?;
    timebook_db::run_migrations(&pool).await?;
    tracing::info!(shards = config.shard_count.get(), "Database ready");

    let report = execute(cli.command, &pool, config).await?;
    println!("{report}");

    pool.close().await;
    Ok(())
}
