use crate::error::AppError;
use deadpool_postgres::tokio_postgres::{Config as PgConfig, NoTls};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use std::time::Duration;
use tracing::info;

const SCHEMA: &str = include_str!("../migrations/schema.sql");

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn init_pool(database_url: &str) -> Result<Pool, AppError> {
    let pg_config: PgConfig = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| AppError::Config(format!("DATABASE_URL: {e}")))?;

    let mgr = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    let pool = Pool::builder(mgr)
        .max_size(16)
        .build()
        .map_err(|e| AppError::StartServer(format!("build pool: {e}")))?;

    // Verify connectivity and apply the schema before serving traffic.
    tokio::time::timeout(CONNECT_TIMEOUT, async {
        let client = pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok::<(), AppError>(())
    })
    .await
    .map_err(|_| AppError::StartServer("database connect timeout".into()))??;

    info!("database pool ready");
    Ok(pool)
}
