use std::time::Duration;

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::application::ports::store_error::{StoreError, StoreResult};

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Begins a transaction on `pool`.
///
/// The returned guard rolls back when dropped without `commit()`, so a
/// cancelled caller never leaves the transaction open on a pooled connection.
/// When `statement_timeout` is set it applies to this transaction only.
pub async fn begin(
    pool: &PgPool,
    statement_timeout: Option<Duration>,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    if let Some(limit) = statement_timeout {
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", limit.as_millis()))
            .execute(&mut *tx)
            .await?;
    }
    Ok(tx)
}

/// Rolls back explicitly so the transaction is finished before the caller
/// reports its error.
pub async fn abort(
    tx: Transaction<'static, Postgres>,
    op: &'static str,
    id: Option<Uuid>,
) -> StoreResult<()> {
    tx.rollback().await.map_err(|e| StoreError::Persistence {
        op,
        id,
        source: e.into(),
    })
}

pub mod repositories;
