//! Shared database setup for integration tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use rollcall::adapters::sqlite::Migrator;

/// Create an in-memory database with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    Migrator::new(pool.clone())
        .run()
        .await
        .expect("failed to run migrations");

    pool
}

pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}
