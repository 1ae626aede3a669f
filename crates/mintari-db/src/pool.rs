//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use mintari_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Set up connection pooling with r2d2
/// - Enable foreign key constraints on all connections
/// - Run pending database migrations
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(DbPool)` - Initialized connection pool
/// * `Err(Error)` - If pool creation or migration fails
///
/// # Example
///
/// ```no_run
/// use mintari_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/mintari/mintari.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
    });

    build_and_migrate(manager)
}

/// Initialize an in-memory database pool for testing.
///
/// Every connection in the pool opens the same uniquely named shared-cache
/// in-memory database, so rows written through one pooled connection are
/// visible through the others. The database is lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use mintari_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let uri = format!(
        "file:mintari-{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    build_and_migrate(manager)
}

fn build_and_migrate(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
///
/// # Example
///
/// ```
/// use mintari_db::pool::{init_memory_pool, get_conn};
///
/// let pool = init_memory_pool().unwrap();
/// let conn = get_conn(&pool).unwrap();
/// ```
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), POOL_SIZE);
    }

    #[test]
    fn test_get_conn() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_multiple_connections() {
        let pool = init_memory_pool().unwrap();

        let _conn1 = get_conn(&pool).unwrap();
        let _conn2 = get_conn(&pool).unwrap();
        let _conn3 = get_conn(&pool).unwrap();

        assert!(get_conn(&pool).is_ok());
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='image_records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_connections_share_one_database() {
        let pool = init_memory_pool().unwrap();

        let writer = get_conn(&pool).unwrap();
        writer
            .execute(
                "INSERT INTO image_records (id, original_reference, created_at) VALUES (?, ?, ?)",
                rusqlite::params!["test-id", "uploads/originals/A.png", "2026-01-01T00:00:00Z"],
            )
            .unwrap();

        // Hold the first connection so the pool has to hand out another one.
        let reader = get_conn(&pool).unwrap();
        let reference: String = reader
            .query_row(
                "SELECT original_reference FROM image_records WHERE id = ?",
                ["test-id"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(reference, "uploads/originals/A.png");
        drop(writer);
    }

    #[test]
    fn test_memory_pools_are_isolated() {
        let first = init_memory_pool().unwrap();
        let second = init_memory_pool().unwrap();

        get_conn(&first)
            .unwrap()
            .execute(
                "INSERT INTO image_records (id, original_reference, created_at) VALUES (?, ?, ?)",
                rusqlite::params!["only-here", "uploads/originals/A.png", "2026-01-01T00:00:00Z"],
            )
            .unwrap();

        let count: i64 = get_conn(&second)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM image_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
