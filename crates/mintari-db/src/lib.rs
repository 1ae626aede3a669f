//! Mintari-DB: Database schema, migrations, and query operations
//!
//! This crate persists image records in SQLite using rusqlite with r2d2
//! connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use mintari_db::pool::{init_pool, get_conn};
//! use mintari_db::queries::image_records;
//!
//! let pool = init_pool("/var/lib/mintari/mintari.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let record = image_records::insert_record(&conn, "uploads/originals/A.png").unwrap();
//! println!("Created record: {}", record.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
