//! Database query operations.
//!
//! Each submodule groups the queries for one table.

pub mod image_records;
