//! Image record database queries.
//!
//! This module provides the insert, lookup, update and listing operations
//! for uploaded image records.

use chrono::{DateTime, Utc};
use mintari_common::{Error, ImageRecordId, Result};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::models::ImageRecord;

/// Parse an image record from a database row.
///
/// Expects columns in order: id, original_reference, transformed_reference, created_at.
fn parse_record_row(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    let id: String = row.get(0)?;
    let id = id
        .parse::<ImageRecordId>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let created_at: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(ImageRecord {
        id,
        original_reference: row.get(1)?,
        transformed_reference: row.get(2)?,
        created_at,
    })
}

/// Insert a new image record for a stored original.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `original_reference` - Media-root-relative path of the stored upload
///
/// # Returns
///
/// * `Ok(ImageRecord)` - The created record, with no transformed reference yet
/// * `Err(Error)` - If the reference is empty or a database error occurs
pub fn insert_record(conn: &Connection, original_reference: &str) -> Result<ImageRecord> {
    if original_reference.trim().is_empty() {
        return Err(Error::invalid_input("original reference must not be empty"));
    }

    let record = ImageRecord {
        id: ImageRecordId::new(),
        original_reference: original_reference.to_string(),
        transformed_reference: None,
        created_at: Utc::now(),
    };

    conn.execute(
        "INSERT INTO image_records (id, original_reference, transformed_reference, created_at)
         VALUES (:id, :original_reference, NULL, :created_at)",
        rusqlite::named_params! {
            ":id": record.id.to_string(),
            ":original_reference": &record.original_reference,
            ":created_at": record.created_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(record)
}

/// Get an image record by ID.
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The record if found
/// * `Ok(None)` - If the record does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_record(conn: &Connection, id: ImageRecordId) -> Result<Option<ImageRecord>> {
    let result = conn.query_row(
        "SELECT id, original_reference, transformed_reference, created_at
         FROM image_records WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_record_row,
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Set the transformed reference of a record.
///
/// The reference can only be set once; a record that already has one is left
/// untouched and the call fails with [`Error::Conflict`].
///
/// # Returns
///
/// * `Ok(ImageRecord)` - The updated record
/// * `Err(Error::NotFound)` - If the record does not exist
/// * `Err(Error::Conflict)` - If the record was already transformed
/// * `Err(Error)` - If a database error occurs
pub fn set_transformed_reference(
    conn: &Connection,
    id: ImageRecordId,
    transformed_reference: &str,
) -> Result<ImageRecord> {
    if transformed_reference.trim().is_empty() {
        return Err(Error::invalid_input("transformed reference must not be empty"));
    }

    let updated = conn
        .execute(
            "UPDATE image_records
             SET transformed_reference = :transformed_reference
             WHERE id = :id AND transformed_reference IS NULL",
            rusqlite::named_params! {
                ":id": id.to_string(),
                ":transformed_reference": transformed_reference,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let record = get_record(conn, id)?
        .ok_or_else(|| Error::not_found(format!("image record {}", id)))?;

    if updated == 0 {
        return Err(Error::conflict(format!(
            "image record {} already has a transformed image",
            id
        )));
    }

    Ok(record)
}

/// List records, newest first.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `limit` - Maximum number of records to return
pub fn list_records(conn: &Connection, limit: u32) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, original_reference, transformed_reference, created_at
             FROM image_records
             ORDER BY created_at DESC, rowid DESC
             LIMIT :limit",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let records = stmt
        .query_map(rusqlite::named_params! { ":limit": limit }, parse_record_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(records)
}
