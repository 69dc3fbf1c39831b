//! Document query implementations
//!
//! Contains functions for reading and writing documents in a collection

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde_json::Value;
use super::schema::validate_collection_name;
use super::DbError;

/// Insert a new document
pub fn insert_document(
    conn: &Connection,
    collection: &str,
    key: &str,
    document: &Value,
) -> Result<(), DbError> {
    validate_collection_name(collection)?;
    let body = serde_json::to_string(document)?;

    let result = conn.execute(
        &format!("INSERT INTO {collection} (doc_key, document) VALUES (?1, ?2)"),
        params![key, body],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(DbError::DuplicateKey(key.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a single document by key
pub fn get_document(
    conn: &Connection,
    collection: &str,
    key: &str,
) -> Result<Option<Value>, DbError> {
    validate_collection_name(collection)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT document FROM {collection} WHERE doc_key = ?1"
    ))?;

    let body = stmt
        .query_row(params![key], |row| row.get::<_, String>(0))
        .optional()?;

    match body {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

/// Overwrite an existing document by key
pub fn replace_document(
    conn: &Connection,
    collection: &str,
    key: &str,
    document: &Value,
) -> Result<(), DbError> {
    validate_collection_name(collection)?;
    let body = serde_json::to_string(document)?;

    let updated = conn.execute(
        &format!(
            r#"
            UPDATE {collection}
            SET document = ?2, updated_at = CURRENT_TIMESTAMP
            WHERE doc_key = ?1
            "#
        ),
        params![key, body],
    )?;

    if updated == 0 {
        return Err(DbError::MissingKey(key.to_string()));
    }
    Ok(())
}

/// Delete a document, returning whether a row was removed
pub fn delete_document(conn: &Connection, collection: &str, key: &str) -> Result<bool, DbError> {
    validate_collection_name(collection)?;
    let deleted = conn.execute(
        &format!("DELETE FROM {collection} WHERE doc_key = ?1"),
        params![key],
    )?;
    Ok(deleted > 0)
}

/// Get all document keys in insertion order
pub fn get_document_keys(conn: &Connection, collection: &str) -> Result<Vec<String>, DbError> {
    validate_collection_name(collection)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT doc_key FROM {collection} ORDER BY rowid"
    ))?;

    let keys = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(keys)
}
