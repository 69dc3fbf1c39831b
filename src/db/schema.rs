//! Database schema definitions
//!
//! Every collection is a key/document table; the document is JSON text.

use rusqlite::Connection;
use super::DbError;

/// Collection holding one document per session
pub const SESSIONS_COLLECTION: &str = "sessions";

/// Collection names are spliced into SQL, so only plain identifiers pass
pub fn validate_collection_name(collection: &str) -> Result<(), DbError> {
    let mut chars = collection.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidCollection(collection.to_string()))
    }
}

/// SQL for a document collection table
fn collection_sql(collection: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {collection} (
    doc_key TEXT PRIMARY KEY,
    document TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);
"#
    )
}

/// Create a document collection table
pub fn create_collection(conn: &Connection, collection: &str) -> Result<(), DbError> {
    validate_collection_name(collection)?;
    conn.execute_batch(&collection_sql(collection))?;
    Ok(())
}
