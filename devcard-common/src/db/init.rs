//! Database initialization
//!
//! The store is a single SQLite file with one table. There is no pool: every
//! operation opens its own connection and closes it before returning.

use crate::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::path::Path;
use tracing::debug;

/// Open a fresh connection, creating the database file if needed
pub async fn open_connection(db_path: &Path) -> Result<SqliteConnection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let conn = SqliteConnection::connect_with(&options).await?;
    debug!("Opened connection to {}", db_path.display());
    Ok(conn)
}

/// Create the pupils table (idempotent)
///
/// Columns: auto-increment id, identity fields, and eleven nullable score
/// slots `df1`..`df11`. Layout matches databases written by earlier releases.
pub async fn create_pupils_table(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pupils (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            surname TEXT,
            name TEXT,
            patronymic TEXT,
            birth_date DATE,
            df1 INTEGER,
            df2 INTEGER,
            df3 INTEGER,
            df4 INTEGER,
            df5 INTEGER,
            df6 INTEGER,
            df7 INTEGER,
            df8 INTEGER,
            df9 INTEGER,
            df10 INTEGER,
            df11 INTEGER
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}
