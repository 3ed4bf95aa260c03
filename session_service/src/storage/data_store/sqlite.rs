use sqlx::{Pool, Sqlite};

use crate::storage::errors::StorageError;
use crate::storage::schema_validation::validate_sqlite_table_schema;

// SQLite implementations
pub(super) async fn create_table_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT NOT NULL PRIMARY KEY,
            data TEXT NOT NULL,
            expiry INTEGER NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the session table schema matches what we expect
pub(super) async fn validate_table_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), StorageError> {
    let expected_columns = vec![("id", "TEXT"), ("data", "TEXT"), ("expiry", "INTEGER")];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, StorageError::Storage).await
}

pub(super) async fn read_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
) -> Result<Option<String>, StorageError> {
    sqlx::query_scalar::<_, String>(&format!(
        r#"
        SELECT data FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))
}

pub(super) async fn insert_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
    data: &str,
    expiry: i64,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, data, expiry) VALUES (?, ?, ?)
        "#
    ))
    .bind(id)
    .bind(data)
    .bind(expiry)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn update_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
    data: &str,
    expiry: i64,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET data = ?, expiry = ? WHERE id = ?
        "#
    ))
    .bind(data)
    .bind(expiry)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn delete_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn gc_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    past: i64,
) -> Result<u64, StorageError> {
    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE expiry <= ?
        "#
    ))
    .bind(past)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
