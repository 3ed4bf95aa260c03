use sqlx::{Pool, Postgres};

use crate::storage::errors::StorageError;
use crate::storage::schema_validation::validate_postgres_table_schema;

// PostgreSQL implementations
pub(super) async fn create_table_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id VARCHAR(128) NOT NULL PRIMARY KEY,
            data TEXT NOT NULL,
            expiry BIGINT NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the session table schema matches what we expect
pub(super) async fn validate_table_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), StorageError> {
    let expected_columns = vec![
        ("id", "character varying"),
        ("data", "text"),
        ("expiry", "bigint"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, StorageError::Storage)
        .await
}

pub(super) async fn read_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
) -> Result<Option<String>, StorageError> {
    sqlx::query_scalar::<_, String>(&format!(
        r#"
        SELECT data FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))
}

pub(super) async fn insert_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
    data: &str,
    expiry: i64,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (id, data, expiry) VALUES ($1, $2, $3)
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

pub(super) async fn update_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
    data: &str,
    expiry: i64,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET data = $1, expiry = $2 WHERE id = $3
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

pub(super) async fn delete_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn gc_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    past: i64,
) -> Result<u64, StorageError> {
    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE expiry <= $1
        "#
    ))
    .bind(past)
    .execute(pool)
    .await
    .map_err(|e| StorageError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
