//! Schema creation for the items table

use sqlx::SqlitePool;

/// Create the `items` table if it does not exist.
///
/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running item migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) > 0),
            description TEXT,
            price REAL NOT NULL DEFAULT 0.0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Item migrations complete");
    Ok(())
}
