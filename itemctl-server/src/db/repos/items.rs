//! Item repository
//!
//! One statement per operation. Insert and update use `RETURNING` so the
//! handler gets the stored row back without a second query.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::models::{ItemPatch, NewItem};

/// Item record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    fn item_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "item",
            id: id.to_string(),
        }
    }
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every item, oldest id first.
    pub async fn list(&self) -> Result<Vec<Item>, DbError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM items
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Get a single item by id.
    pub async fn get(&self, id: i64) -> Result<Item, DbError> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::item_not_found(id))
    }

    /// Insert a new item. Both timestamps are set to the same instant.
    pub async fn create(&self, input: NewItem) -> Result<Item, DbError> {
        let now = Utc::now();

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, description, price, created_at, updated_at
            "#,
        )
        .bind(input.name.into_string())
        .bind(input.description)
        .bind(input.price)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a patch to the stored row.
    ///
    /// Only columns present in the patch are written, so concurrent updates
    /// of different fields do not overwrite each other. `updated_at` is
    /// refreshed even when the patch is empty, and never moves backwards
    /// past the stored value. Timestamps are UTC RFC 3339 text with a fixed
    /// offset, so `MAX` on the text orders them chronologically.
    pub async fn update(&self, id: i64, patch: ItemPatch) -> Result<Item, DbError> {
        let (description_set, description) = match patch.description {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = COALESCE(?, name),
                description = CASE WHEN ? THEN ? ELSE description END,
                price = COALESCE(?, price),
                updated_at = MAX(updated_at, ?)
            WHERE id = ?
            RETURNING id, name, description, price, created_at, updated_at
            "#,
        )
        .bind(patch.name.map(|n| n.into_string()))
        .bind(description_set)
        .bind(description)
        .bind(patch.price)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::item_not_found(id))
    }

    /// Delete an item permanently.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::item_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, migrations};
    use crate::models::ItemName;

    async fn setup() -> SqlitePool {
        let pool = create_memory_pool().await.expect("pool");
        migrations::run(&pool).await.expect("migrations");
        pool
    }

    fn widget() -> NewItem {
        NewItem {
            name: ItemName::new("Widget").unwrap(),
            description: Some(String::new()),
            price: 9.99,
        }
    }

    #[tokio::test]
    async fn create_sets_matching_timestamps() {
        let pool = setup().await;
        let item = ItemRepo::new(&pool).create(widget()).await.unwrap();

        assert_eq!(item.name, "Widget");
        assert_eq!(item.description.as_deref(), Some(""));
        assert_eq!(item.price, 9.99);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[tokio::test]
    async fn get_returns_stored_row() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let pool = setup().await;
        let err = ItemRepo::new(&pool).get(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "item", .. }));
    }

    #[tokio::test]
    async fn list_orders_by_id() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let a = repo.create(widget()).await.unwrap();
        let b = repo.create(widget()).await.unwrap();

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn update_applies_only_patched_fields() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let patch = ItemPatch {
            price: Some(5.0),
            ..ItemPatch::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let patch = ItemPatch {
            description: Some(None),
            ..ItemPatch::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn update_of_deleted_row_is_not_found() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();
        repo.delete(created.id).await.unwrap();

        let err = repo
            .update(created.id, ItemPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn disjoint_updates_keep_each_other() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let rename = ItemPatch {
            name: Some(ItemName::new("Renamed").unwrap()),
            ..ItemPatch::default()
        };
        repo.update(created.id, rename).await.unwrap();

        let reprice = ItemPatch {
            price: Some(5.0),
            ..ItemPatch::default()
        };
        let updated = repo.update(created.id, reprice).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn concurrent_disjoint_updates_both_land() {
        let dir = tempfile::tempdir().unwrap();
        let pool = crate::db::create_pool(&dir.path().join("items.db"))
            .await
            .unwrap();
        migrations::run(&pool).await.unwrap();
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let rename = ItemPatch {
            name: Some(ItemName::new("Renamed").unwrap()),
            ..ItemPatch::default()
        };
        let clear = ItemPatch {
            description: Some(None),
            ..ItemPatch::default()
        };
        let (a, b) = tokio::join!(repo.update(created.id, rename), repo.update(created.id, clear));
        a.unwrap();
        b.unwrap();

        let stored = repo.get(created.id).await.unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.description, None);
        assert_eq!(stored.price, created.price);
    }

    #[tokio::test]
    async fn updated_at_never_moves_backwards() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        let future = Utc::now() + chrono::Duration::hours(1);
        sqlx::query("UPDATE items SET updated_at = ? WHERE id = ?")
            .bind(future)
            .bind(created.id)
            .execute(&pool)
            .await
            .unwrap();

        let updated = repo.update(created.id, ItemPatch::default()).await.unwrap();
        assert_eq!(updated.updated_at, future);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let created = repo.create(widget()).await.unwrap();

        repo.delete(created.id).await.unwrap();
        let err = repo.delete(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let pool = setup().await;
        let repo = ItemRepo::new(&pool);
        let first = repo.create(widget()).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(widget()).await.unwrap();
        assert!(second.id > first.id);
    }
}
