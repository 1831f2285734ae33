//! Wishlist queries
//!
//! Wishlist entries are independent of the bean collection; there is no
//! promotion path from wishlist to collection.

use crate::error::{Error, Result};
use crate::models::{NewWishlistBean, WishlistBean, WishlistBeanPatch};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// List all wishlist entries, oldest first
pub async fn list_wishlist(db: &Pool<Sqlite>) -> Result<Vec<WishlistBean>> {
    let rows = sqlx::query(
        "SELECT id, name, roaster, notes, created_at, updated_at
         FROM wishlist_beans ORDER BY created_at, id",
    )
    .fetch_all(db)
    .await?;

    rows.iter().map(wishlist_from_row).collect()
}

/// Fetch one wishlist entry by id
pub async fn get_wishlist_bean(db: &Pool<Sqlite>, id: Uuid) -> Result<WishlistBean> {
    let row = sqlx::query(
        "SELECT id, name, roaster, notes, created_at, updated_at
         FROM wishlist_beans WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("wishlist bean {}", id)))?;

    wishlist_from_row(&row)
}

/// Create a wishlist entry
pub async fn create_wishlist_bean(
    db: &Pool<Sqlite>,
    new: NewWishlistBean,
) -> Result<WishlistBean> {
    let now = Utc::now();
    let bean = WishlistBean {
        id: new.id.unwrap_or_else(Uuid::new_v4),
        name: new.name,
        roaster: new.roaster,
        notes: new.notes,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO wishlist_beans (id, name, roaster, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(bean.id.to_string())
    .bind(&bean.name)
    .bind(&bean.roaster)
    .bind(&bean.notes)
    .bind(bean.created_at.to_rfc3339())
    .bind(bean.updated_at.to_rfc3339())
    .execute(db)
    .await?;

    Ok(bean)
}

/// Apply a partial update and return the updated entry
pub async fn update_wishlist_bean(
    db: &Pool<Sqlite>,
    id: Uuid,
    patch: WishlistBeanPatch,
) -> Result<WishlistBean> {
    let mut bean = get_wishlist_bean(db, id).await?;

    if let Some(name) = patch.name {
        bean.name = name;
    }
    if let Some(roaster) = patch.roaster {
        bean.roaster = roaster;
    }
    if let Some(notes) = patch.notes {
        bean.notes = Some(notes);
    }
    bean.updated_at = Utc::now();

    sqlx::query(
        "UPDATE wishlist_beans SET name = ?, roaster = ?, notes = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&bean.name)
    .bind(&bean.roaster)
    .bind(&bean.notes)
    .bind(bean.updated_at.to_rfc3339())
    .bind(id.to_string())
    .execute(db)
    .await?;

    Ok(bean)
}

/// Delete a wishlist entry by id
pub async fn delete_wishlist_bean(db: &Pool<Sqlite>, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM wishlist_beans WHERE id = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("wishlist bean {}", id)));
    }

    Ok(())
}

fn wishlist_from_row(row: &SqliteRow) -> Result<WishlistBean> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(WishlistBean {
        id: Uuid::parse_str(&id).map_err(|e| Error::Internal(format!("Invalid stored id: {}", e)))?,
        name: row.get("name"),
        roaster: row.get("roaster"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_database;
    use tempfile::TempDir;

    async fn setup_test_db() -> (TempDir, Pool<Sqlite>) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("test.db")).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_wishlist_crud_cycle() {
        let (_dir, db) = setup_test_db().await;

        let created = create_wishlist_bean(
            &db,
            NewWishlistBean {
                id: None,
                name: "Kochere".to_string(),
                roaster: "Counter Culture".to_string(),
                notes: Some("Heard good things".to_string()),
            },
        )
        .await
        .unwrap();

        let listed = list_wishlist(&db).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let updated = update_wishlist_bean(
            &db,
            created.id,
            WishlistBeanPatch {
                notes: Some("Back in stock".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Back in stock"));
        assert_eq!(updated.name, "Kochere");

        delete_wishlist_bean(&db, created.id).await.unwrap();
        assert!(list_wishlist(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_notes_optional() {
        let (_dir, db) = setup_test_db().await;

        let created = create_wishlist_bean(
            &db,
            NewWishlistBean {
                id: None,
                name: "Hair Bender".to_string(),
                roaster: "Stumptown".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

        let fetched = get_wishlist_bean(&db, created.id).await.unwrap();
        assert_eq!(fetched.notes, None);
    }

    #[tokio::test]
    async fn test_wishlist_missing_id_not_found() {
        let (_dir, db) = setup_test_db().await;

        assert!(matches!(
            get_wishlist_bean(&db, Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete_wishlist_bean(&db, Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
    }
}
