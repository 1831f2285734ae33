//! Coffee bean collection queries
//!
//! Note lists are stored as one serialized JSON string column and the
//! order-again flag as 0/1, decoded back into the canonical model on read.
//! Rank is clamped to 0-5 and duplicate notes dropped on every write.

use crate::error::{Error, Result};
use crate::models::{clamp_rank, dedupe_notes, CoffeeBean, CoffeeBeanPatch, NewCoffeeBean};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

const BEAN_COLUMNS: &str = "id, name, roaster, origin, roast_level, notes, general_notes, rank, \
     grams_in, ml_out, brew_time, temperature, grind_size, price, weight, \
     order_again, purchase_count, created_at, updated_at";

/// List the whole collection, oldest first
pub async fn list_beans(db: &Pool<Sqlite>) -> Result<Vec<CoffeeBean>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM coffee_beans ORDER BY created_at, id",
        BEAN_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    rows.iter().map(bean_from_row).collect()
}

/// Fetch one bean by id
pub async fn get_bean(db: &Pool<Sqlite>, id: Uuid) -> Result<CoffeeBean> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM coffee_beans WHERE id = ?",
        BEAN_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("coffee bean {}", id)))?;

    bean_from_row(&row)
}

/// Create a bean; assigns the id and timestamps unless the caller
/// supplied an id (the local JSON API allows client-generated ids)
pub async fn create_bean(db: &Pool<Sqlite>, new: NewCoffeeBean) -> Result<CoffeeBean> {
    let now = Utc::now();
    let bean = CoffeeBean {
        id: new.id.unwrap_or_else(Uuid::new_v4),
        name: new.name,
        roaster: new.roaster,
        origin: new.origin,
        roast_level: new.roast_level,
        notes: dedupe_notes(new.notes),
        general_notes: new.general_notes,
        rank: clamp_rank(new.rank),
        grams_in: new.grams_in,
        ml_out: new.ml_out,
        brew_time: new.brew_time,
        temperature: new.temperature,
        grind_size: new.grind_size,
        price: new.price,
        weight: new.weight,
        order_again: new.order_again,
        purchase_count: new.purchase_count.max(0),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO coffee_beans (
            id, name, roaster, origin, roast_level, notes, general_notes, rank,
            grams_in, ml_out, brew_time, temperature, grind_size, price, weight,
            order_again, purchase_count, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(bean.id.to_string())
    .bind(&bean.name)
    .bind(&bean.roaster)
    .bind(&bean.origin)
    .bind(&bean.roast_level)
    .bind(serde_json::to_string(&bean.notes)?)
    .bind(&bean.general_notes)
    .bind(bean.rank)
    .bind(bean.grams_in)
    .bind(bean.ml_out)
    .bind(bean.brew_time)
    .bind(bean.temperature)
    .bind(bean.grind_size)
    .bind(bean.price)
    .bind(bean.weight)
    .bind(bean.order_again as i64)
    .bind(bean.purchase_count)
    .bind(bean.created_at.to_rfc3339())
    .bind(bean.updated_at.to_rfc3339())
    .execute(db)
    .await?;

    Ok(bean)
}

/// Apply a partial update (any subset of non-id fields) and return the
/// updated record
pub async fn update_bean(
    db: &Pool<Sqlite>,
    id: Uuid,
    patch: CoffeeBeanPatch,
) -> Result<CoffeeBean> {
    let mut bean = get_bean(db, id).await?;

    if let Some(name) = patch.name {
        bean.name = name;
    }
    if let Some(roaster) = patch.roaster {
        bean.roaster = roaster;
    }
    if let Some(origin) = patch.origin {
        bean.origin = origin;
    }
    if let Some(roast_level) = patch.roast_level {
        bean.roast_level = roast_level;
    }
    if let Some(notes) = patch.notes {
        bean.notes = dedupe_notes(notes);
    }
    if let Some(general_notes) = patch.general_notes {
        bean.general_notes = general_notes;
    }
    if let Some(rank) = patch.rank {
        bean.rank = clamp_rank(rank);
    }
    if let Some(grams_in) = patch.grams_in {
        bean.grams_in = grams_in;
    }
    if let Some(ml_out) = patch.ml_out {
        bean.ml_out = ml_out;
    }
    if let Some(brew_time) = patch.brew_time {
        bean.brew_time = brew_time;
    }
    if let Some(temperature) = patch.temperature {
        bean.temperature = temperature;
    }
    if let Some(grind_size) = patch.grind_size {
        bean.grind_size = grind_size;
    }
    if let Some(price) = patch.price {
        bean.price = price;
    }
    if let Some(weight) = patch.weight {
        bean.weight = weight;
    }
    if let Some(order_again) = patch.order_again {
        bean.order_again = order_again;
    }
    if let Some(purchase_count) = patch.purchase_count {
        bean.purchase_count = purchase_count.max(0);
    }
    bean.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE coffee_beans SET
            name = ?, roaster = ?, origin = ?, roast_level = ?, notes = ?,
            general_notes = ?, rank = ?, grams_in = ?, ml_out = ?, brew_time = ?,
            temperature = ?, grind_size = ?, price = ?, weight = ?,
            order_again = ?, purchase_count = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&bean.name)
    .bind(&bean.roaster)
    .bind(&bean.origin)
    .bind(&bean.roast_level)
    .bind(serde_json::to_string(&bean.notes)?)
    .bind(&bean.general_notes)
    .bind(bean.rank)
    .bind(bean.grams_in)
    .bind(bean.ml_out)
    .bind(bean.brew_time)
    .bind(bean.temperature)
    .bind(bean.grind_size)
    .bind(bean.price)
    .bind(bean.weight)
    .bind(bean.order_again as i64)
    .bind(bean.purchase_count)
    .bind(bean.updated_at.to_rfc3339())
    .bind(id.to_string())
    .execute(db)
    .await?;

    Ok(bean)
}

/// Delete a bean by id
pub async fn delete_bean(db: &Pool<Sqlite>, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM coffee_beans WHERE id = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("coffee bean {}", id)));
    }

    Ok(())
}

/// Record a repeat purchase by incrementing the purchase count
pub async fn record_repurchase(db: &Pool<Sqlite>, id: Uuid) -> Result<CoffeeBean> {
    let result = sqlx::query(
        "UPDATE coffee_beans SET purchase_count = purchase_count + 1, updated_at = ? WHERE id = ?",
    )
    .bind(Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("coffee bean {}", id)));
    }

    get_bean(db, id).await
}

/// Decode one database row into the canonical model
fn bean_from_row(row: &SqliteRow) -> Result<CoffeeBean> {
    let id: String = row.get("id");
    let notes_json: String = row.get("notes");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    let order_again: i64 = row.get("order_again");

    Ok(CoffeeBean {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        roaster: row.get("roaster"),
        origin: row.get("origin"),
        roast_level: row.get("roast_level"),
        notes: serde_json::from_str(&notes_json)?,
        general_notes: row.get("general_notes"),
        rank: row.get("rank"),
        grams_in: row.get("grams_in"),
        ml_out: row.get("ml_out"),
        brew_time: row.get("brew_time"),
        temperature: row.get("temperature"),
        grind_size: row.get("grind_size"),
        price: row.get("price"),
        weight: row.get("weight"),
        order_again: order_again != 0,
        purchase_count: row.get("purchase_count"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Invalid stored id: {}", e)))
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

    fn new_bean(name: &str) -> NewCoffeeBean {
        NewCoffeeBean {
            id: None,
            name: name.to_string(),
            roaster: "Onyx Coffee Lab".to_string(),
            origin: "Ethiopia".to_string(),
            roast_level: "Light".to_string(),
            notes: vec!["Blueberry".to_string(), "Jasmine".to_string()],
            general_notes: String::new(),
            rank: 4,
            grams_in: 18.0,
            ml_out: 36.0,
            brew_time: 28,
            temperature: 93.0,
            grind_size: 15.0,
            price: 21.0,
            weight: 283.0,
            order_again: true,
            purchase_count: 1,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let (_dir, db) = setup_test_db().await;

        let created = create_bean(&db, new_bean("Geometry")).await.unwrap();
        let fetched = get_bean(&db, created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.notes, vec!["Blueberry", "Jasmine"]);
        assert!(fetched.order_again);
    }

    #[tokio::test]
    async fn test_create_respects_client_supplied_id() {
        let (_dir, db) = setup_test_db().await;

        let id = Uuid::new_v4();
        let mut new = new_bean("Monarch");
        new.id = Some(id);

        let created = create_bean(&db, new).await.unwrap();
        assert_eq!(created.id, id);
    }

    #[tokio::test]
    async fn test_create_dedupes_notes_and_clamps_rank() {
        let (_dir, db) = setup_test_db().await;

        let mut new = new_bean("Southern Weather");
        new.notes = vec![
            "Chocolate".to_string(),
            "Chocolate".to_string(),
            "Almond".to_string(),
        ];
        new.rank = 11;

        let created = create_bean(&db, new).await.unwrap();
        assert_eq!(created.notes, vec!["Chocolate", "Almond"]);
        assert_eq!(created.rank, 5);
    }

    #[tokio::test]
    async fn test_list_orders_by_creation() {
        let (_dir, db) = setup_test_db().await;

        create_bean(&db, new_bean("First")).await.unwrap();
        create_bean(&db, new_bean("Second")).await.unwrap();

        let beans = list_beans(&db).await.unwrap();
        assert_eq!(beans.len(), 2);
        assert_eq!(beans[0].name, "First");
        assert_eq!(beans[1].name, "Second");
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let (_dir, db) = setup_test_db().await;

        let created = create_bean(&db, new_bean("Geometry")).await.unwrap();
        let patch = CoffeeBeanPatch {
            rank: Some(5),
            order_again: Some(false),
            ..Default::default()
        };

        let updated = update_bean(&db, created.id, patch).await.unwrap();
        assert_eq!(updated.rank, 5);
        assert!(!updated.order_again);
        assert_eq!(updated.name, "Geometry");
        assert_eq!(updated.price, 21.0);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_bean_is_not_found() {
        let (_dir, db) = setup_test_db().await;

        let result = update_bean(&db, Uuid::new_v4(), CoffeeBeanPatch::default()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_bean() {
        let (_dir, db) = setup_test_db().await;

        let created = create_bean(&db, new_bean("Hologram")).await.unwrap();
        delete_bean(&db, created.id).await.unwrap();

        assert!(matches!(
            get_bean(&db, created.id).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete_bean(&db, created.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_repurchase_increments_count() {
        let (_dir, db) = setup_test_db().await;

        let created = create_bean(&db, new_bean("Tropical Weather")).await.unwrap();
        assert_eq!(created.purchase_count, 1);

        let updated = record_repurchase(&db, created.id).await.unwrap();
        assert_eq!(updated.purchase_count, 2);

        let updated = record_repurchase(&db, created.id).await.unwrap();
        assert_eq!(updated.purchase_count, 3);
    }
}
