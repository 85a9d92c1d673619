use std::time::Duration;

use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};

use crate::{
    error::{AppError, AppResult},
    models::{Preference, PreferenceRecord},
    store::PreferenceStore,
};

/// Durable preference store on SQLite
///
/// Creation order rides on rowid: new ids get fresh rowids and list()
/// reads descending, while ON CONFLICT updates keep the existing row and
/// therefore its rowid, so replacing a record never moves it.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and creates the schema when missing
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // One connection keeps `sqlite::memory:` databases shared across calls
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                preference INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                image_url TEXT,
                category TEXT,
                area TEXT,
                ingredients TEXT NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::info!(database_url = %database_url, "Preference store ready");

        Ok(Self { pool })
    }
}

fn record_from_row(row: &SqliteRow) -> AppResult<PreferenceRecord> {
    let raw_preference: i64 = row.try_get("preference")?;
    let preference = Preference::try_from(raw_preference as i8).map_err(AppError::Internal)?;

    let ingredients_json: String = row.try_get("ingredients")?;
    let ingredients: Vec<String> = serde_json::from_str(&ingredients_json)
        .map_err(|e| AppError::Internal(format!("Corrupt ingredient list: {}", e)))?;

    Ok(PreferenceRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        preference,
        timestamp: row.try_get("timestamp")?,
        image_url: row.try_get("image_url")?,
        category: row.try_get("category")?,
        area: row.try_get("area")?,
        ingredients,
    })
}

#[async_trait::async_trait]
impl PreferenceStore for SqliteStore {
    async fn list(&self) -> AppResult<Vec<PreferenceRecord>> {
        let rows = sqlx::query(
            "SELECT id, title, preference, timestamp, image_url, category, area, ingredients \
             FROM preferences ORDER BY rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn upsert(&self, record: PreferenceRecord) -> AppResult<()> {
        let ingredients = serde_json::to_string(&record.ingredients)
            .map_err(|e| AppError::Internal(format!("Unencodable ingredient list: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO preferences (id, title, preference, timestamp, image_url, category, area, ingredients)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                preference = excluded.preference,
                timestamp = excluded.timestamp,
                image_url = excluded.image_url,
                category = excluded.category,
                area = excluded.area,
                ingredients = excluded.ingredients
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(record.preference.signum())
        .bind(record.timestamp)
        .bind(&record.image_url)
        .bind(&record.category)
        .bind(&record.area)
        .bind(&ingredients)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM preferences WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
