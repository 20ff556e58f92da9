use anyhow::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

use crate::models::{FoodEntry, NutritionRecord};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        // In-memory databases are per connection, so keep a single one there.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let url = if database_url.contains('?') || database_url.contains(":memory:") {
            database_url.to_string()
        } else {
            format!("{}?mode=rwc", database_url)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&url)
            .await?;

        let db = Database { pool };
        db.init_tables().await?;
        Ok(db)
    }

    async fn init_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS food_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                food_name TEXT NOT NULL,
                quantity TEXT NOT NULL,
                nutrition_data TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn add_food_entry(
        &self,
        food_name: &str,
        quantity: &str,
        nutrition: &NutritionRecord,
    ) -> Result<i64> {
        let nutrition_json = serde_json::to_string(nutrition)?;

        let result = sqlx::query(
            r#"
            INSERT INTO food_history (food_name, quantity, nutrition_data, timestamp)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(food_name)
        .bind(quantity)
        .bind(nutrition_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        log::info!("📝 Added food entry: {}, {}", food_name, quantity);
        Ok(result.last_insert_rowid())
    }

    /// All logged entries, most recent first.
    pub async fn get_food_history(&self) -> Result<Vec<FoodEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, food_name, quantity, nutrition_data, timestamp
            FROM food_history
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<FoodEntry> {
                let nutrition_json: String = row.get(3);
                Ok(FoodEntry {
                    id: row.get(0),
                    food_name: row.get(1),
                    quantity: row.get(2),
                    nutrition_data: serde_json::from_str(&nutrition_json)?,
                    timestamp: row.get(4),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_history_starts_empty() {
        let db = memory_db().await;
        assert!(db.get_food_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_fetch_entry() {
        let db = memory_db().await;
        let record = NutritionRecord {
            food_name: Some("apple".to_string()),
            calories: Some(95.0),
            ..Default::default()
        };

        let id = db.add_food_entry("apple", "1 medium", &record).await.unwrap();
        let history = db.get_food_history().await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
        assert_eq!(history[0].food_name, "apple");
        assert_eq!(history[0].quantity, "1 medium");
        assert_eq!(history[0].nutrition_data, record);
        // Absent values survive storage as absent
        assert_eq!(history[0].nutrition_data.protein, None);
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let db = memory_db().await;
        let record = NutritionRecord::default();

        db.add_food_entry("oatmeal", "1", &record).await.unwrap();
        db.add_food_entry("salad", "1", &record).await.unwrap();
        db.add_food_entry("pasta", "2", &record).await.unwrap();

        let names: Vec<String> = db
            .get_food_history()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.food_name)
            .collect();

        assert_eq!(names, vec!["pasta", "salad", "oatmeal"]);
    }
}
