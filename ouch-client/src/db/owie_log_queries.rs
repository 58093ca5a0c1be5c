use sqlx::SqlitePool;

use crate::domain::{NewOwieLog, OwieLog};
use crate::error::Result;

/// Ensure the `owie_logs` table and its index exist. Safe to call repeatedly.
pub async fn create_if_absent(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS owie_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            body_part TEXT NOT NULL,
            logged_at TEXT NOT NULL,
            observed_at TEXT NOT NULL,
            temperature REAL NOT NULL,
            humidity REAL NOT NULL,
            pressure REAL NOT NULL,
            uv_index REAL NOT NULL,
            precipitation REAL NOT NULL,
            weather_id INTEGER NOT NULL,
            weather_main TEXT NOT NULL,
            weather_description TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_owie_logs_logged_at ON owie_logs (logged_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Append one owie and return the id SQLite assigned to it.
pub async fn insert_owie_log(pool: &SqlitePool, log: &NewOwieLog) -> Result<i64> {
    let w = &log.weather;
    let result = sqlx::query(
        r#"
        INSERT INTO owie_logs (
            body_part,
            logged_at,
            observed_at,
            temperature,
            humidity,
            pressure,
            uv_index,
            precipitation,
            weather_id,
            weather_main,
            weather_description,
            latitude,
            longitude
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&log.body_part)
    .bind(log.logged_at)
    .bind(w.observed_at)
    .bind(w.temperature)
    .bind(w.humidity)
    .bind(w.pressure)
    .bind(w.uv_index)
    .bind(w.precipitation)
    .bind(w.condition_id)
    .bind(&w.condition)
    .bind(&w.description)
    .bind(log.latitude)
    .bind(log.longitude)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn fetch_owie_log(pool: &SqlitePool, id: i64) -> Result<Option<OwieLog>> {
    let row = sqlx::query_as::<_, OwieLog>(
        r#"
        SELECT
            id,
            body_part,
            logged_at,
            observed_at,
            temperature,
            humidity,
            pressure,
            uv_index,
            precipitation,
            weather_id,
            weather_main,
            weather_description,
            latitude,
            longitude
        FROM owie_logs
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn count_owie_logs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owie_logs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_pool;
    use crate::domain::WeatherSnapshot;
    use time::macros::datetime;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            observed_at: datetime!(2024-11-02 14:30:00 UTC),
            temperature: 48.2,
            humidity: 81.0,
            pressure: 1004.0,
            uv_index: 1.3,
            precipitation: 0.4,
            condition_id: 500,
            condition: "Rain".to_string(),
            description: "light rain".to_string(),
        }
    }

    fn new_log(body_part: &str) -> NewOwieLog {
        NewOwieLog {
            body_part: body_part.to_string(),
            logged_at: datetime!(2024-11-02 14:31:07 UTC),
            latitude: 45.52,
            longitude: -122.68,
            weather: snapshot(),
        }
    }

    #[tokio::test]
    async fn open_pool_creates_missing_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        let pool = open_pool(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(count_owie_logs(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_if_absent_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("data.db")).await.unwrap();

        insert_owie_log(&pool, &new_log("knee")).await.unwrap();
        create_if_absent(&pool).await.unwrap();

        assert_eq!(count_owie_logs(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_then_fetch_returns_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("data.db")).await.unwrap();

        let id = insert_owie_log(&pool, &new_log("left knee")).await.unwrap();
        let stored = fetch_owie_log(&pool, id).await.unwrap().expect("row exists");

        assert_eq!(stored.id, id);
        assert_eq!(stored.body_part, "left knee");
        assert_eq!(stored.logged_at, datetime!(2024-11-02 14:31:07 UTC));
        assert_eq!(stored.weather(), snapshot());
        assert_eq!(stored.latitude, 45.52);
        assert_eq!(stored.longitude, -122.68);
    }

    #[tokio::test]
    async fn each_insert_gets_a_distinct_id() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("data.db")).await.unwrap();

        let first = insert_owie_log(&pool, &new_log("wrist")).await.unwrap();
        let second = insert_owie_log(&pool, &new_log("wrist")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(count_owie_logs(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn fetch_missing_id_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(&dir.path().join("data.db")).await.unwrap();

        assert!(fetch_owie_log(&pool, 42).await.unwrap().is_none());
    }
}
