use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::AppError;

/// Keys of the string-keyed blobs kept in `local_storage`.
pub mod keys {
    pub const ROUTINE: &str = "arns_routine_data";
    pub const TARGET_DATE: &str = "arns_target_date";
    pub const UI_CONFIG: &str = "arns_ui_config";
    pub const REMINDERS: &str = "arns_exam_reminders";
    pub const PROGRESS: &str = "arns_dakhil_progress";
}

pub async fn get_value(db: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?1")
        .bind(key)
        .fetch_optional(db)
        .await
}

pub async fn set_value(db: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO local_storage (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(db)
    .await?;

    Ok(())
}

/// Reads a JSON blob. A corrupt value is logged and reported as absent.
pub async fn load_json<T: DeserializeOwned>(
    db: &SqlitePool,
    key: &str,
) -> Result<Option<T>, sqlx::Error> {
    let Some(raw) = get_value(db, key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring malformed local value for {}: {}", key, e);
            Ok(None)
        }
    }
}

pub async fn save_json<T: Serialize + ?Sized>(
    db: &SqlitePool,
    key: &str,
    value: &T,
) -> Result<(), AppError> {
    let raw = serde_json::to_string(value)?;
    set_value(db, key, &raw).await?;
    Ok(())
}
