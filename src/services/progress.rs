use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::repository::{self, keys};
use crate::error::AppError;
use crate::models::ExamEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_ids: Vec<String>,
    pub percentage: u8,
}

/// Per-device record of which exams the student has finished preparing for.
/// Lives only in local storage.
#[derive(Clone)]
pub struct ProgressStore {
    db: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl ProgressStore {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn completed_ids(&self) -> Result<Vec<String>, AppError> {
        Ok(repository::load_json(&self.db, keys::PROGRESS)
            .await?
            .unwrap_or_default())
    }

    /// Flips one exam's completion. Returns whether it is now complete.
    pub async fn toggle(&self, exam_id: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;
        let mut ids = self.completed_ids().await?;

        let completed = match ids.iter().position(|id| id == exam_id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(exam_id.to_string());
                true
            }
        };

        repository::save_json(&self.db, keys::PROGRESS, &ids).await?;
        Ok(completed)
    }

    pub async fn summary(&self, routine: &[ExamEntry]) -> Result<ProgressSummary, AppError> {
        let completed_ids = self.completed_ids().await?;
        let percentage = completion_percentage(&completed_ids, routine);
        Ok(ProgressSummary {
            completed_ids,
            percentage,
        })
    }
}

/// Rounded share of routine entries marked complete. Ids that are no longer
/// in the routine are not counted; an empty routine is 0%.
pub fn completion_percentage(completed_ids: &[String], routine: &[ExamEntry]) -> u8 {
    if routine.is_empty() {
        return 0;
    }
    let done = routine
        .iter()
        .filter(|exam| completed_ids.iter().any(|id| *id == exam.id))
        .count();
    ((done as f64 / routine.len() as f64) * 100.0).round() as u8
}
