use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository::{self, keys};
use crate::error::AppError;
use crate::models::{ExamEntry, FieldGroup, SettingsUpdate, SyncReport, SyncStatus, TargetDate, UiConfig};
use crate::remote::{RemoteStore, TARGET_DATE_KEY, UI_CONFIG_KEY};
use crate::state::SharedDashboard;

/// Which parts of the dashboard were replaced by remote data at startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HydrationStats {
    pub routine: bool,
    pub target_date: bool,
    pub config: bool,
}

/// Applies admin changes to the shared dashboard and pushes them out.
///
/// Every present field group is applied in memory first, then written to the
/// remote store and mirrored locally. Groups are independent: one failing does
/// not stop the others, and nothing is rolled back.
pub struct SettingsSynchronizer {
    db: SqlitePool,
    remote: Arc<dyn RemoteStore>,
    dashboard: SharedDashboard,
}

impl SettingsSynchronizer {
    pub fn new(db: SqlitePool, remote: Arc<dyn RemoteStore>, dashboard: SharedDashboard) -> Self {
        Self {
            db,
            remote,
            dashboard,
        }
    }

    /// Loads routine and config from the remote store, keeping the compiled-in
    /// defaults for anything missing or unreadable.
    pub async fn hydrate(&self) -> HydrationStats {
        let mut stats = HydrationStats::default();

        match self.remote.fetch_routine().await {
            Ok(routine) if !routine.is_empty() => {
                info!("Hydrated {} exams from remote", routine.len());
                self.dashboard.write().await.routine = routine;
                stats.routine = true;
            }
            Ok(_) => info!("Remote routine is empty, keeping defaults"),
            Err(e) => warn!("Failed to fetch routine, keeping defaults: {}", e),
        }

        let rows = match self.remote.fetch_configs().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to fetch configs, keeping defaults: {}", e);
                return stats;
            }
        };

        if let Some(row) = rows.iter().find(|r| r.key == TARGET_DATE_KEY) {
            match row.value_as_string().parse::<TargetDate>() {
                Ok(target) => {
                    self.dashboard.write().await.target_date = target;
                    stats.target_date = true;
                }
                Err(e) => warn!("Ignoring remote target date: {}", e),
            }
        }

        if let Some(row) = rows.iter().find(|r| r.key == UI_CONFIG_KEY) {
            match serde_json::from_value::<UiConfig>(row.value.clone()) {
                Ok(config) => {
                    self.dashboard.write().await.config = config;
                    stats.config = true;
                }
                Err(e) => warn!("Ignoring remote ui config: {}", e),
            }
        }

        stats
    }

    pub async fn update(&self, update: SettingsUpdate) -> SyncReport {
        self.apply(&update).await;

        if let Some(routine) = &update.routine {
            let result = self.persist_routine(routine).await;
            self.record(FieldGroup::Routine, result).await;
            self.mirror_json(keys::ROUTINE, routine).await;
        }

        if let Some(target) = &update.target_date {
            let result = self
                .remote
                .upsert_config(TARGET_DATE_KEY, serde_json::Value::String(target.to_rfc3339()))
                .await;
            self.record(FieldGroup::TargetDate, result).await;
            self.mirror_raw(keys::TARGET_DATE, &target.to_rfc3339()).await;
        }

        if let Some(config) = &update.config {
            let result = match serde_json::to_value(config) {
                Ok(value) => self.remote.upsert_config(UI_CONFIG_KEY, value).await,
                Err(e) => Err(AppError::from(e)),
            };
            self.record(FieldGroup::Config, result).await;
            self.mirror_json(keys::UI_CONFIG, config).await;
        }

        self.dashboard.read().await.sync.clone()
    }

    pub async fn sync_status(&self) -> SyncReport {
        self.dashboard.read().await.sync.clone()
    }

    async fn apply(&self, update: &SettingsUpdate) {
        let mut dashboard = self.dashboard.write().await;
        if let Some(routine) = &update.routine {
            dashboard.routine = routine.clone();
        }
        if let Some(target) = update.target_date {
            dashboard.target_date = target;
        }
        if let Some(config) = &update.config {
            dashboard.config = config.clone();
        }
    }

    // Delete-then-insert. A failure between the two leaves the remote empty
    // until the next successful save.
    async fn persist_routine(&self, routine: &[ExamEntry]) -> Result<(), AppError> {
        self.remote.delete_all_routine().await?;
        if !routine.is_empty() {
            self.remote.insert_routine(routine).await?;
        }
        Ok(())
    }

    async fn record(&self, group: FieldGroup, result: Result<(), AppError>) {
        let at = Utc::now();
        let status = match result {
            Ok(()) => {
                info!("Persisted {} to remote", group.as_str());
                SyncStatus::Synced { at }
            }
            Err(e) => {
                warn!("Failed to persist {} to remote: {}", group.as_str(), e);
                SyncStatus::Failed {
                    at,
                    error: e.to_string(),
                }
            }
        };
        self.dashboard.write().await.sync.set(group, status);
    }

    async fn mirror_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = repository::save_json(&self.db, key, value).await {
            warn!("Failed to mirror {} locally: {}", key, e);
        }
    }

    async fn mirror_raw(&self, key: &str, value: &str) {
        if let Err(e) = repository::set_value(&self.db, key, value).await {
            warn!("Failed to mirror {} locally: {}", key, e);
        }
    }
}
