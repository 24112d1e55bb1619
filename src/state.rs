use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::config::AdminCredentials;
use crate::models::defaults::{default_routine, default_target_date, default_ui_config};
use crate::models::{ExamEntry, SyncReport, TargetDate, UiConfig};
use crate::notify::NotificationDispatcher;
use crate::remote::RemoteStore;
use crate::services::{ProgressStore, ReminderEvaluator, SettingsSynchronizer, SubscriptionStore};

/// Remote-synced dashboard data plus the outcome of the last write per group.
///
/// Written only by [`SettingsSynchronizer`]; everything else reads it.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub routine: Vec<ExamEntry>,
    pub target_date: TargetDate,
    pub config: UiConfig,
    pub sync: SyncReport,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            routine: default_routine(),
            target_date: default_target_date(),
            config: default_ui_config(),
            sync: SyncReport::default(),
        }
    }
}

pub type SharedDashboard = Arc<RwLock<DashboardState>>;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub remote: Arc<dyn RemoteStore>,
    pub dashboard: SharedDashboard,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub subscriptions: SubscriptionStore,
    pub progress: ProgressStore,
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        remote: Arc<dyn RemoteStore>,
        dispatcher: Arc<NotificationDispatcher>,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            subscriptions: SubscriptionStore::new(db.clone()),
            progress: ProgressStore::new(db.clone()),
            db,
            remote,
            dashboard: Arc::new(RwLock::new(DashboardState::default())),
            dispatcher,
            admin: Arc::new(admin),
        }
    }

    pub fn synchronizer(&self) -> SettingsSynchronizer {
        SettingsSynchronizer::new(self.db.clone(), self.remote.clone(), self.dashboard.clone())
    }

    pub fn reminder_evaluator(&self) -> ReminderEvaluator {
        ReminderEvaluator::new(
            self.subscriptions.clone(),
            self.dashboard.clone(),
            self.dispatcher.clone(),
        )
    }
}
