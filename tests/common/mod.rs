#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_dashboard::config::AdminCredentials;
use exam_dashboard::error::AppError;
use exam_dashboard::models::ExamEntry;
use exam_dashboard::notify::{NotificationDispatcher, NotificationPlatform, NotifyError, Permission};
use exam_dashboard::remote::{ConfigRow, RemoteStore};
use exam_dashboard::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse";

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn exam(id: &str, subject: &str, timestamp: i64) -> ExamEntry {
    ExamEntry {
        id: id.to_string(),
        date: "21 April, 2026".to_string(),
        day: "Tuesday".to_string(),
        subject: subject.to_string(),
        subject_code: "101".to_string(),
        time: "10:00 AM".to_string(),
        timestamp,
    }
}

/// In-memory remote store with switchable failures and a call log.
#[derive(Default)]
pub struct FakeRemote {
    pub routine: Mutex<Vec<ExamEntry>>,
    pub configs: Mutex<Vec<ConfigRow>>,
    pub fail_fetch: bool,
    pub fail_delete: bool,
    pub fail_insert: bool,
    pub fail_upsert: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn remote_down() -> AppError {
    AppError::Remote("503 Service Unavailable".to_string())
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn fetch_routine(&self) -> Result<Vec<ExamEntry>, AppError> {
        self.log("fetch_routine");
        if self.fail_fetch {
            return Err(remote_down());
        }
        Ok(self.routine.lock().unwrap().clone())
    }

    async fn fetch_configs(&self) -> Result<Vec<ConfigRow>, AppError> {
        self.log("fetch_configs");
        if self.fail_fetch {
            return Err(remote_down());
        }
        Ok(self.configs.lock().unwrap().clone())
    }

    async fn delete_all_routine(&self) -> Result<(), AppError> {
        self.log("delete_all_routine");
        if self.fail_delete {
            return Err(remote_down());
        }
        self.routine.lock().unwrap().clear();
        Ok(())
    }

    async fn insert_routine(&self, routine: &[ExamEntry]) -> Result<(), AppError> {
        self.log("insert_routine");
        if self.fail_insert {
            return Err(remote_down());
        }
        self.routine.lock().unwrap().extend_from_slice(routine);
        Ok(())
    }

    async fn upsert_config(&self, key: &str, value: serde_json::Value) -> Result<(), AppError> {
        self.log(&format!("upsert_config:{}", key));
        if self.fail_upsert {
            return Err(remote_down());
        }
        let mut configs = self.configs.lock().unwrap();
        configs.retain(|row| row.key != key);
        configs.push(ConfigRow {
            key: key.to_string(),
            value,
        });
        Ok(())
    }
}

/// Notification platform whose permission can be flipped mid-test.
pub struct FakePlatform {
    pub permission: Mutex<Permission>,
    pub shown: Mutex<Vec<(String, String)>>,
    pub sounds: Mutex<usize>,
    pub permission_requests: Mutex<usize>,
}

impl FakePlatform {
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            shown: Mutex::new(Vec::new()),
            sounds: Mutex::new(0),
            permission_requests: Mutex::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn sounds(&self) -> usize {
        *self.sounds.lock().unwrap()
    }
}

#[async_trait]
impl NotificationPlatform for FakePlatform {
    async fn request_permission(&self) -> Permission {
        *self.permission_requests.lock().unwrap() += 1;
        *self.permission.lock().unwrap()
    }

    fn is_permission_granted(&self) -> bool {
        *self.permission.lock().unwrap() == Permission::Granted
    }

    async fn show_notification(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if !self.is_permission_granted() {
            return Err(NotifyError::PermissionDenied);
        }
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }

    async fn play_sound(&self) -> Result<(), NotifyError> {
        *self.sounds.lock().unwrap() += 1;
        Ok(())
    }
}

pub async fn app_state(remote: Arc<FakeRemote>, platform: Arc<FakePlatform>) -> AppState {
    let db = setup_test_db().await;
    let dispatcher = Arc::new(NotificationDispatcher::new(platform));
    AppState::new(
        db,
        remote,
        dispatcher,
        AdminCredentials {
            email: Some(ADMIN_EMAIL.to_string()),
            password: Some(ADMIN_PASSWORD.to_string()),
        },
    )
}
