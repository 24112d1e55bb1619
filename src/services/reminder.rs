use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::db::repository::{self, keys};
use crate::error::AppError;
use crate::models::{ExamEntry, ReminderKind, ReminderSubscription, UiConfig};
use crate::notify::{DispatchOutcome, Notification, NotificationDispatcher};
use crate::services::scheduler::PeriodicTask;
use crate::state::SharedDashboard;

/// Where a subscription stands relative to its trigger window at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    AlreadyFired,
    /// The referenced exam is no longer in the routine.
    ExamMissing,
    NotYet,
    Due,
    /// The exam has started; this subscription can never fire.
    Expired,
}

/// Classifies `sub` against the half-open window `[exam - lead, exam)`.
pub fn evaluate(sub: &ReminderSubscription, routine: &[ExamEntry], now_ms: i64) -> Evaluation {
    if sub.fired {
        return Evaluation::AlreadyFired;
    }
    let Some(exam) = routine.iter().find(|e| e.id == sub.exam_id) else {
        return Evaluation::ExamMissing;
    };

    let trigger_ms = exam
        .timestamp
        .saturating_sub(sub.kind.lead_time().num_milliseconds());
    if now_ms >= exam.timestamp {
        Evaluation::Expired
    } else if now_ms >= trigger_ms {
        Evaluation::Due
    } else {
        Evaluation::NotYet
    }
}

pub fn reminder_notification(
    kind: ReminderKind,
    exam: &ExamEntry,
    config: &UiConfig,
) -> Notification {
    let body = match kind {
        ReminderKind::OneDayBefore => format!(
            "Your {} exam is tomorrow at {}. Prepare well.",
            exam.subject, exam.time
        ),
        ReminderKind::OneHourBefore => format!(
            "Your {} exam starts in 1 hour. Head to the exam centre now.",
            exam.subject
        ),
    };

    Notification {
        title: format!("{} Alarm", config.exam_name),
        body,
        with_sound: config.notification_sound,
    }
}

/// Locally persisted reminder subscriptions.
#[derive(Clone)]
pub struct SubscriptionStore {
    db: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl SubscriptionStore {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<ReminderSubscription>, AppError> {
        Ok(repository::load_json(&self.db, keys::REMINDERS)
            .await?
            .unwrap_or_default())
    }

    /// Removes the `(exam_id, kind)` subscription if present, otherwise adds
    /// an armed one. Returns the resulting set.
    pub async fn toggle(
        &self,
        exam_id: &str,
        kind: ReminderKind,
    ) -> Result<Vec<ReminderSubscription>, AppError> {
        let _guard = self.lock.lock().await;
        let mut subs = self.list().await?;

        match subs.iter().position(|s| s.matches(exam_id, kind)) {
            Some(index) => {
                subs.remove(index);
            }
            None => subs.push(ReminderSubscription::new(exam_id, kind)),
        }

        self.save(&subs).await?;
        Ok(subs)
    }

    async fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    async fn save(&self, subs: &[ReminderSubscription]) -> Result<(), AppError> {
        repository::save_json(&self.db, keys::REMINDERS, subs).await
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub due: usize,
    pub delivered: usize,
    pub denied: usize,
    pub failed: usize,
}

/// Fires reminder notifications whose trigger window contains the tick instant.
pub struct ReminderEvaluator {
    subscriptions: SubscriptionStore,
    dashboard: SharedDashboard,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ReminderEvaluator {
    pub fn new(
        subscriptions: SubscriptionStore,
        dashboard: SharedDashboard,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            subscriptions,
            dashboard,
            dispatcher,
        }
    }

    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport, AppError> {
        let mut report = TickReport::default();

        let (routine, config) = {
            let dashboard = self.dashboard.read().await;
            (dashboard.routine.clone(), dashboard.config.clone())
        };
        if !config.show_reminders {
            return Ok(report);
        }

        let now_ms = now.timestamp_millis();
        let due: Vec<(ReminderSubscription, Notification)> = {
            let _guard = self.subscriptions.guard().await;
            self.subscriptions
                .list()
                .await?
                .into_iter()
                .filter(|sub| evaluate(sub, &routine, now_ms) == Evaluation::Due)
                .filter_map(|sub| {
                    let exam = routine.iter().find(|e| e.id == sub.exam_id)?;
                    let notification = reminder_notification(sub.kind, exam, &config);
                    Some((sub, notification))
                })
                .collect()
        };

        // The store lock is released while notifications are delivered.
        let mut delivered = Vec::new();
        for (sub, notification) in due {
            report.due += 1;
            match self.dispatcher.dispatch(&notification).await {
                DispatchOutcome::Delivered => {
                    info!("Reminder {:?} fired for exam {}", sub.kind, sub.exam_id);
                    report.delivered += 1;
                    delivered.push(sub);
                }
                DispatchOutcome::PermissionDenied => report.denied += 1,
                DispatchOutcome::Failed => report.failed += 1,
            }
        }

        if !delivered.is_empty() {
            let _guard = self.subscriptions.guard().await;
            let mut subs = self.subscriptions.list().await?;
            for sub in subs.iter_mut() {
                if delivered.iter().any(|d| sub.matches(&d.exam_id, d.kind)) {
                    sub.fired = true;
                }
            }
            self.subscriptions.save(&subs).await?;
        }
        debug!("Reminder tick: {:?}", report);
        Ok(report)
    }
}

#[async_trait]
impl PeriodicTask for ReminderEvaluator {
    fn name(&self) -> &'static str {
        "reminders"
    }

    async fn run_once(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        self.tick(now).await.map(|_| ())
    }
}
