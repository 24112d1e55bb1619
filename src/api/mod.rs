use axum::extract::{Path, Request};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{
    ExamEntry, ReminderKind, ReminderSubscription, SettingsUpdate, SyncReport, TargetDate,
    TimeLeft, UiConfig,
};
use crate::services::{ProgressSummary, auth, countdown, export};
use crate::state::AppState;

pub const ADMIN_EMAIL_HEADER: &str = "x-admin-email";
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardView {
    routine: Vec<ExamEntry>,
    target_date: TargetDate,
    config: UiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleReminderRequest {
    exam_id: String,
    #[serde(rename = "type")]
    kind: ReminderKind,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct NewEntryResponse {
    entry: ExamEntry,
    sync: SyncReport,
}

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/settings", put(update_settings))
        .route("/routine/entries", post(add_routine_entry))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/countdown", get(countdown_now))
        .route("/api/routine.csv", get(routine_csv))
        .route("/api/reminders", get(list_reminders))
        .route("/api/reminders/toggle", post(toggle_reminder))
        .route("/api/progress", get(progress))
        .route("/api/progress/{id}/toggle", post(toggle_progress))
        .route("/api/sync-status", get(sync_status))
        .route("/api/admin/login", post(admin_login))
        .nest("/api/admin", admin)
        .with_state(state)
}

async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let email = header_str(req.headers(), ADMIN_EMAIL_HEADER);
    let password = header_str(req.headers(), ADMIN_PASSWORD_HEADER);
    auth::verify_admin(&state.admin, email, password)?;
    Ok(next.run(req).await)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let dashboard = state.dashboard.read().await;
    Json(DashboardView {
        routine: dashboard.routine.clone(),
        target_date: dashboard.target_date,
        config: dashboard.config.clone(),
    })
}

async fn countdown_now(State(state): State<AppState>) -> Json<TimeLeft> {
    let target = state.dashboard.read().await.target_date;
    Json(countdown::time_left(&target, Utc::now()))
}

async fn routine_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dashboard = state.dashboard.read().await;
    if !dashboard.config.show_download {
        return Err(AppError::NotFound);
    }

    let csv = export::routine_csv(&dashboard.routine);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"routine.csv\""),
        ],
        csv,
    ))
}

async fn list_reminders(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReminderSubscription>>, AppError> {
    Ok(Json(state.subscriptions.list().await?))
}

async fn toggle_reminder(
    State(state): State<AppState>,
    Json(req): Json<ToggleReminderRequest>,
) -> Result<Json<Vec<ReminderSubscription>>, AppError> {
    let known_exam = state
        .dashboard
        .read()
        .await
        .routine
        .iter()
        .any(|e| e.id == req.exam_id);
    let subscribed = state
        .subscriptions
        .list()
        .await?
        .iter()
        .any(|s| s.matches(&req.exam_id, req.kind));

    // Stale subscriptions may still be removed after their exam is deleted.
    if !known_exam && !subscribed {
        return Err(AppError::NotFound);
    }

    let subs = state.subscriptions.toggle(&req.exam_id, req.kind).await?;
    Ok(Json(subs))
}

/// Progress is hidden entirely when the dashboard has it switched off.
async fn progress_routine(state: &AppState) -> Result<Vec<ExamEntry>, AppError> {
    let dashboard = state.dashboard.read().await;
    if !dashboard.config.show_progress {
        return Err(AppError::NotFound);
    }
    Ok(dashboard.routine.clone())
}

async fn progress(State(state): State<AppState>) -> Result<Json<ProgressSummary>, AppError> {
    let routine = progress_routine(&state).await?;
    Ok(Json(state.progress.summary(&routine).await?))
}

async fn toggle_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressSummary>, AppError> {
    let routine = progress_routine(&state).await?;
    let completed = state.progress.completed_ids().await?;
    if !routine.iter().any(|e| e.id == id) && !completed.contains(&id) {
        return Err(AppError::NotFound);
    }

    state.progress.toggle(&id).await?;
    Ok(Json(state.progress.summary(&routine).await?))
}

async fn sync_status(State(state): State<AppState>) -> Json<SyncReport> {
    Json(state.synchronizer().sync_status().await)
}

async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<StatusCode, AppError> {
    auth::verify_admin(&state.admin, &req.email, &req.password)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SyncReport>, AppError> {
    if update.is_empty() {
        return Err(AppError::BadRequest(
            "Expected at least one of routine, targetDate or config".to_string(),
        ));
    }
    Ok(Json(state.synchronizer().update(update).await))
}

async fn add_routine_entry(State(state): State<AppState>) -> Json<NewEntryResponse> {
    let entry = ExamEntry::blank(Utc::now());
    let mut routine = state.dashboard.read().await.routine.clone();
    routine.push(entry.clone());

    let sync = state
        .synchronizer()
        .update(SettingsUpdate {
            routine: Some(routine),
            ..Default::default()
        })
        .await;

    Json(NewEntryResponse { entry, sync })
}
