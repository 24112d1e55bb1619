use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exam_dashboard::api::router;
use exam_dashboard::config::Config;
use exam_dashboard::notify::{LogPlatform, NotificationDispatcher, NotificationPlatform, WebhookPlatform};
use exam_dashboard::remote::{NoopRemoteStore, RemoteStore, RestRemoteStore};
use exam_dashboard::services::{Scheduler, SystemClock};
use exam_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "exam_dashboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let remote: Arc<dyn RemoteStore> = match &config.remote {
        Some(remote_config) => {
            info!("Using remote store at {}", remote_config.base_url);
            Arc::new(RestRemoteStore::new(remote_config.clone())?)
        }
        None => {
            warn!("REMOTE_URL is not set, remote persistence is disabled");
            Arc::new(NoopRemoteStore)
        }
    };

    let platform: Arc<dyn NotificationPlatform> = match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookPlatform::new(url.clone())?),
        None => Arc::new(LogPlatform),
    };
    let dispatcher = Arc::new(NotificationDispatcher::new(platform));

    let state = AppState::new(pool, remote, dispatcher, config.admin.clone());

    let hydrated = state.synchronizer().hydrate().await;
    info!("Startup hydration: {:?}", hydrated);

    let reminders = Scheduler::new(
        Arc::new(state.reminder_evaluator()),
        Arc::new(SystemClock),
        config.reminder_interval,
    )
    .spawn();

    let app = router(state);

    info!("listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    let served = axum::serve(listener, app).await;

    reminders.abort();
    served?;

    Ok(())
}
