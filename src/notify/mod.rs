//! Notification delivery.
//!
//! [`NotificationPlatform`] is the narrow capability the reminder logic needs
//! from its host. [`NotificationDispatcher`] wraps it so that every platform
//! failure is absorbed and reported as a [`DispatchOutcome`] instead of an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    PermissionDenied,
    #[error("blocked by platform policy")]
    Blocked,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    async fn request_permission(&self) -> Permission;
    fn is_permission_granted(&self) -> bool;
    async fn show_notification(&self, title: &str, body: &str) -> Result<(), NotifyError>;
    async fn play_sound(&self) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub with_sound: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    PermissionDenied,
    Failed,
}

pub struct NotificationDispatcher {
    platform: Arc<dyn NotificationPlatform>,
}

impl NotificationDispatcher {
    pub fn new(platform: Arc<dyn NotificationPlatform>) -> Self {
        Self { platform }
    }

    pub async fn dispatch(&self, notification: &Notification) -> DispatchOutcome {
        if !self.platform.is_permission_granted() {
            let permission = self.platform.request_permission().await;
            if permission != Permission::Granted {
                warn!("Notification permission is {:?}, reminder stays armed", permission);
                return DispatchOutcome::PermissionDenied;
            }
        }

        if let Err(e) = self
            .platform
            .show_notification(&notification.title, &notification.body)
            .await
        {
            warn!("Notification {:?} not shown: {}", notification.title, e);
            return match e {
                NotifyError::PermissionDenied => DispatchOutcome::PermissionDenied,
                _ => DispatchOutcome::Failed,
            };
        }

        if notification.with_sound {
            if let Err(e) = self.platform.play_sound().await {
                debug!("Sound cue skipped: {}", e);
            }
        }

        DispatchOutcome::Delivered
    }
}

/// Writes notifications to the log. Used when no delivery endpoint is configured.
pub struct LogPlatform;

#[async_trait]
impl NotificationPlatform for LogPlatform {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn is_permission_granted(&self) -> bool {
        true
    }

    async fn show_notification(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!("[notification] {}: {}", title, body);
        Ok(())
    }

    async fn play_sound(&self) -> Result<(), NotifyError> {
        info!("[notification] sound cue");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    body: &'a str,
}

/// POSTs each notification as JSON to a fixed URL.
pub struct WebhookPlatform {
    client: Client,
    url: String,
}

impl WebhookPlatform {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationPlatform for WebhookPlatform {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn is_permission_granted(&self) -> bool {
        true
    }

    async fn show_notification(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { title, body })
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::FORBIDDEN {
            Err(NotifyError::PermissionDenied)
        } else {
            Err(NotifyError::Delivery(format!("webhook answered {}", status)))
        }
    }

    async fn play_sound(&self) -> Result<(), NotifyError> {
        Err(NotifyError::Blocked)
    }
}
