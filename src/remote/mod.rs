pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::error::AppError;
use crate::models::ExamEntry;

pub use dto::{ConfigRow, RoutineRow};

pub const TARGET_DATE_KEY: &str = "targetDate";
pub const UI_CONFIG_KEY: &str = "uiConfig";

// Matches no real row; lets the delete filter select the whole table.
const DELETE_ALL_SENTINEL: &str = "temp_id_non_existent";

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Generic row store holding the shared routine and config records.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All routine rows ordered by id ascending.
    async fn fetch_routine(&self) -> Result<Vec<ExamEntry>, AppError>;
    async fn fetch_configs(&self) -> Result<Vec<ConfigRow>, AppError>;
    async fn delete_all_routine(&self) -> Result<(), AppError>;
    async fn insert_routine(&self, routine: &[ExamEntry]) -> Result<(), AppError>;
    async fn upsert_config(&self, key: &str, value: serde_json::Value) -> Result<(), AppError>;
}

/// PostgREST-style HTTP client (`/rest/v1/<table>`).
pub struct RestRemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RestRemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }

    async fn check(response: Response, action: &str) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Remote(format!("{} failed with {}: {}", action, status, body)))
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn fetch_routine(&self) -> Result<Vec<ExamEntry>, AppError> {
        let url = format!("{}?select=*&order=id.asc", self.table_url("routine"));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, "fetch routine").await?;

        let rows: Vec<RoutineRow> = response.json().await?;
        debug!("Fetched {} routine rows", rows.len());
        Ok(rows.into_iter().map(ExamEntry::from).collect())
    }

    async fn fetch_configs(&self) -> Result<Vec<ConfigRow>, AppError> {
        let url = format!("{}?select=*", self.table_url("configs"));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, "fetch configs").await?;

        Ok(response.json().await?)
    }

    async fn delete_all_routine(&self) -> Result<(), AppError> {
        let url = format!("{}?id=neq.{}", self.table_url("routine"), DELETE_ALL_SENTINEL);
        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check(response, "delete routine").await?;
        Ok(())
    }

    async fn insert_routine(&self, routine: &[ExamEntry]) -> Result<(), AppError> {
        let rows: Vec<RoutineRow> = routine.iter().map(RoutineRow::from).collect();
        let response = self
            .authorized(self.client.post(self.table_url("routine")))
            .json(&rows)
            .send()
            .await?;
        Self::check(response, "insert routine").await?;
        Ok(())
    }

    async fn upsert_config(&self, key: &str, value: serde_json::Value) -> Result<(), AppError> {
        let row = ConfigRow {
            key: key.to_string(),
            value,
        };
        let response = self
            .authorized(self.client.post(self.table_url("configs")))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await?;
        Self::check(response, "upsert config").await?;
        Ok(())
    }
}

/// Remote store used when no remote is configured: reads are empty, writes succeed.
pub struct NoopRemoteStore;

#[async_trait]
impl RemoteStore for NoopRemoteStore {
    async fn fetch_routine(&self) -> Result<Vec<ExamEntry>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_configs(&self) -> Result<Vec<ConfigRow>, AppError> {
        Ok(Vec::new())
    }

    async fn delete_all_routine(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_routine(&self, _routine: &[ExamEntry]) -> Result<(), AppError> {
        Ok(())
    }

    async fn upsert_config(&self, _key: &str, _value: serde_json::Value) -> Result<(), AppError> {
        Ok(())
    }
}
