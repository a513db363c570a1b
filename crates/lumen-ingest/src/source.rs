//! Media metadata sources.

use crate::error::IngestError;
use crate::model::{MediaKind, MediaObject};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

#[async_trait]
/// Source of captured media metadata for an owner.
pub trait MediaSource: Send + Sync {
    /// List all media items owned by `owner_id`.
    async fn list_media(&self, owner_id: &str) -> Result<Vec<MediaObject>, IngestError>;
}

/// Media source backed by a PostgREST-style endpoint.
pub struct RestMediaSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestMediaSource {
    /// Create a source for `base_url` (without the `/rest/v1` suffix).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Row shape returned by the media table.
#[derive(Debug, Deserialize)]
struct MediaRow {
    id: String,
    user_id: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl MediaSource for RestMediaSource {
    async fn list_media(&self, owner_id: &str) -> Result<Vec<MediaObject>, IngestError> {
        let url = format!("{}/rest/v1/media", self.base_url);
        let owner_filter = format!("eq.{owner_id}");
        let response = self
            .client
            .get(&url)
            .query(&[("user_id", owner_filter.as_str()), ("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| IngestError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status(status.as_u16()));
        }
        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|err| IngestError::Transport(err.to_string()))?;
        debug!("fetched media metadata (owner={owner_id}, items={})", rows.len());
        Ok(rows
            .into_iter()
            .map(|row| MediaObject {
                id: row.id,
                owner_id: row.user_id,
                kind: MediaKind::parse(row.kind.as_deref().unwrap_or("image")),
                file_url: row.file_url.unwrap_or_default(),
                file_name: row.file_name.unwrap_or_default(),
                captured_at: row.created_at,
            })
            .collect())
    }
}
