//! Remote storage adapter.
//!
//! Same contract as the local adapter over three HTTP endpoints: GET
//! (load), POST (save), DELETE (clear), each authorized by a bearer token
//! from the auth collaborator. Load failures degrade to `[]` at the
//! [`BookmarkStore`] boundary; the inherent `try_*` methods keep the failure
//! visible for callers that decide on fallback (the hydration pipeline).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use super::BookmarkStore;
use crate::types::bookmark::BookmarkGroup;
use crate::types::errors::{RemoteError, StoreError};

/// Auth collaborator handing out bearer tokens. Interface only; sign-in
/// lives outside this subsystem.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, RemoteError>;
}

pub struct RemoteAdapter {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RemoteAdapter {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    fn endpoint(&self, workspace_id: &str, key: &str) -> String {
        format!(
            "{}/workspaces/{}/{}",
            self.base_url.trim_end_matches('/'),
            workspace_id,
            key
        )
    }

    /// Loads the collection, keeping failures visible.
    pub async fn try_load_groups(
        &self,
        workspace_id: &str,
        key: &str,
    ) -> Result<Vec<BookmarkGroup>, RemoteError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .client
            .get(self.endpoint(workspace_id, key))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Backend(
                status.as_u16(),
                backend_message(status.as_u16(), &body, "load"),
            ));
        }
        response
            .json::<Vec<BookmarkGroup>>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    /// Saves the collection. Non-2xx surfaces the backend's message.
    pub async fn save_groups(
        &self,
        workspace_id: &str,
        key: &str,
        groups: &[BookmarkGroup],
    ) -> Result<(), RemoteError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .client
            .post(self.endpoint(workspace_id, key))
            .bearer_auth(token)
            .json(groups)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        check_status(response, "save").await
    }

    /// Clears the collection. Non-2xx surfaces the backend's message.
    pub async fn clear_groups(&self, workspace_id: &str, key: &str) -> Result<(), RemoteError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .client
            .delete(self.endpoint(workspace_id, key))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        check_status(response, "clear").await
    }
}

#[async_trait]
impl BookmarkStore for RemoteAdapter {
    /// Degrades any load failure to `[]`, matching the lenient read rule.
    async fn read_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
    ) -> Result<Vec<BookmarkGroup>, StoreError> {
        match self.try_load_groups(workspace_id, key).await {
            Ok(groups) => Ok(groups),
            Err(e) => {
                warn!(workspace_id, error = %e, "remote load failed, returning empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_all_groups(
        &self,
        workspace_id: &str,
        key: &str,
        groups: &[BookmarkGroup],
    ) -> Result<(), StoreError> {
        self.save_groups(workspace_id, key, groups)
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))
    }

    async fn clear_all_groups(&self, workspace_id: &str, key: &str) -> Result<(), StoreError> {
        self.clear_groups(workspace_id, key)
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response, action: &str) -> Result<(), RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Backend(
        status.as_u16(),
        backend_message(status.as_u16(), &body, action),
    ))
}

/// Prefers the backend's own `{message}`; falls back to a status-derived one.
fn backend_message(status: u16, body: &str, action: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("remote {} failed with status {}", action, status))
}
