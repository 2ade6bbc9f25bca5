//! Lead notification dispatch
//!
//! The workflow hands a `Lead` to a `Notifier` after a project is created.
//! Dispatch is fire-and-forget from the workflow's perspective: a failure
//! propagates to the caller but the already-committed project row stays.

use crate::projects::Lead;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Seam for dispatching lead notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the lead payload to the given operator address
    async fn send(&self, to: &str, lead: &Lead) -> Result<()>;
}

/// Notifier that posts the lead as JSON to an HTTP endpoint
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    /// Create a notifier for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, to: &str, lead: &Lead) -> Result<()> {
        let payload = json!({
            "to": to,
            "subject": format!("New project: {}", lead.title),
            "lead": lead,
        });

        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(Error::Notification(format!(
                "Endpoint {} answered {}",
                self.endpoint,
                response.status()
            )));
        }

        tracing::info!(to = %to, slug = %lead.slug, "Lead notification dispatched");
        Ok(())
    }
}

/// Notifier used when no endpoint is configured: logs the lead and succeeds
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, lead: &Lead) -> Result<()> {
        tracing::info!(
            to = %to,
            title = %lead.title,
            slug = %lead.slug,
            "Lead notification (no endpoint configured, logged only)"
        );
        Ok(())
    }
}
