use crate::domain::error::{AppError, Result};
use crate::infrastructure::retry::RetryPolicy;
use serde_json::Value;

/// Client for workflow-automation webhooks. These endpoints take a JSON body
/// and answer with a JSON object, sometimes wrapped in a one-element array;
/// the body is returned as raw text so the response pipeline can repair it.
pub struct WorkflowWebhookClient {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl WorkflowWebhookClient {
    pub fn new(timeout_secs: u64, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            retry,
        }
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<String> {
        self.retry.run(|| self.dispatch(url, body)).await
    }

    async fn dispatch(&self, url: &str, body: &Value) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "Webhook error ({}): {}",
                status, text
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Failed to read response body: {}", e)))
    }
}
