use crate::domain::creative::{AssetKind, CreativeAsset};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::postgres::PostgresRepository;
use crate::infrastructure::response::{parse_provider_payload, ParsedPayload};
use crate::infrastructure::webhooks::WorkflowWebhookClient;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

/// Thin glue around the image-generation and remix webhooks. No image
/// processing happens in-process; the workflow returns a hosted URL.
pub struct CreativeUseCase {
    webhook: Arc<WorkflowWebhookClient>,
    generate_url: String,
    remix_url: String,
    repository: Arc<PostgresRepository>,
}

impl CreativeUseCase {
    pub fn new(
        webhook: Arc<WorkflowWebhookClient>,
        generate_url: String,
        remix_url: String,
        repository: Arc<PostgresRepository>,
    ) -> Self {
        Self {
            webhook,
            generate_url,
            remix_url,
            repository,
        }
    }

    pub async fn generate(&self, brand: &str, prompt: &str) -> Result<CreativeAsset> {
        let body = json!({ "brand": brand, "prompt": prompt });
        self.dispatch(&self.generate_url, brand, prompt, AssetKind::Generate, &body)
            .await
    }

    pub async fn remix(&self, brand: &str, prompt: &str, source_image: &str) -> Result<CreativeAsset> {
        STANDARD.decode(source_image).map_err(|e| {
            AppError::ValidationError(format!("sourceImage is not valid base64: {}", e))
        })?;

        let body = json!({ "brand": brand, "prompt": prompt, "sourceImage": source_image });
        self.dispatch(&self.remix_url, brand, prompt, AssetKind::Remix, &body)
            .await
    }

    async fn dispatch(
        &self,
        url: &str,
        brand: &str,
        prompt: &str,
        kind: AssetKind,
        body: &Value,
    ) -> Result<CreativeAsset> {
        let raw = self.webhook.post(url, body).await?;
        let value = match parse_provider_payload(&raw) {
            ParsedPayload::Value(value) => value,
            ParsedPayload::Invalid { error, .. } => {
                return Err(AppError::ParseError(format!(
                    "Image webhook payload unusable: {}",
                    error
                )));
            }
        };

        let asset = CreativeAsset::new(brand, prompt, kind, extract_image_url(&value));
        self.repository.insert_asset(&asset).await?;
        Ok(asset)
    }
}

fn extract_image_url(value: &Value) -> Option<String> {
    let raw = value.get("imageUrl").and_then(Value::as_str)?.trim();
    if raw.is_empty() {
        return None;
    }
    match url::Url::parse(raw) {
        Ok(_) => Some(raw.to_string()),
        Err(err) => {
            warn!(url = raw, error = %err, "image webhook returned an unparseable URL");
            None
        }
    }
}
