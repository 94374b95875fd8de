use super::normalizer::normalize_competitor;
use crate::domain::competitor::Competitor;
use crate::domain::error::{AppError, Result};
use crate::domain::research::ResearchRun;
use crate::infrastructure::db::postgres::PostgresRepository;
use crate::infrastructure::response::{parse_provider_payload, ParsedPayload};
use crate::infrastructure::webhooks::WorkflowWebhookClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct ResearchOutcome {
    pub run: ResearchRun,
    pub client: Option<Competitor>,
    pub competitors: Vec<Competitor>,
}

pub struct CompetitorResearchUseCase {
    webhook: Arc<WorkflowWebhookClient>,
    webhook_url: String,
    repository: Arc<PostgresRepository>,
}

impl CompetitorResearchUseCase {
    pub fn new(
        webhook: Arc<WorkflowWebhookClient>,
        webhook_url: String,
        repository: Arc<PostgresRepository>,
    ) -> Self {
        Self {
            webhook,
            webhook_url,
            repository,
        }
    }

    pub async fn execute(
        &self,
        client_name: &str,
        product_focus: &str,
        website: Option<&str>,
    ) -> Result<ResearchOutcome> {
        let body = json!({
            "clientName": client_name,
            "productFocus": product_focus,
            "website": website,
        });

        let raw = self.webhook.post(&self.webhook_url, &body).await?;
        let (client, competitors) = assemble_competitors(&raw)?;

        let run = ResearchRun::new(client_name, product_focus);
        self.repository.insert_run(&run).await?;
        self.repository
            .insert_competitors(&run.id, client.as_ref(), &competitors)
            .await?;

        info!(
            run_id = %run.id,
            competitors = competitors.len(),
            "competitor research completed"
        );

        Ok(ResearchOutcome {
            run,
            client,
            competitors,
        })
    }
}

/// Turns raw webhook text into the client row plus usable competitor rows.
///
/// The workflow provider puts the analyzed brand itself at position 0 of the
/// competitor array; that positional convention is kept here and nowhere
/// else. Rows whose name defaulted to the placeholder are dropped.
fn assemble_competitors(raw: &str) -> Result<(Option<Competitor>, Vec<Competitor>)> {
    let value = match parse_provider_payload(raw) {
        ParsedPayload::Value(value) => value,
        ParsedPayload::Invalid { error, .. } => {
            return Err(AppError::ParseError(format!(
                "Webhook payload unusable: {}",
                error
            )));
        }
    };

    let rows = competitor_rows(&value);
    if rows.is_empty() {
        return Err(AppError::UpstreamError(
            "Webhook response contained no competitor records".to_string(),
        ));
    }

    let mut normalized: Vec<Competitor> = rows.iter().map(normalize_competitor).collect();
    let client = normalized.remove(0);
    let client = if client.is_placeholder() {
        None
    } else {
        Some(client)
    };
    normalized.retain(|competitor| !competitor.is_placeholder());

    Ok((client, normalized))
}

fn competitor_rows(value: &Value) -> Vec<Value> {
    if let Some(Value::Array(items)) = value.get("competitors") {
        return items.clone();
    }
    if value.get("name").is_some() {
        return vec![value.clone()];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_array_response_splits_client_and_competitors() {
        let raw = r#"[{"competitors": [
            {"name": "My Brand", "website": "mybrand.example.com"},
            {"name": "Rival One", "pricing": ["$10", "$20"]},
            {"name": "Rival Two"}
        ]}]"#;

        let (client, competitors) = assemble_competitors(raw).expect("payload should assemble");
        assert_eq!(client.expect("client row").name, "My Brand");
        assert_eq!(competitors.len(), 2);
        assert_eq!(competitors[0].pricing, "$10, $20");
    }

    #[test]
    fn test_nameless_rows_are_filtered_out() {
        let raw = r#"{"competitors": [
            {"name": "My Brand"},
            {"pricing": "$5"},
            {"name": "Rival"}
        ]}"#;

        let (_, competitors) = assemble_competitors(raw).expect("payload should assemble");
        assert_eq!(competitors.len(), 1);
        assert_eq!(competitors[0].name, "Rival");
    }

    #[test]
    fn test_nameless_client_row_becomes_none() {
        let raw = r#"{"competitors": [{"pricing": "$5"}, {"name": "Rival"}]}"#;
        let (client, competitors) = assemble_competitors(raw).expect("payload should assemble");
        assert!(client.is_none());
        assert_eq!(competitors.len(), 1);
    }

    #[test]
    fn test_prose_response_is_a_parse_error() {
        let result = assemble_competitors("sorry, the workflow is down right now");
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_response_without_rows_is_an_upstream_error() {
        let result = assemble_competitors(r#"{"status": "ok"}"#);
        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }

    #[test]
    fn test_trailing_comma_payload_still_assembles() {
        let raw = "{\"competitors\": [{\"name\": \"My Brand\"}, {\"name\": \"Rival\"},]}";
        let (client, competitors) = assemble_competitors(raw).expect("repaired payload assembles");
        assert_eq!(client.expect("client row").name, "My Brand");
        assert_eq!(competitors.len(), 1);
    }
}
