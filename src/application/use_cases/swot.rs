use super::normalizer::{string_list, string_or_list};
use crate::domain::error::Result;
use crate::domain::swot::SwotReport;
use crate::infrastructure::db::postgres::PostgresRepository;
use crate::infrastructure::llm_clients::GenerativeClient;
use crate::infrastructure::response::{parse_provider_payload, ParsedPayload};
use std::sync::Arc;
use tracing::warn;

pub struct SwotUseCase {
    generative: Arc<dyn GenerativeClient + Send + Sync>,
    repository: Arc<PostgresRepository>,
}

impl SwotUseCase {
    pub fn new(
        generative: Arc<dyn GenerativeClient + Send + Sync>,
        repository: Arc<PostgresRepository>,
    ) -> Self {
        Self {
            generative,
            repository,
        }
    }

    pub async fn execute(
        &self,
        brand: &str,
        context: Option<&str>,
        grounding: bool,
    ) -> Result<SwotReport> {
        let raw = self
            .generative
            .generate(&build_swot_prompt(brand, context), grounding)
            .await?;

        let report = parse_swot(brand, &raw);
        if let Some(error) = &report.error {
            warn!(brand = %brand, error = %error, "SWOT payload unusable, storing fallback");
        }

        self.repository.insert_swot(&report).await?;
        Ok(report)
    }
}

fn parse_swot(brand: &str, raw: &str) -> SwotReport {
    match parse_provider_payload(raw) {
        ParsedPayload::Value(value) => SwotReport {
            brand: brand.to_string(),
            strengths: string_list(value.get("strengths")),
            weaknesses: string_list(value.get("weaknesses")),
            opportunities: string_list(value.get("opportunities")),
            threats: string_list(value.get("threats")),
            summary: string_or_list(value.get("summary")),
            error: None,
        },
        ParsedPayload::Invalid { error, .. } => SwotReport::fallback(brand, &error),
    }
}

fn build_swot_prompt(brand: &str, context: Option<&str>) -> String {
    let context_line = context
        .map(|c| format!("Additional context: {}\n", c))
        .unwrap_or_default();
    format!(
        "You are a marketing strategist. Produce a SWOT analysis for the brand below.\n\
Brand: {brand}\n\
{context_line}\
Requirements:\n\
- Respond with ONLY a JSON object. No markdown, no explanations.\n\
- Use exactly this schema: {{\"strengths\": [string], \"weaknesses\": [string], \"opportunities\": [string], \"threats\": [string], \"summary\": string}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentinel::Sentinel;
    use std::collections::HashSet;

    #[test]
    fn test_valid_payload_parses_into_report() {
        let raw = r#"{"strengths": ["brand recall"], "weaknesses": ["pricing"],
            "opportunities": ["new market"], "threats": ["entrants"], "summary": "solid"}"#;
        let report = parse_swot("Acme", raw);
        assert_eq!(report.strengths, vec!["brand recall".to_string()]);
        assert_eq!(report.summary, "solid");
        assert!(report.error.is_none());
    }

    #[test]
    fn test_unusable_payload_becomes_fallback() {
        let report = parse_swot("Acme", "no json here");
        assert_eq!(report.summary, Sentinel::ServerError.as_str());
        assert_eq!(report.strengths, vec![Sentinel::ServerError.as_str().to_string()]);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_fallback_keys_cover_success_keys() {
        let success = parse_swot("Acme", r#"{"strengths": ["a"], "summary": "s"}"#);
        let fallback = SwotReport::fallback("Acme", "upstream broke");

        let success_keys: HashSet<String> = serde_json::to_value(&success)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        let fallback_keys: HashSet<String> = serde_json::to_value(&fallback)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();

        assert!(success_keys.is_subset(&fallback_keys));
    }

    #[test]
    fn test_string_valued_lists_still_canonicalize() {
        // Some responses put a single string where the schema asks for arrays.
        let report = parse_swot("Acme", r#"{"strengths": "brand recall", "summary": ["a", "b"]}"#);
        assert!(report.strengths.is_empty());
        assert_eq!(report.summary, "a, b");
    }
}
