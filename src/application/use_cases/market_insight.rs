use super::normalizer::{string_list, string_or_list};
use crate::domain::error::Result;
use crate::domain::insight::MarketInsight;
use crate::domain::sentinel::Sentinel;
use crate::infrastructure::db::postgres::PostgresRepository;
use crate::infrastructure::llm_clients::GenerativeClient;
use crate::infrastructure::response::{parse_provider_payload, ParsedPayload};
use std::sync::Arc;
use tracing::warn;

pub struct MarketInsightUseCase {
    generative: Arc<dyn GenerativeClient + Send + Sync>,
    repository: Arc<PostgresRepository>,
}

impl MarketInsightUseCase {
    pub fn new(
        generative: Arc<dyn GenerativeClient + Send + Sync>,
        repository: Arc<PostgresRepository>,
    ) -> Self {
        Self {
            generative,
            repository,
        }
    }

    /// Trend analysis is the primary call; the news digest is enrichment.
    /// A failed digest call is logged and the insight still ships with the
    /// digest defaulted. A failed primary call surfaces as an error.
    pub async fn execute(&self, brand: &str, market: &str, grounding: bool) -> Result<MarketInsight> {
        let raw = self
            .generative
            .generate(&build_trend_prompt(brand, market), grounding)
            .await?;
        let mut insight = parse_insight(brand, &raw);

        let digest = self
            .generative
            .generate(&build_news_prompt(brand, market), grounding)
            .await;
        apply_news_digest(&mut insight, digest);

        self.repository.insert_insight(&insight).await?;
        Ok(insight)
    }
}

fn parse_insight(brand: &str, raw: &str) -> MarketInsight {
    match parse_provider_payload(raw) {
        ParsedPayload::Value(value) => MarketInsight {
            brand: brand.to_string(),
            summary: string_or_list(value.get("summary")),
            trends: string_list(value.get("trends")),
            recommendations: string_list(value.get("recommendations")),
            news_digest: Sentinel::NoData.as_str().to_string(),
            error: None,
        },
        ParsedPayload::Invalid { error, .. } => MarketInsight::fallback(brand, &error),
    }
}

fn apply_news_digest(insight: &mut MarketInsight, digest: Result<String>) {
    match digest {
        Ok(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                insight.news_digest = trimmed.to_string();
            }
        }
        Err(err) => {
            warn!(brand = %insight.brand, error = %err, "news digest call failed, keeping default");
        }
    }
}

fn build_trend_prompt(brand: &str, market: &str) -> String {
    format!(
        "You are a marketing strategist. Analyze current market trends for the brand below.\n\
Brand: {brand}\n\
Market: {market}\n\
Requirements:\n\
- Respond with ONLY a JSON object. No markdown, no explanations.\n\
- Use exactly this schema: {{\"summary\": string, \"trends\": [string], \"recommendations\": [string]}}\n\
- Keep every entry short and actionable.\n"
    )
}

fn build_news_prompt(brand: &str, market: &str) -> String {
    format!(
        "Summarize the most relevant recent news for the brand below in one short paragraph of plain text.\n\
Brand: {brand}\n\
Market: {market}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;

    #[test]
    fn test_fenced_response_parses_into_insight() {
        let raw = "```json\n{\"summary\": \"Growing\", \"trends\": [\"video\"], \"recommendations\": [\"post more\"]}\n```";
        let insight = parse_insight("Acme", raw);
        assert_eq!(insight.summary, "Growing");
        assert_eq!(insight.trends, vec!["video".to_string()]);
        assert_eq!(insight.news_digest, "N/A");
        assert!(insight.error.is_none());
    }

    #[test]
    fn test_prose_response_becomes_fallback() {
        let insight = parse_insight("Acme", "I could not find any data");
        assert_eq!(insight.summary, Sentinel::ServerError.as_str());
        assert_eq!(insight.trends, vec![Sentinel::ServerError.as_str().to_string()]);
        assert!(insight.error.is_some());
    }

    #[test]
    fn test_digest_failure_keeps_primary_result() {
        let mut insight = parse_insight("Acme", r#"{"summary": "ok", "trends": [], "recommendations": []}"#);
        apply_news_digest(
            &mut insight,
            Err(AppError::UpstreamError("timeout".to_string())),
        );
        assert_eq!(insight.summary, "ok");
        assert_eq!(insight.news_digest, "N/A");
        assert!(insight.error.is_none());
    }

    #[test]
    fn test_digest_success_replaces_default() {
        let mut insight = parse_insight("Acme", r#"{"summary": "ok"}"#);
        apply_news_digest(&mut insight, Ok("  Fresh funding round announced.  ".to_string()));
        assert_eq!(insight.news_digest, "Fresh funding round announced.");
    }

    #[test]
    fn test_empty_digest_keeps_default() {
        let mut insight = parse_insight("Acme", r#"{"summary": "ok"}"#);
        apply_news_digest(&mut insight, Ok("   ".to_string()));
        assert_eq!(insight.news_digest, "N/A");
    }
}
