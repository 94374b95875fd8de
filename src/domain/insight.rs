use crate::domain::sentinel::Sentinel;
use serde::{Deserialize, Serialize};

/// Strategic market insight for a brand. `news_digest` comes from a secondary
/// enrichment call and degrades to a sentinel when that call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsight {
    pub brand: String,
    pub summary: String,
    pub trends: Vec<String>,
    pub recommendations: Vec<String>,
    pub news_digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarketInsight {
    /// Same shape as a successful insight, every informational field carrying
    /// the server-error sentinel, so consumers render it without branching.
    pub fn fallback(brand: &str, message: &str) -> Self {
        let no_data = Sentinel::ServerError.as_str().to_string();
        Self {
            brand: brand.to_string(),
            summary: no_data.clone(),
            trends: vec![no_data.clone()],
            recommendations: vec![no_data.clone()],
            news_digest: no_data,
            error: Some(message.to_string()),
        }
    }
}
