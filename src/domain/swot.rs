use crate::domain::sentinel::Sentinel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotReport {
    pub brand: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SwotReport {
    pub fn fallback(brand: &str, message: &str) -> Self {
        let no_data = Sentinel::ServerError.as_str().to_string();
        Self {
            brand: brand.to_string(),
            strengths: vec![no_data.clone()],
            weaknesses: vec![no_data.clone()],
            opportunities: vec![no_data.clone()],
            threats: vec![no_data.clone()],
            summary: no_data,
            error: Some(message.to_string()),
        }
    }
}
