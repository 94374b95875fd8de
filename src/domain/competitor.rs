use crate::domain::sentinel::Sentinel;
use serde::{Deserialize, Serialize};

/// A competitor record with every field in canonical form.
///
/// String-valued fields hold either real content or `"N/A"`, list fields are
/// always present (possibly empty), and URL fields are absolute https URLs or
/// `None`. Consumers never see `null` where a string is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub website: Option<String>,
    pub facebook_url: Option<String>,
    pub services: Vec<String>,
    pub service_categories: Vec<String>,
    pub pricing: String,
    pub target_audience: String,
    pub usp: String,
    pub brand_tone: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub complaints: Vec<String>,
}

impl Competitor {
    /// True when the record's name defaulted to the placeholder, i.e. the
    /// upstream row had no identity and cannot be shown to the operator.
    pub fn is_placeholder(&self) -> bool {
        self.name == Sentinel::UnknownName.as_str()
    }
}
