use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Generate,
    Remix,
}

impl AssetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetKind::Generate => "generate",
            AssetKind::Remix => "remix",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "remix" => AssetKind::Remix,
            _ => AssetKind::Generate,
        }
    }
}

/// A generated or remixed creative handed back by the image workflow.
/// `image_url` is absent when the workflow returned no usable location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeAsset {
    pub id: String,
    pub brand: String,
    pub prompt: String,
    pub kind: AssetKind,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CreativeAsset {
    pub fn new(brand: &str, prompt: &str, kind: AssetKind, image_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            brand: brand.to_string(),
            prompt: prompt.to_string(),
            kind,
            image_url,
            created_at: chrono::Utc::now(),
        }
    }
}
