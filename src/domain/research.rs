use serde::{Deserialize, Serialize};

/// One competitor-research invocation: the client/product focus the operator
/// picked, plus the id under which the resulting rows are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRun {
    pub id: String,
    pub client_name: String,
    pub product_focus: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ResearchRun {
    pub fn new(client_name: &str, product_focus: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_name: client_name.to_string(),
            product_focus: product_focus.to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}
