use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    CompetitorResearchUseCase, CreativeUseCase, MarketInsightUseCase, SwotUseCase,
};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::postgres::PostgresRepository;
use crate::infrastructure::llm_clients::{GeminiClient, GenerativeClient};
use crate::infrastructure::retry::RetryPolicy;
use crate::infrastructure::webhooks::WorkflowWebhookClient;
use crate::interfaces::http::AppState;

const OUTBOUND_MAX_ATTEMPTS: u32 = 3;
const OUTBOUND_BACKOFF_MS: u64 = 500;

pub async fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let repository = Arc::new(
        PostgresRepository::init(&config.database.url, config.database.max_connections).await?,
    );

    let retry = RetryPolicy::new(
        OUTBOUND_MAX_ATTEMPTS,
        Duration::from_millis(OUTBOUND_BACKOFF_MS),
    );

    let generative: Arc<dyn GenerativeClient + Send + Sync> =
        Arc::new(GeminiClient::new(config.generative.clone(), retry));
    let webhook = Arc::new(WorkflowWebhookClient::new(
        config.webhooks.timeout_secs,
        retry,
    ));

    let research_use_case = CompetitorResearchUseCase::new(
        webhook.clone(),
        config.webhooks.research_url.clone(),
        repository.clone(),
    );
    let insight_use_case = MarketInsightUseCase::new(generative.clone(), repository.clone());
    let swot_use_case = SwotUseCase::new(generative.clone(), repository.clone());
    let creative_use_case = CreativeUseCase::new(
        webhook.clone(),
        config.webhooks.creative_url.clone(),
        config.webhooks.remix_url.clone(),
        repository.clone(),
    );

    Ok(Arc::new(AppState {
        research_use_case,
        insight_use_case,
        swot_use_case,
        creative_use_case,
        repository,
    }))
}
