pub mod use_cases;

pub use use_cases::competitor_research::CompetitorResearchUseCase;
pub use use_cases::creative::CreativeUseCase;
pub use use_cases::market_insight::MarketInsightUseCase;
pub use use_cases::swot::SwotUseCase;
