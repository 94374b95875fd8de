pub mod competitor_research;
pub mod creative;
pub mod market_insight;
pub mod normalizer;
pub mod swot;
