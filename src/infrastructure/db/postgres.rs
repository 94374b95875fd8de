use crate::domain::competitor::Competitor;
use crate::domain::creative::{AssetKind, CreativeAsset};
use crate::domain::error::{AppError, Result};
use crate::domain::insight::MarketInsight;
use crate::domain::research::ResearchRun;
use crate::domain::swot::SwotReport;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS research_runs (
        id TEXT PRIMARY KEY,
        client_name TEXT NOT NULL,
        product_focus TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS competitors (
        id BIGSERIAL PRIMARY KEY,
        run_id TEXT NOT NULL REFERENCES research_runs(id) ON DELETE CASCADE,
        is_client BOOLEAN NOT NULL DEFAULT FALSE,
        name TEXT NOT NULL,
        website TEXT,
        facebook_url TEXT,
        services TEXT[] NOT NULL DEFAULT '{}',
        service_categories TEXT[] NOT NULL DEFAULT '{}',
        pricing TEXT NOT NULL,
        target_audience TEXT NOT NULL,
        usp TEXT NOT NULL,
        brand_tone TEXT NOT NULL,
        strengths TEXT[] NOT NULL DEFAULT '{}',
        weaknesses TEXT[] NOT NULL DEFAULT '{}',
        complaints TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS market_insights (
        id BIGSERIAL PRIMARY KEY,
        brand TEXT NOT NULL,
        summary TEXT NOT NULL,
        trends TEXT[] NOT NULL DEFAULT '{}',
        recommendations TEXT[] NOT NULL DEFAULT '{}',
        news_digest TEXT NOT NULL,
        error TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS swot_reports (
        id BIGSERIAL PRIMARY KEY,
        brand TEXT NOT NULL,
        strengths TEXT[] NOT NULL DEFAULT '{}',
        weaknesses TEXT[] NOT NULL DEFAULT '{}',
        opportunities TEXT[] NOT NULL DEFAULT '{}',
        threats TEXT[] NOT NULL DEFAULT '{}',
        summary TEXT NOT NULL,
        error TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS creative_assets (
        id TEXT PRIMARY KEY,
        brand TEXT NOT NULL,
        prompt TEXT NOT NULL,
        kind TEXT NOT NULL,
        image_url TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

pub struct PostgresRepository {
    pool: Pool<Postgres>,
}

impl PostgresRepository {
    pub async fn init(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to create table: {}", e)))?;
        }

        Ok(Self { pool })
    }

    pub async fn insert_run(&self, run: &ResearchRun) -> Result<()> {
        sqlx::query(
            "INSERT INTO research_runs (id, client_name, product_focus, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&run.id)
        .bind(&run.client_name)
        .bind(&run.product_focus)
        .bind(run.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save research run: {}", e)))?;
        Ok(())
    }

    pub async fn get_run(&self, run_id: &str) -> Result<Option<ResearchRun>> {
        sqlx::query_as::<_, ResearchRunEntity>(
            "SELECT id, client_name, product_focus, created_at FROM research_runs WHERE id = $1",
        )
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch research run: {}", e)))
        .map(|entity| entity.map(|e| e.into()))
    }

    pub async fn delete_run(&self, run_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM research_runs WHERE id = $1")
            .bind(run_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete research run: {}", e)))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_competitors(
        &self,
        run_id: &str,
        client: Option<&Competitor>,
        competitors: &[Competitor],
    ) -> Result<()> {
        if let Some(client) = client {
            self.insert_competitor_row(run_id, true, client).await?;
        }
        for competitor in competitors {
            self.insert_competitor_row(run_id, false, competitor).await?;
        }
        Ok(())
    }

    async fn insert_competitor_row(
        &self,
        run_id: &str,
        is_client: bool,
        competitor: &Competitor,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO competitors (run_id, is_client, name, website, facebook_url,
                 services, service_categories, pricing, target_audience, usp, brand_tone,
                 strengths, weaknesses, complaints)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(run_id)
        .bind(is_client)
        .bind(&competitor.name)
        .bind(&competitor.website)
        .bind(&competitor.facebook_url)
        .bind(&competitor.services)
        .bind(&competitor.service_categories)
        .bind(&competitor.pricing)
        .bind(&competitor.target_audience)
        .bind(&competitor.usp)
        .bind(&competitor.brand_tone)
        .bind(&competitor.strengths)
        .bind(&competitor.weaknesses)
        .bind(&competitor.complaints)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save competitor: {}", e)))?;
        Ok(())
    }

    pub async fn client_row(&self, run_id: &str) -> Result<Option<Competitor>> {
        sqlx::query_as::<_, CompetitorEntity>(
            "SELECT name, website, facebook_url, services, service_categories, pricing,
                 target_audience, usp, brand_tone, strengths, weaknesses, complaints
             FROM competitors WHERE run_id = $1 AND is_client ORDER BY id LIMIT 1",
        )
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch client row: {}", e)))
        .map(|entity| entity.map(|e| e.into()))
    }

    pub async fn list_competitors(&self, run_id: &str) -> Result<Vec<Competitor>> {
        sqlx::query_as::<_, CompetitorEntity>(
            "SELECT name, website, facebook_url, services, service_categories, pricing,
                 target_audience, usp, brand_tone, strengths, weaknesses, complaints
             FROM competitors WHERE run_id = $1 AND NOT is_client ORDER BY id",
        )
        .bind(run_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch competitors: {}", e)))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }

    pub async fn update_competitor(&self, id: i64, competitor: &Competitor) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE competitors SET name = $2, website = $3, facebook_url = $4,
                 services = $5, service_categories = $6, pricing = $7,
                 target_audience = $8, usp = $9, brand_tone = $10,
                 strengths = $11, weaknesses = $12, complaints = $13
             WHERE id = $1",
        )
        .bind(id)
        .bind(&competitor.name)
        .bind(&competitor.website)
        .bind(&competitor.facebook_url)
        .bind(&competitor.services)
        .bind(&competitor.service_categories)
        .bind(&competitor.pricing)
        .bind(&competitor.target_audience)
        .bind(&competitor.usp)
        .bind(&competitor.brand_tone)
        .bind(&competitor.strengths)
        .bind(&competitor.weaknesses)
        .bind(&competitor.complaints)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update competitor: {}", e)))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_insight(&self, insight: &MarketInsight) -> Result<()> {
        sqlx::query(
            "INSERT INTO market_insights (brand, summary, trends, recommendations, news_digest, error)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&insight.brand)
        .bind(&insight.summary)
        .bind(&insight.trends)
        .bind(&insight.recommendations)
        .bind(&insight.news_digest)
        .bind(&insight.error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save market insight: {}", e)))?;
        Ok(())
    }

    pub async fn insert_swot(&self, report: &SwotReport) -> Result<()> {
        sqlx::query(
            "INSERT INTO swot_reports (brand, strengths, weaknesses, opportunities, threats, summary, error)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&report.brand)
        .bind(&report.strengths)
        .bind(&report.weaknesses)
        .bind(&report.opportunities)
        .bind(&report.threats)
        .bind(&report.summary)
        .bind(&report.error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save SWOT report: {}", e)))?;
        Ok(())
    }

    pub async fn insert_asset(&self, asset: &CreativeAsset) -> Result<()> {
        sqlx::query(
            "INSERT INTO creative_assets (id, brand, prompt, kind, image_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&asset.id)
        .bind(&asset.brand)
        .bind(&asset.prompt)
        .bind(asset.kind.as_str())
        .bind(&asset.image_url)
        .bind(asset.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save creative asset: {}", e)))?;
        Ok(())
    }

    pub async fn list_assets(&self, brand: &str) -> Result<Vec<CreativeAsset>> {
        sqlx::query_as::<_, CreativeAssetEntity>(
            "SELECT id, brand, prompt, kind, image_url, created_at
             FROM creative_assets WHERE brand = $1 ORDER BY created_at DESC",
        )
        .bind(brand)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch creative assets: {}", e)))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }
}

// Internal entities for database mapping

#[derive(sqlx::FromRow)]
struct ResearchRunEntity {
    id: String,
    client_name: String,
    product_focus: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ResearchRunEntity> for ResearchRun {
    fn from(e: ResearchRunEntity) -> Self {
        Self {
            id: e.id,
            client_name: e.client_name,
            product_focus: e.product_focus,
            created_at: e.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CompetitorEntity {
    name: String,
    website: Option<String>,
    facebook_url: Option<String>,
    services: Vec<String>,
    service_categories: Vec<String>,
    pricing: String,
    target_audience: String,
    usp: String,
    brand_tone: String,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    complaints: Vec<String>,
}

impl From<CompetitorEntity> for Competitor {
    fn from(e: CompetitorEntity) -> Self {
        Self {
            name: e.name,
            website: e.website,
            facebook_url: e.facebook_url,
            services: e.services,
            service_categories: e.service_categories,
            pricing: e.pricing,
            target_audience: e.target_audience,
            usp: e.usp,
            brand_tone: e.brand_tone,
            strengths: e.strengths,
            weaknesses: e.weaknesses,
            complaints: e.complaints,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CreativeAssetEntity {
    id: String,
    brand: String,
    prompt: String,
    kind: String,
    image_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CreativeAssetEntity> for CreativeAsset {
    fn from(e: CreativeAssetEntity) -> Self {
        Self {
            id: e.id,
            brand: e.brand,
            prompt: e.prompt,
            kind: AssetKind::parse(&e.kind),
            image_url: e.image_url,
            created_at: e.created_at,
        }
    }
}
