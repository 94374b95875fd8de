use crate::application::use_cases::normalizer::normalize_competitor;
use crate::application::{
    CompetitorResearchUseCase, CreativeUseCase, MarketInsightUseCase, SwotUseCase,
};
use crate::domain::competitor::Competitor;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::postgres::PostgresRepository;
use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, put, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

pub struct AppState {
    pub research_use_case: CompetitorResearchUseCase,
    pub insight_use_case: MarketInsightUseCase,
    pub swot_use_case: SwotUseCase,
    pub creative_use_case: CreativeUseCase,
    pub repository: Arc<PostgresRepository>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::UpstreamError(_) | AppError::ParseError(_) => {
            HttpResponse::BadGateway().json(body)
        }
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn validation_failure(err: &validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: err.to_string(),
    })
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    #[validate(length(min = 1, message = "clientName must not be empty"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "productFocus must not be empty"))]
    pub product_focus: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResearchResponse {
    run_id: String,
    client: Option<Competitor>,
    competitors: Vec<Competitor>,
}

#[post("/research")]
async fn run_research(
    data: web::Data<AppState>,
    req: web::Json<ResearchRequest>,
) -> impl Responder {
    if let Err(err) = req.validate() {
        return validation_failure(&err);
    }

    info!(client = %req.client_name, focus = %req.product_focus, "starting competitor research");

    match data
        .research_use_case
        .execute(&req.client_name, &req.product_focus, req.website.as_deref())
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(ResearchResponse {
            run_id: outcome.run.id,
            client: outcome.client,
            competitors: outcome.competitors,
        }),
        Err(e) => {
            error!(error = %e, "competitor research failed");
            error_response(&e)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunCompetitorsResponse {
    run_id: String,
    client_name: String,
    product_focus: String,
    client: Option<Competitor>,
    competitors: Vec<Competitor>,
}

async fn fetch_run_competitors(
    data: &web::Data<AppState>,
    run_id: &str,
) -> Result<RunCompetitorsResponse> {
    let run = data
        .repository
        .get_run(run_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown research run: {}", run_id)))?;
    let client = data.repository.client_row(run_id).await?;
    let competitors = data.repository.list_competitors(run_id).await?;

    Ok(RunCompetitorsResponse {
        run_id: run.id,
        client_name: run.client_name,
        product_focus: run.product_focus,
        client,
        competitors,
    })
}

#[get("/research/{run_id}/competitors")]
async fn get_run_competitors(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let run_id = path.into_inner();
    match fetch_run_competitors(&data, &run_id).await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            error!(run_id = %run_id, error = %e, "failed to fetch run competitors");
            error_response(&e)
        }
    }
}

#[delete("/research/{run_id}")]
async fn delete_research_run(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let run_id = path.into_inner();
    match data.repository.delete_run(&run_id).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "deleted": run_id })),
        Ok(false) => error_response(&AppError::NotFound(format!(
            "Unknown research run: {}",
            run_id
        ))),
        Err(e) => {
            error!(run_id = %run_id, error = %e, "failed to delete research run");
            error_response(&e)
        }
    }
}

#[put("/competitors/{id}")]
async fn update_competitor(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let id = path.into_inner();
    // Operator edits go through the same canonicalization as provider rows.
    let competitor = normalize_competitor(&body);
    if competitor.is_placeholder() {
        return error_response(&AppError::ValidationError(
            "name must not be empty".to_string(),
        ));
    }

    match data.repository.update_competitor(id, &competitor).await {
        Ok(true) => HttpResponse::Ok().json(competitor),
        Ok(false) => error_response(&AppError::NotFound(format!("Unknown competitor: {}", id))),
        Err(e) => {
            error!(id, error = %e, "failed to update competitor");
            error_response(&e)
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "market must not be empty"))]
    pub market: String,
    #[serde(default)]
    pub grounding: bool,
}

#[post("/insight")]
async fn run_insight(data: web::Data<AppState>, req: web::Json<InsightRequest>) -> impl Responder {
    if let Err(err) = req.validate() {
        return validation_failure(&err);
    }

    info!(brand = %req.brand, grounding = req.grounding, "generating market insight");

    match data
        .insight_use_case
        .execute(&req.brand, &req.market, req.grounding)
        .await
    {
        Ok(insight) => HttpResponse::Ok().json(insight),
        Err(e) => {
            error!(error = %e, "market insight failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SwotRequest {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub grounding: bool,
}

#[post("/swot")]
async fn run_swot(data: web::Data<AppState>, req: web::Json<SwotRequest>) -> impl Responder {
    if let Err(err) = req.validate() {
        return validation_failure(&err);
    }

    info!(brand = %req.brand, "generating SWOT analysis");

    match data
        .swot_use_case
        .execute(&req.brand, req.context.as_deref(), req.grounding)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!(error = %e, "SWOT analysis failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCreativeRequest {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
}

#[post("/creative/generate")]
async fn generate_creative(
    data: web::Data<AppState>,
    req: web::Json<GenerateCreativeRequest>,
) -> impl Responder {
    if let Err(err) = req.validate() {
        return validation_failure(&err);
    }

    match data.creative_use_case.generate(&req.brand, &req.prompt).await {
        Ok(asset) => HttpResponse::Ok().json(asset),
        Err(e) => {
            error!(error = %e, "creative generation failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemixCreativeRequest {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
    #[validate(length(min = 1, message = "sourceImage must not be empty"))]
    pub source_image: String,
}

#[post("/creative/remix")]
async fn remix_creative(
    data: web::Data<AppState>,
    req: web::Json<RemixCreativeRequest>,
) -> impl Responder {
    if let Err(err) = req.validate() {
        return validation_failure(&err);
    }

    match data
        .creative_use_case
        .remix(&req.brand, &req.prompt, &req.source_image)
        .await
    {
        Ok(asset) => HttpResponse::Ok().json(asset),
        Err(e) => {
            error!(error = %e, "creative remix failed");
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
struct AssetQuery {
    brand: String,
}

#[get("/creative/assets")]
async fn list_creative_assets(
    data: web::Data<AppState>,
    query: web::Query<AssetQuery>,
) -> impl Responder {
    match data.repository.list_assets(&query.brand).await {
        Ok(assets) => HttpResponse::Ok().json(assets),
        Err(e) => {
            error!(brand = %query.brand, error = %e, "failed to list creative assets");
            error_response(&e)
        }
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn start_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<Server> {
    let data = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // UI origin is deployment-specific

        App::new().wrap(cors).app_data(data.clone()).service(
            web::scope("/api")
                .service(health)
                .service(run_research)
                .service(get_run_competitors)
                .service(delete_research_run)
                .service(update_competitor)
                .service(run_insight)
                .service(run_swot)
                .service(generate_creative)
                .service(remix_creative)
                .service(list_creative_assets),
        )
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
