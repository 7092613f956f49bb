//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::companies::{Company, CompanyFilter, CompanyStats, CompanySummary, NewCompany};
use crate::ingest::{IngestedSummary, RunOptions, SourceFailure};
use crate::sources::{SourceInfo, UnavailableSource};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// List companies matching the query filter
pub async fn list_companies(
    State(state): State<AppState>,
    Query(filter): Query<CompanyFilter>,
) -> Result<Json<Vec<CompanySummary>>, ApiError> {
    let companies = state.store.list(&filter).await?;
    Ok(Json(companies.iter().map(Company::summary).collect()))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(new): Json<NewCompany>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    new.validate().map_err(ApiError::InvalidInput)?;
    let company = state.sink().create(new).await?;
    info!("Created company {} through the API", company.name);
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Company>, ApiError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Replace every editable field of a company
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<NewCompany>,
) -> Result<Json<Company>, ApiError> {
    update.validate().map_err(ApiError::InvalidInput)?;
    state
        .sink()
        .replace(id, update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.sink().remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<CompanySummary>,
}

/// Free text search across all company fields
pub async fn search_companies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => {
            return Err(ApiError::InvalidInput(
                "Query parameter 'q' is required".to_string(),
            ))
        }
    };

    let companies = state.store.list(&CompanyFilter::search(&query)).await?;
    Ok(Json(SearchResponse {
        count: companies.len(),
        results: companies.iter().map(Company::summary).collect(),
        query,
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<CompanyStats>, ApiError> {
    let companies = state.store.list(&CompanyFilter::new()).await?;
    Ok(Json(CompanyStats::from_companies(&companies)))
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub available: Vec<SourceInfo>,
    pub unavailable: Vec<UnavailableSource>,
}

/// Loaded and unavailable sources
pub async fn sources(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry();
    Json(SourcesResponse {
        available: registry.available_sources(),
        unavailable: registry.unavailable().to_vec(),
    })
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Source id, or `all`
    #[serde(default = "all_sources")]
    pub source: String,
    pub query: Option<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub dry_run: bool,
}

fn all_sources() -> String {
    "all".to_string()
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub processed: usize,
    pub dry_run: bool,
    pub companies: Vec<IngestedSummary>,
    pub failures: Vec<SourceFailure>,
    pub skipped: usize,
}

/// Trigger an ingestion run and wait for it to finish
pub async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let limit = request
        .limit
        .unwrap_or(state.settings.ingestion.default_limit);
    let query = request.query.as_deref().filter(|q| !q.trim().is_empty());
    let options = RunOptions::new().dry_run(request.dry_run);

    let report = if request.source == "all" {
        state.ingestor.run_all(query, limit, &options).await?
    } else {
        state
            .ingestor
            .run_one(&request.source, query, limit, &options)
            .await?
    };

    Ok(Json(IngestResponse {
        processed: report.len(),
        dry_run: request.dry_run,
        companies: report.summaries(),
        failures: report.failures,
        skipped: report.skipped,
    }))
}
