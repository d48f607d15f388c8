use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use nd_core::auth::{self, Credentials, Signup};
use nd_core::export::{self, PayoutReport, DEFAULT_ROWS_PER_PAGE};
use nd_core::stats::{self, AuthorCount, DailyCount, TypeCounts};
use nd_core::{
    sort_by_payout_desc, Article, AuthorPayout, ContentType, Dashboard, DashboardStats, FilterCriteria, FilterField,
    PayoutRate, User,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiResult;
use crate::AppState;

pub const CSV_FILENAME: &str = "author-payouts.csv";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub count: usize,
    pub used_fallback: bool,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterUpdate {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RateUpdate {
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub rows_per_page: Option<usize>,
}

pub const DEFAULT_ACTIVITY_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub days: Option<u32>,
}

fn sorted_payouts(dashboard: &Dashboard) -> Vec<AuthorPayout> {
    let mut payouts = dashboard.payouts().to_vec();
    sort_by_payout_desc(&mut payouts);
    payouts
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.dashboard.read().await.filtered().to_vec())
}

pub async fn refresh_articles(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let outcome = state.refresh().await;
    Json(RefreshResponse {
        count: outcome.articles.len(),
        used_fallback: outcome.used_fallback(),
        error: outcome.error,
    })
}

pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FilterCriteria> {
    Json(state.dashboard.read().await.criteria().clone())
}

pub async fn replace_filters(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilterCriteria>, JsonRejection>,
) -> ApiResult<Json<Vec<Article>>> {
    let Json(criteria) = payload?;
    Ok(Json(state.dashboard.write().await.apply_filter(criteria).to_vec()))
}

pub async fn update_filter(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilterUpdate>, JsonRejection>,
) -> ApiResult<Json<Vec<Article>>> {
    let Json(update) = payload?;
    let field: FilterField = update.key.parse()?;
    let mut dashboard = state.dashboard.write().await;
    Ok(Json(dashboard.update_filter(field, &update.value)?.to_vec()))
}

pub async fn reset_filters(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.dashboard.write().await.reset_filters().to_vec())
}

pub async fn list_authors(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.dashboard.read().await.unique_authors())
}

pub async fn get_rates(State(state): State<Arc<AppState>>) -> Json<Vec<PayoutRate>> {
    Json(state.dashboard.read().await.rates().to_rates())
}

pub async fn set_rate(
    State(state): State<Arc<AppState>>,
    Path(content_type): Path<String>,
    payload: Result<Json<RateUpdate>, JsonRejection>,
) -> ApiResult<Json<Vec<PayoutRate>>> {
    let Json(update) = payload?;
    let content_type: ContentType = content_type.parse()?;

    // Held across the write so stored tables land in the order they were set.
    let mut dashboard = state.dashboard.write().await;
    let previous = dashboard.rates().clone();
    let rates = dashboard.set_rate(content_type, update.rate)?.clone();
    if let Err(e) = rates.persist(state.store.as_ref()).await {
        error!("Failed to persist payout rates, keeping {:?}: {}", previous.to_rates(), e);
        dashboard.replace_rates(previous);
        return Err(e.into());
    }
    Ok(Json(rates.to_rates()))
}

pub async fn list_payouts(State(state): State<Arc<AppState>>) -> Json<Vec<AuthorPayout>> {
    Json(sorted_payouts(&*state.dashboard.read().await))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    Json(state.dashboard.read().await.stats())
}

pub async fn stats_by_author(State(state): State<Arc<AppState>>) -> Json<Vec<AuthorCount>> {
    Json(stats::articles_by_author(state.dashboard.read().await.articles()))
}

pub async fn stats_by_type(State(state): State<Arc<AppState>>) -> Json<TypeCounts> {
    Json(stats::articles_by_type(state.dashboard.read().await.articles()))
}

pub async fn stats_activity(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DailyCount>>> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(DEFAULT_ACTIVITY_DAYS);
    let dashboard = state.dashboard.read().await;
    Ok(Json(stats::daily_activity(dashboard.articles(), Utc::now().date_naive(), days)))
}

pub async fn export_csv(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let body = export::payouts_to_csv(&sorted_payouts(&*state.dashboard.read().await))?;
    let disposition = format!("attachment; filename=\"{}\"", CSV_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn export_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<PayoutReport>> {
    let Query(query) = query?;
    let rows_per_page = query.rows_per_page.unwrap_or(DEFAULT_ROWS_PER_PAGE);
    // Rows and rate header come from the same snapshot.
    let dashboard = state.dashboard.read().await;
    let payouts = sorted_payouts(&dashboard);
    Ok(Json(export::build_report(
        &payouts,
        dashboard.rates(),
        Utc::now().date_naive(),
        rows_per_page,
    )))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(credentials) = payload?;
    let user = state.auth.authenticate(&credentials).await?;
    auth::save_session(state.store.as_ref(), &user).await?;
    Ok(Json(user))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Signup>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(signup) = payload?;
    let user = state.auth.register(&signup).await?;
    auth::save_session(state.store.as_ref(), &user).await?;
    Ok(Json(user))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    auth::clear_session(state.store.as_ref()).await?;
    info!("User signed out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(State(state): State<Arc<AppState>>) -> Json<Option<User>> {
    Json(auth::load_session(state.store.as_ref()).await)
}
