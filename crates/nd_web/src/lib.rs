use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/refresh", post(handlers::refresh_articles))
        .route(
            "/api/filters",
            get(handlers::get_filters)
                .put(handlers::replace_filters)
                .patch(handlers::update_filter)
                .delete(handlers::reset_filters),
        )
        .route("/api/authors", get(handlers::list_authors))
        .route("/api/rates", get(handlers::get_rates))
        .route("/api/rates/:type", put(handlers::set_rate))
        .route("/api/payouts", get(handlers::list_payouts))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/stats/authors", get(handlers::stats_by_author))
        .route("/api/stats/types", get(handlers::stats_by_type))
        .route("/api/stats/activity", get(handlers::stats_activity))
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/export/report", get(handlers::export_report))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::current_session))
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::{create_app, ApiError, AppState};
    pub use nd_core::{Article, Error, Result};
}
