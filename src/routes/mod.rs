use axum::{
    Json, Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use serde::Serialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::middleware::auth_middleware;

mod health;
mod participations;
mod players;
mod socials;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub command: courtside_social::Command,
    pub query: courtside_social::Query,
    pub pool: SqlitePool,
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Reply<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn reply<T: Serialize>(message: impl Into<String>, data: T) -> Json<Reply<T>> {
    Json(Reply {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

pub fn done(message: impl Into<String>) -> Json<Reply<()>> {
    Json(Reply {
        success: true,
        message: message.into(),
        data: None,
    })
}

pub(crate) fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

pub fn router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/socials", get(socials::list).post(socials::create))
        .route("/socials/{id}", get(socials::detail).patch(socials::update))
        .route("/socials/{id}/qrcode", get(socials::qrcode))
        .route("/socials/{id}/promote", post(socials::promote))
        .route(
            "/socials/{id}/participants",
            get(participations::list_for_social).post(participations::register),
        )
        .route(
            "/socials/{id}/my-participation",
            axum::routing::delete(participations::cancel_own),
        )
        .route("/socials/{id}/checkin", post(participations::check_in))
        .route(
            "/socials/{id}/participants/{participation_id}/status",
            put(participations::override_status),
        )
        .route("/my-participations", get(participations::list_mine))
        .route(
            "/admin/players/{id}/participations",
            get(participations::admin_list),
        )
        .route("/players", post(players::sync))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(protected.with_state(app_state))
}
