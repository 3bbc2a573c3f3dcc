//! HTTP routes for Cinegate
//!
//! This module defines all HTTP endpoints exposed by the server.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod library;
pub mod metrics;
pub mod profile;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRequest,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{error::AppError, middleware::auth::auth_middleware, AppState};

/// JSON body whose rejections use the API error envelope
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that require a session token
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/user/update", patch(profile::update_profile))
        .route(
            "/api/favorites",
            get(library::list_favorites)
                .post(library::add_favorite)
                .delete(library::remove_favorite),
        )
        .route(
            "/api/watchlist",
            get(library::list_watchlist)
                .post(library::add_to_watchlist)
                .delete(library::remove_from_watchlist),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes (health checks, metrics, account creation)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    // Upper bound for a whole request; outbound calls have their own, shorter one
    let request_timeout = state.config.upstream_timeout + Duration::from_secs(5);

    Router::new()
        .merge(public_routes)
        .merge(catalog_routes())
        .merge(protected_routes)
        // Global middleware (applied to all routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Public catalog pass-through routes
fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/movies/now-playing", get(catalog::now_playing_movies))
        .route("/api/movies/popular", get(catalog::popular_movies))
        .route("/api/movies/upcoming", get(catalog::upcoming_movies))
        .route("/api/movies/top-rated", get(catalog::top_rated_movies))
        .route("/api/movies/:id", get(catalog::movie_details))
        .route("/api/movies/:id/credits", get(catalog::movie_credits))
        .route(
            "/api/movies/:id/watch-providers",
            get(catalog::movie_watch_providers),
        )
        .route("/api/tv/airing-today", get(catalog::airing_today_tv))
        .route("/api/tv/on-the-air", get(catalog::on_the_air_tv))
        .route("/api/tv/popular", get(catalog::popular_tv))
        .route("/api/tv/top-rated", get(catalog::top_rated_tv))
        .route("/api/tv/:id", get(catalog::tv_details))
        .route("/api/tv/:id/credits", get(catalog::tv_credits))
        .route("/api/tv/:id/watch-providers", get(catalog::tv_watch_providers))
        .route("/api/person/:id", get(catalog::person_details))
        .route("/api/person/:id/movie-credits", get(catalog::person_movie_credits))
        .route("/api/person/:id/tv-credits", get(catalog::person_tv_credits))
        .route(
            "/api/person/:id/combined-credits",
            get(catalog::person_combined_credits),
        )
        .route("/api/person/:id/external-ids", get(catalog::person_external_ids))
        .route("/api/search", get(catalog::search))
        .route("/api/search/person", get(catalog::search_person))
        .route("/api/trending/:media/:window", get(catalog::trending))
        .route("/api/discover/:media", get(catalog::discover))
        .route("/api/genres/:media", get(catalog::genres))
        .route("/api/watch-providers/:media", get(catalog::watch_provider_catalog))
        .route("/api/certifications/movie", get(catalog::movie_certifications))
}
