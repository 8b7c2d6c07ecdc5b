use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::{Config, CorsConfig},
    handlers::{self, AppState},
    pricing::TemplateFunFacts,
    signals::shutdown_signal,
    store::Store,
};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the quote server
///
/// This function:
/// 1. Opens the database and runs migrations
/// 2. Loads the active cost settings
/// 3. Binds to the configured address
/// 4. Serves requests until SIGINT/SIGTERM, then drains connections
pub async fn start_server(config: Config) -> Result<()> {
    info!("Freight quote service starting...");

    info!(database = %config.database.path, "Opening database");
    let store = Store::connect(&config.database).await?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let state = AppState::new(config, store, Arc::new(TemplateFunFacts)).await?;
    let app = create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let api = Router::new()
        .route(
            "/routes",
            post(handlers::routes::create_route).get(handlers::routes::list_routes),
        )
        .route(
            "/routes/:id",
            get(handlers::routes::get_route).delete(handlers::routes::delete_route),
        )
        .route(
            "/routes/:id/feasibility",
            post(handlers::routes::recompute_feasibility),
        )
        .route("/routes/:id/costs", post(handlers::routes::calculate_costs))
        .route("/cargo", post(handlers::cargo::create_cargo))
        .route("/cargo/:id", get(handlers::cargo::get_cargo))
        .route(
            "/transport-types",
            get(handlers::transport::list_transport_types),
        )
        .route(
            "/transport-types/:id",
            get(handlers::transport::get_transport_type),
        )
        .route("/tolls/rate", get(handlers::transport::toll_rate))
        .route("/tolls/road", get(handlers::transport::toll_road))
        .route(
            "/offers",
            post(handlers::offers::create_offer).get(handlers::offers::list_offers),
        )
        .route("/offers/:id", get(handlers::offers::get_offer))
        .route(
            "/settings/cost",
            get(handlers::settings::get_cost_settings)
                .put(handlers::settings::update_cost_settings),
        )
        .route(
            "/settings/cost/history",
            get(handlers::settings::cost_settings_history),
        );

    Router::new()
        .route("/", get(handlers::dashboard::get_dashboard))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
