// BurnWx API v0.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod models;
mod routes;
mod services;
mod units;

use config::AppConfig;
use routes::forecasts::AppState;
use services::nws::NwsClient;

/// BurnWx API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BurnWx API",
        version = "0.1.0",
        description = "Prescribed-fire weather decision support. Fetches NWS gridpoint \
            forecasts, derives fire-behavior indices (fuel moisture, FFMC, KBDI trend, \
            ignition probability) and smoke-dispersion metrics per hour, and detects \
            burnable windows that satisfy a user-supplied prescription.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Forecasts", description = "Enriched hourly forecast retrieval"),
        (name = "BurnWindows", description = "Burn-window detection and quality heatmap"),
    ),
    paths(
        routes::health::health_check,
        routes::forecasts::get_forecast,
        routes::burn_windows::get_burn_windows,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::forecasts::ForecastResponse,
            routes::burn_windows::BurnWindowsResponse,
            models::HourlyForecast,
            models::PrescriptionParams,
            models::BurnWindow,
            models::HeatmapDay,
            models::HeatmapCell,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "burnwx_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let app_state = AppState {
        nws: NwsClient::new(&config.nws_user_agent),
        forecast_hours: config.forecast_hours,
    };

    // CORS — read-only API, restrict methods to GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/forecast", get(routes::forecasts::get_forecast))
        .route(
            "/api/v1/burn-windows",
            get(routes::burn_windows::get_burn_windows),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
