use crate::{
    db::{self, ClimateData, ClimateDb},
    precipitation, range_summary, routes, start_summary, stations, tobs, welcome_handler,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::start_summary,
        routes::climate::climate_routes::range_summary,
    ),
    components(
        schemas(
                db::TobsSummary,
                routes::climate::climate_routes::ErrorBody
            )
    ),
    tags(
        (name = "hawaii climate archive api", description = "a read-only JSON api over the Hawaii historical precipitation and temperature dataset")
    )
)]
struct ApiDoc;

pub async fn build_app_state(database: String) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateDb::connect(&database)
            .await
            .map_err(|e| anyhow!("error setting up measurement store: {}", e))?,
    );

    Ok(AppState { climate_db })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(welcome_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(start_summary))
        .route("/api/v1.0/{start}/{end}", get(range_summary))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    log::info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    log::info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
