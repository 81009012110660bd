//! HTTP routes.
//!
//! ```text
//! GET /          plain-text readiness banner
//! GET /health    {"status":"healthy","version":..}
//! GET /extract   ?url=<page>[&key=<api key>]  ->  {"title","author","content"}
//! GET /static/*  files from PLAINPAGE_STATIC_DIR, when set
//! ```
//!
//! `/extract` checks, in order: API key (401), quota (429), `url` (400).
//! Only then is the page fetched and extracted.

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use plainpage_core::{Article, ErrorKind, FetchConfig, fetch_and_extract};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::auth::{AuthError, KeyRegistry};
use crate::config::ServerConfig;
use crate::limit::{RateLimitResult, RateLimiter};

pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const READY_BANNER: &str = "Clean Article Extractor — ready";

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub keys: Arc<KeyRegistry>,
    pub limiter: Arc<RateLimiter>,
    pub fetch: Arc<FetchConfig>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            keys: Arc::new(KeyRegistry::new(&config.api_keys, config.allow_anonymous)),
            limiter: Arc::new(RateLimiter::new(config.rate_limit, config.rate_window)),
            fetch: Arc::new(config.fetch.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "healthy".to_string(), version: SERVER_VERSION.to_string() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Error body: `{"error": {"kind": .., "message": ..}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("rate limit exceeded")]
    RateLimited(RateLimitResult),

    #[error("missing url param")]
    MissingUrl,

    #[error("failed to extract: {0}")]
    Extraction(#[from] plainpage_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::Extraction(err) => match err.kind() {
                ErrorKind::NoContentDetected => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::InvalidUrl => StatusCode::BAD_REQUEST,
                ErrorKind::ParseFailed | ErrorKind::Http | ErrorKind::Timeout | ErrorKind::UpstreamStatus => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::InvalidKey) => "invalid_api_key",
            ApiError::Auth(AuthError::MissingKey) => "missing_api_key",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::MissingUrl => "missing_url",
            ApiError::Extraction(err) => err.kind().as_str(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: ErrorDetail { kind: self.kind().to_string(), message: self.to_string() } };
        let mut response = (self.status(), PrettyJson(body)).into_response();
        if let ApiError::RateLimited(quota) = &self {
            insert_headers(response.headers_mut(), quota.headers());
        }
        response
    }
}

/// JSON response indented with two spaces.
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(mut bytes) => {
                bytes.push(b'\n');
                ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
            }
            Err(err) => {
                warn!(error = %err, "failed to serialize response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn insert_headers(headers: &mut HeaderMap, pairs: Vec<(&'static str, String)>) {
    for (name, value) in pairs {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            headers.insert(name, value);
        }
    }
}

pub async fn index() -> &'static str {
    READY_BANNER
}

pub async fn health() -> PrettyJson<HealthResponse> {
    PrettyJson(HealthResponse::default())
}

pub async fn extract(
    State(state): State<AppState>, Query(params): Query<ExtractParams>, headers: HeaderMap,
) -> Result<Response, ApiError> {
    let header_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()).filter(|v| !v.trim().is_empty());
    let identity = state.keys.authenticate(header_key.or(params.key.as_deref()))?;

    let quota = state.limiter.check(&identity).await;
    if !quota.is_allowed() {
        warn!(identity = identity.as_str(), "rate limit exceeded");
        return Err(ApiError::RateLimited(quota));
    }

    let url = params.url.as_deref().map(str::trim).filter(|u| !u.is_empty()).ok_or(ApiError::MissingUrl)?;

    let article: Article = fetch_and_extract(url, &state.fetch).await.map_err(|err| {
        warn!(url, kind = %err.kind(), error = %err, "extraction failed");
        ApiError::Extraction(err)
    })?;

    info!(url, identity = identity.as_str(), title = %article.title, length = article.content.len(), "extracted article");

    let mut response = PrettyJson(article).into_response();
    insert_headers(response.headers_mut(), quota.headers());
    Ok(response)
}

/// Tags every request with a fresh id, in its span and in the response.
async fn request_id(request: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let span = info_span!("request", request_id = %id, method = %request.method(), path = %request.uri().path());

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub fn router(config: &ServerConfig, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/extract", get(extract));

    if let Some(dir) = &config.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn(request_id))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::new().allow_methods([Method::GET]).allow_origin(Any))
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, config.request_timeout()))
        .with_state(state)
}
