//! HTTP handlers for the NeuroLint server.

use actix_web::error::InternalError;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use neurolint_core::domain::{AnalysisRequest, EngineStatus, FixRequest, LayerInfo};
use neurolint_core::wire::{RawAnalysisResponse, RawFixResponse};
use neurolint_core::{NeuroLintError, SimulatedEngine};

use crate::openapi::ApiDoc;

const CLIENT_ID_HEADER: &str = "X-Client-ID";

/// Shared application state for handlers.
#[derive(Debug, Default)]
pub struct AppState {
    /// Engine answering every request; its counters span all workers.
    pub engine: SimulatedEngine,
}

/// Error payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error message.
    pub error: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// JSON extractor config that reports malformed bodies as [`ErrorResponse`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("invalid request body: {err}");
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(message));
        InternalError::from_response(err, response).into()
    })
}

fn error_response(err: NeuroLintError) -> HttpResponse {
    match err {
        NeuroLintError::Validation(errors) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(errors.join("; ")))
        }
        other => HttpResponse::InternalServerError().json(ErrorResponse::new(other.to_string())),
    }
}

fn client_id(req: &HttpRequest) -> &str {
    req.headers()
        .get(CLIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis result", body = RawAnalysisResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "engine"
)]
#[post("/api/analyze")]
/// Detect issues in submitted code.
pub async fn analyze(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<AnalysisRequest>,
) -> impl Responder {
    log::debug!("analyze request from {}", client_id(&req));
    match state.engine.analyze(&payload) {
        Ok(result) => HttpResponse::Ok().json(RawAnalysisResponse::from(&result)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/fix",
    request_body = FixRequest,
    responses(
        (status = 200, description = "Fix result", body = RawFixResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "engine"
)]
#[post("/api/fix")]
/// Apply automatic fixes for previously detected issues.
pub async fn fix(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<FixRequest>,
) -> impl Responder {
    log::debug!("fix request from {}", client_id(&req));
    match state.engine.fix(&payload) {
        Ok(result) => HttpResponse::Ok().json(RawFixResponse::from(&result)),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Engine status", body = EngineStatus)
    ),
    tag = "engine"
)]
#[get("/api/status")]
/// Report engine version and counters.
pub async fn status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.status())
}

#[utoipa::path(
    get,
    path = "/layers",
    responses(
        (status = 200, description = "Layer catalog", body = Vec<LayerInfo>)
    ),
    tag = "engine"
)]
#[get("/api/layers")]
/// List the seven layers and their rules.
pub async fn layers(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.layers())
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
