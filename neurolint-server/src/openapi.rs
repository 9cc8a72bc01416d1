//! OpenAPI document for the NeuroLint server.

use utoipa::OpenApi;

use neurolint_core::domain::{
    AnalysisOptions, AnalysisRequest, DetectedIssue, EngineStats, EngineStatus, FixMetadata,
    FixOptions, FixRequest, LayerInfo, LayerRule, Severity,
};
use neurolint_core::wire::{
    RawAnalysisResponse, RawAppliedFix, RawFailedFix, RawFixResponse, RawIssue,
};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::analyze,
        crate::routes::fix,
        crate::routes::status,
        crate::routes::layers,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AnalysisOptions,
            AnalysisRequest,
            DetectedIssue,
            Severity,
            FixOptions,
            FixRequest,
            FixMetadata,
            RawIssue,
            RawAnalysisResponse,
            RawAppliedFix,
            RawFailedFix,
            RawFixResponse,
            EngineStats,
            EngineStatus,
            LayerRule,
            LayerInfo,
            ErrorResponse
        )
    ),
    tags(
        (name = "engine", description = "Analysis and fixing"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI document for the NeuroLint server.
pub struct ApiDoc;
