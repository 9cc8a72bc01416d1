//! In-memory analysis engine backing the simulated transport and the server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::analyzer::{analyze, recommended_layers};
use crate::domain::{
    Analysis, AnalysisRequest, AnalysisResult, DEFAULT_FILE_PATH, EngineStats, EngineStatus,
    FixMetadata, FixRequest, FixResult, LayerInfo,
};
use crate::error::{NeuroLintError, Result};
use crate::fixer::apply_fixes;
use crate::layers::{ALL_LAYER_IDS, find_layer, layer_catalog, total_rules};
use crate::validation::{Validator, code_analysis_schema};

/// Engine version reported by `status`.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONFIDENCE_WITH_ISSUES: f64 = 0.85;
const CONFIDENCE_CLEAN: f64 = 1.0;

/// Runs the analyzer and fixer in-process and keeps lifetime counters.
#[derive(Debug)]
pub struct SimulatedEngine {
    schema: Validator,
    analyses: AtomicU64,
    fixes: AtomicU64,
    errors: AtomicU64,
    processing_time: AtomicU64,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    /// Create an engine with zeroed counters.
    pub fn new() -> Self {
        Self {
            schema: code_analysis_schema(),
            analyses: AtomicU64::new(0),
            fixes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            processing_time: AtomicU64::new(0),
        }
    }

    /// Analyze a request. Invalid requests are rejected before analysis.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let started = Instant::now();
        self.validate(&request.code, &request.file_path, &request.layers)?;

        let detected_issues = analyze(&request.code, &request.layers);
        let confidence = if detected_issues.is_empty() {
            CONFIDENCE_CLEAN
        } else {
            CONFIDENCE_WITH_ISSUES
        };
        let processing_time = self.record(&self.analyses, started);
        log::info!(
            "analyzed {} ({} issues, {processing_time}ms)",
            request.file_path,
            detected_issues.len()
        );

        Ok(AnalysisResult::succeeded(Analysis {
            recommended_layers: recommended_layers(&detected_issues),
            detected_issues,
            confidence,
            processing_time,
            analysis_id: format!("analysis-{}", Uuid::new_v4()),
        }))
    }

    /// Apply fixes for a request. Invalid requests are rejected untouched.
    pub fn fix(&self, request: &FixRequest) -> Result<FixResult> {
        let started = Instant::now();
        let file_path = request
            .options
            .file_path
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_PATH.to_string());
        self.validate(&request.code, &file_path, &ALL_LAYER_IDS)?;

        let outcome = apply_fixes(&request.code, &request.issues);
        let processing_time = self.record(&self.fixes, started);
        log::info!(
            "fixed {file_path} ({} applied, {} failed, {processing_time}ms)",
            outcome.applied.len(),
            outcome.failed.len()
        );

        Ok(FixResult {
            success: true,
            code: Some(outcome.code),
            original_code: Some(request.code.clone()),
            applied_fixes: outcome.applied,
            failed_fixes: outcome.failed,
            backup_path: None,
            metadata: Some(FixMetadata {
                fix_id: format!("fix-{}", Uuid::new_v4()),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                processing_time,
                file_path: Some(file_path),
            }),
            error: None,
        })
    }

    /// Version, supported layers and lifetime counters.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            initialized: true,
            version: ENGINE_VERSION.to_string(),
            supported_layers: ALL_LAYER_IDS.to_vec(),
            total_rules: u32::try_from(total_rules()).unwrap_or(u32::MAX),
            stats: EngineStats {
                analyses: self.analyses.load(Ordering::Relaxed),
                fixes: self.fixes.load(Ordering::Relaxed),
                errors: self.errors.load(Ordering::Relaxed),
                cache_hits: 0,
                processing_time: self.processing_time.load(Ordering::Relaxed),
            },
        }
    }

    /// The static layer catalog.
    pub fn layers(&self) -> Vec<LayerInfo> {
        layer_catalog()
    }

    fn validate(&self, code: &str, file_path: &str, layers: &[u8]) -> Result<()> {
        let mut errors = self
            .schema
            .form_errors([("code", code), ("filename", file_path)]);
        errors.extend(
            layers
                .iter()
                .filter(|id| find_layer(**id).is_none())
                .map(|id| format!("Unknown layer: {id}")),
        );
        if errors.is_empty() {
            return Ok(());
        }
        self.errors.fetch_add(1, Ordering::Relaxed);
        log::warn!("rejected request for {file_path}: {}", errors.join("; "));
        Err(NeuroLintError::Validation(errors))
    }

    fn record(&self, counter: &AtomicU64, started: Instant) -> u64 {
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        counter.fetch_add(1, Ordering::Relaxed);
        self.processing_time.fetch_add(elapsed, Ordering::Relaxed);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedEngine;
    use crate::domain::{AnalysisRequest, FixOptions, FixRequest};
    use crate::error::NeuroLintError;

    #[test]
    fn analyze_reports_issues_and_recommended_layers() {
        let engine = SimulatedEngine::new();
        let request = AnalysisRequest::new("var x = 1;\nconsole.log(x);");

        let result = engine.analyze(&request).expect("analysis");
        let analysis = result.analysis.expect("payload");

        assert!(result.success);
        assert_eq!(analysis.recommended_layers, vec![2]);
        assert_eq!(analysis.detected_issues.len(), 2);
        assert_eq!(analysis.confidence, 0.85);
        assert!(analysis.analysis_id.starts_with("analysis-"));
    }

    #[test]
    fn clean_code_has_full_confidence() {
        let engine = SimulatedEngine::new();
        let request = AnalysisRequest::new("export const answer = 42;");

        let analysis = engine
            .analyze(&request)
            .expect("analysis")
            .analysis
            .expect("payload");

        assert!(analysis.detected_issues.is_empty());
        assert!(analysis.recommended_layers.is_empty());
        assert_eq!(analysis.confidence, 1.0);
    }

    #[test]
    fn analyze_rejects_invalid_requests() {
        let engine = SimulatedEngine::new();
        let request = AnalysisRequest::new("x")
            .with_file_path("notes.md")
            .with_layers([2, 9]);

        let error = engine.analyze(&request).expect_err("validation error");
        match error {
            NeuroLintError::Validation(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        "Code must be at least 10 characters".to_string(),
                        "File must be a TypeScript or JavaScript file".to_string(),
                        "Unknown layer: 9".to_string(),
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(engine.status().stats.errors, 1);
    }

    #[test]
    fn fix_returns_transformed_and_original_code() {
        let engine = SimulatedEngine::new();
        let code = "var total = 10;";
        let issues = engine
            .analyze(&AnalysisRequest::new(code))
            .expect("analysis")
            .analysis
            .expect("payload")
            .detected_issues;

        let mut request = FixRequest::new(code, issues);
        request.options = FixOptions {
            backup: false,
            file_path: Some("app.ts".to_string()),
        };
        let result = engine.fix(&request).expect("fix");

        assert!(result.success);
        assert_eq!(result.code.as_deref(), Some("const total = 10;"));
        assert_eq!(result.original_code.as_deref(), Some(code));
        let metadata = result.metadata.expect("metadata");
        assert!(metadata.fix_id.starts_with("fix-"));
        assert_eq!(metadata.file_path.as_deref(), Some("app.ts"));
    }

    #[test]
    fn status_counts_requests() {
        let engine = SimulatedEngine::new();
        let request = AnalysisRequest::new("var x = 1; var y = 2;");
        engine.analyze(&request).expect("first");
        engine.analyze(&request).expect("second");
        engine
            .fix(&FixRequest::new("var x = 1; var y = 2;", Vec::new()))
            .expect("fix");

        let status = engine.status();
        assert_eq!(status.stats.analyses, 2);
        assert_eq!(status.stats.fixes, 1);
        assert_eq!(status.stats.errors, 0);
        assert_eq!(status.total_rules, 21);
        assert_eq!(engine.layers().len(), 7);
    }
}
