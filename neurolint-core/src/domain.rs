//! Domain entities for NeuroLint.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::layers::ALL_LAYER_IDS;

/// File path used when a request does not name one.
pub const DEFAULT_FILE_PATH: &str = "demo.tsx";

/// Severity assigned to a detected issue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or stylistic.
    Low,
    /// Worth fixing soon.
    Medium,
    /// Likely to cause bugs.
    High,
    /// Breaks the build or the page.
    Critical,
}

impl Severity {
    /// Lowercase label used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options attached to an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Whether the engine should keep a backup of the input.
    #[serde(default)]
    pub backup: bool,
    /// Advisory client identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Code submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Source text to analyze.
    pub code: String,
    /// Layer ids to run, in ascending order.
    #[serde(default = "default_layers")]
    pub layers: Vec<u8>,
    /// Name of the file the code came from.
    #[serde(default = "default_file_path")]
    pub file_path: String,
    /// Request options.
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    /// Create a request for all layers against the default file path.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            layers: default_layers(),
            file_path: default_file_path(),
            options: AnalysisOptions::default(),
        }
    }

    /// Restrict the request to the given layers, sorted and deduplicated.
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = u8>) -> Self {
        let mut layers: Vec<u8> = layers.into_iter().collect();
        layers.sort_unstable();
        layers.dedup();
        self.layers = layers;
        self
    }

    /// Set the file path reported for the code.
    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }
}

fn default_layers() -> Vec<u8> {
    ALL_LAYER_IDS.to_vec()
}

fn default_file_path() -> String {
    DEFAULT_FILE_PATH.to_string()
}

/// A synthetic issue found by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIssue {
    /// Issue category.
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Issue severity.
    pub severity: Severity,
    /// Human-readable summary.
    pub description: String,
    /// Layer that owns the fix, 1-7.
    pub fixed_by_layer: u8,
    /// 1-based line of the first occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column of the first occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Rule that selects the fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

/// Successful analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Layers that would address the detected issues.
    pub recommended_layers: Vec<u8>,
    /// Issues found in the code.
    pub detected_issues: Vec<DetectedIssue>,
    /// Confidence score, 0.0-1.0.
    pub confidence: f64,
    /// Processing time in milliseconds.
    pub processing_time: u64,
    /// Identifier for this analysis.
    pub analysis_id: String,
}

/// Outcome of an analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the analysis ran.
    pub success: bool,
    /// Analysis payload when successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Error message when unsuccessful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Wrap a successful analysis.
    pub fn succeeded(analysis: Analysis) -> Self {
        Self {
            success: true,
            analysis: Some(analysis),
            error: None,
        }
    }

    /// Build a failed result carrying no issues.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            error: Some(error.into()),
        }
    }

    /// Detected issues, empty on failure.
    pub fn issues(&self) -> &[DetectedIssue] {
        self.analysis
            .as_ref()
            .map(|analysis| analysis.detected_issues.as_slice())
            .unwrap_or(&[])
    }
}

/// Options attached to a fix request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixOptions {
    /// Whether the caller intends to keep a backup of the original.
    #[serde(default)]
    pub backup: bool,
    /// File the code belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Code plus the issues to fix in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixRequest {
    /// Source text to transform.
    pub code: String,
    /// Issues to address, in application order.
    pub issues: Vec<DetectedIssue>,
    /// Request options.
    #[serde(default)]
    pub options: FixOptions,
}

impl FixRequest {
    /// Create a fix request with default options.
    pub fn new(code: impl Into<String>, issues: Vec<DetectedIssue>) -> Self {
        Self {
            code: code.into(),
            issues,
            options: FixOptions::default(),
        }
    }
}

/// A fix that changed the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    /// Issue category.
    #[serde(rename = "type")]
    pub fix_type: String,
    /// Human-readable summary.
    pub description: String,
    /// Layer that applied the fix.
    pub layer: u8,
    /// Rule that selected the rewrite.
    pub rule_id: String,
}

/// A fix that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedFix {
    /// Issue category.
    #[serde(rename = "type")]
    pub fix_type: String,
    /// Human-readable summary.
    pub description: String,
    /// Reason the fix was not applied.
    pub error: String,
}

/// Bookkeeping attached to a fix result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixMetadata {
    /// Identifier for this fix run.
    pub fix_id: String,
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    /// Processing time in milliseconds.
    pub processing_time: u64,
    /// File the code belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Outcome of a fix call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixResult {
    /// Whether the fix run completed.
    pub success: bool,
    /// Transformed code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Code as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_code: Option<String>,
    /// Fixes that changed the code.
    #[serde(default)]
    pub applied_fixes: Vec<AppliedFix>,
    /// Fixes that were skipped or failed.
    #[serde(default)]
    pub failed_fixes: Vec<FailedFix>,
    /// Where the original file was copied, if a backup was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
    /// Run bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FixMetadata>,
    /// Error message when unsuccessful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FixResult {
    /// Build a failed result. The original code is not echoed back.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// A named rule within a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LayerRule {
    /// Stable rule identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Reference data for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LayerInfo {
    /// Layer id, 1-7.
    pub id: u8,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Rules grouped under this layer.
    pub rules: Vec<LayerRule>,
}

/// Engine counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    /// Analyses served.
    pub analyses: u64,
    /// Fix runs served.
    pub fixes: u64,
    /// Requests that failed.
    pub errors: u64,
    /// Cache hits (always zero for the simulated engine).
    pub cache_hits: u64,
    /// Cumulative processing time in milliseconds.
    pub processing_time: u64,
}

/// Engine version and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Whether the engine is ready.
    pub initialized: bool,
    /// Engine version string.
    pub version: String,
    /// Layers the engine can run.
    pub supported_layers: Vec<u8>,
    /// Number of rules the engine advertises.
    pub total_rules: u32,
    /// Engine counters.
    pub stats: EngineStats,
}

impl EngineStatus {
    /// Status reported when the engine cannot be reached.
    pub fn fallback() -> Self {
        Self {
            initialized: true,
            version: "1.2.1".to_string(),
            supported_layers: ALL_LAYER_IDS.to_vec(),
            total_rules: 45,
            stats: EngineStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_request_defaults_when_fields_missing() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"code":"var x = 1;"}"#).expect("parse request");

        assert_eq!(request.layers, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(request.file_path, "demo.tsx");
        assert!(!request.options.backup);
        assert_eq!(request.options.client_id, None);
    }

    #[test]
    fn with_layers_sorts_and_dedups() {
        let request = AnalysisRequest::new("code").with_layers([4, 2, 4, 1]);
        assert_eq!(request.layers, vec![1, 2, 4]);
    }

    #[test]
    fn detected_issue_uses_camel_case_and_type_key() {
        let issue = DetectedIssue {
            issue_type: "pattern".to_string(),
            severity: Severity::Medium,
            description: "var declaration".to_string(),
            fixed_by_layer: 2,
            line: Some(1),
            column: None,
            rule_id: Some("var-to-const".to_string()),
        };

        let value = serde_json::to_value(&issue).expect("serialize issue");
        assert_eq!(value["type"], "pattern");
        assert_eq!(value["severity"], "medium");
        assert_eq!(value["fixedByLayer"], 2);
        assert_eq!(value["ruleId"], "var-to-const");
        assert!(value.get("column").is_none());
    }

    #[test]
    fn failed_fix_result_omits_code() {
        let result = FixResult::failed("boom");
        let value = serde_json::to_value(&result).expect("serialize result");

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
        assert!(value.get("code").is_none());
        assert!(value.get("originalCode").is_none());
    }

    #[test]
    fn failed_analysis_has_no_issues() {
        let result = AnalysisResult::failed("offline");
        assert!(!result.success);
        assert!(result.issues().is_empty());
    }

    #[test]
    fn fallback_status_is_static() {
        let status = EngineStatus::fallback();
        assert_eq!(status.version, "1.2.1");
        assert_eq!(status.total_rules, 45);
        assert_eq!(status.supported_layers.len(), 7);
        assert_eq!(status.stats, EngineStats::default());
    }
}
