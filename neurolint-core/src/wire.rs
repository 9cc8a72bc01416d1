//! Loosely-typed server responses and their normalization.
//!
//! Backends answer with varying field names (`issues` vs `detectedIssues`,
//! `level` vs `severity`, `layer` vs `fixedByLayer`). These types accept all
//! of them and normalize into the domain shapes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Analysis, AnalysisResult, AppliedFix, DetectedIssue, FailedFix, FixMetadata, FixResult,
    Severity,
};

const DEFAULT_RECOMMENDED_LAYERS: [u8; 5] = [1, 2, 3, 4, 5];
const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Issue as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    /// Issue category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// Rule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Severity word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Alternate severity word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Owning layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<u8>,
    /// Alternate owning layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_by_layer: Option<u8>,
    /// 1-based line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl From<&DetectedIssue> for RawIssue {
    fn from(issue: &DetectedIssue) -> Self {
        Self {
            issue_type: Some(issue.issue_type.clone()),
            rule_id: issue.rule_id.clone(),
            severity: Some(issue.severity.as_str().to_string()),
            description: Some(issue.description.clone()),
            layer: Some(issue.fixed_by_layer),
            line: issue.line,
            column: issue.column,
            ..Self::default()
        }
    }
}

/// Analysis response as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResponse {
    /// Whether the analysis ran.
    pub success: bool,
    /// Issues found.
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    /// Layers recommended by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_layers: Option<Vec<u8>>,
    /// Confidence score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Processing time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<u64>,
    /// Analysis identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AnalysisResult> for RawAnalysisResponse {
    fn from(result: &AnalysisResult) -> Self {
        let Some(analysis) = result.analysis.as_ref() else {
            return Self {
                success: false,
                error: result.error.clone(),
                ..Self::default()
            };
        };
        Self {
            success: result.success,
            issues: analysis.detected_issues.iter().map(RawIssue::from).collect(),
            recommended_layers: Some(analysis.recommended_layers.clone()),
            confidence: Some(analysis.confidence),
            processing_time: Some(analysis.processing_time),
            analysis_id: Some(analysis.analysis_id.clone()),
            error: result.error.clone(),
        }
    }
}

/// Applied fix as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawAppliedFix {
    /// Fix category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub fix_type: Option<String>,
    /// Rule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Layer that applied the fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<u8>,
    /// Alternate layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_by_layer: Option<u8>,
}

/// Failed fix as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawFailedFix {
    /// Fix category.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub fix_type: Option<String>,
    /// Rule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fix response as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawFixResponse {
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
    pub applied_fixes: Vec<RawAppliedFix>,
    /// Fixes that did not apply.
    #[serde(default)]
    pub failed_fixes: Vec<RawFailedFix>,
    /// Backup location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
    /// Run bookkeeping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FixMetadata>,
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&FixResult> for RawFixResponse {
    fn from(result: &FixResult) -> Self {
        Self {
            success: result.success,
            code: result.code.clone(),
            original_code: result.original_code.clone(),
            applied_fixes: result
                .applied_fixes
                .iter()
                .map(|fix| RawAppliedFix {
                    fix_type: Some(fix.fix_type.clone()),
                    rule_id: Some(fix.rule_id.clone()),
                    description: Some(fix.description.clone()),
                    layer: Some(fix.layer),
                    ..RawAppliedFix::default()
                })
                .collect(),
            failed_fixes: result
                .failed_fixes
                .iter()
                .map(|fix| RawFailedFix {
                    fix_type: Some(fix.fix_type.clone()),
                    description: Some(fix.description.clone()),
                    error: Some(fix.error.clone()),
                    ..RawFailedFix::default()
                })
                .collect(),
            backup_path: result.backup_path.clone(),
            metadata: result.metadata.clone(),
            error: result.error.clone(),
        }
    }
}

/// Map a backend severity word onto the four-level scale.
pub fn map_severity(word: &str) -> Severity {
    match word.trim().to_lowercase().as_str() {
        "critical" => Severity::Critical,
        "error" | "high" => Severity::High,
        "info" | "low" => Severity::Low,
        _ => Severity::Medium,
    }
}

/// Normalize an analysis response.
pub fn normalize_analysis(raw: RawAnalysisResponse) -> AnalysisResult {
    if !raw.success {
        return AnalysisResult::failed(raw.error.unwrap_or_else(|| "Analysis failed".to_string()));
    }

    let detected_issues = raw.issues.into_iter().map(normalize_issue).collect();
    AnalysisResult::succeeded(Analysis {
        recommended_layers: raw
            .recommended_layers
            .unwrap_or_else(|| DEFAULT_RECOMMENDED_LAYERS.to_vec()),
        detected_issues,
        confidence: raw.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        processing_time: raw.processing_time.unwrap_or(0),
        analysis_id: raw.analysis_id.unwrap_or_else(|| {
            format!("analysis-{}", chrono::Utc::now().timestamp_millis())
        }),
    })
}

fn normalize_issue(raw: RawIssue) -> DetectedIssue {
    let severity = raw
        .severity
        .as_deref()
        .or(raw.level.as_deref())
        .map(map_severity)
        .unwrap_or(Severity::Medium);
    let issue_type = raw
        .issue_type
        .clone()
        .or_else(|| raw.rule_id.clone())
        .unwrap_or_else(|| "unknown".to_string());
    DetectedIssue {
        rule_id: raw.rule_id.or(raw.issue_type),
        issue_type,
        severity,
        description: raw
            .description
            .or(raw.message)
            .unwrap_or_else(|| "Issue detected".to_string()),
        fixed_by_layer: raw.layer.or(raw.fixed_by_layer).unwrap_or(1),
        line: raw.line,
        column: raw.column,
    }
}

/// Normalize a fix response.
pub fn normalize_fix(raw: RawFixResponse) -> FixResult {
    if !raw.success {
        return FixResult::failed(raw.error.unwrap_or_else(|| "Fix failed".to_string()));
    }

    FixResult {
        success: true,
        code: raw.code,
        original_code: raw.original_code,
        applied_fixes: raw
            .applied_fixes
            .into_iter()
            .map(|fix| {
                let fix_type = fix
                    .fix_type
                    .clone()
                    .or_else(|| fix.rule_id.clone())
                    .unwrap_or_default();
                AppliedFix {
                    rule_id: fix.rule_id.or(fix.fix_type).unwrap_or_default(),
                    fix_type,
                    description: fix.description.or(fix.message).unwrap_or_default(),
                    layer: fix.layer.or(fix.fixed_by_layer).unwrap_or(1),
                }
            })
            .collect(),
        failed_fixes: raw
            .failed_fixes
            .into_iter()
            .map(|fix| FailedFix {
                fix_type: fix.fix_type.or(fix.rule_id).unwrap_or_default(),
                description: fix.description.or(fix.message).unwrap_or_default(),
                error: fix.error.unwrap_or_else(|| "Fix failed".to_string()),
            })
            .collect(),
        backup_path: raw.backup_path,
        metadata: raw.metadata,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::{RawAnalysisResponse, RawFixResponse, map_severity, normalize_analysis, normalize_fix};
    use crate::domain::Severity;

    #[test]
    fn severity_words_map_onto_scale() {
        assert_eq!(map_severity("error"), Severity::High);
        assert_eq!(map_severity("Warning"), Severity::Medium);
        assert_eq!(map_severity("INFO"), Severity::Low);
        assert_eq!(map_severity("critical"), Severity::Critical);
        assert_eq!(map_severity("low"), Severity::Low);
        assert_eq!(map_severity("whatever"), Severity::Medium);
    }

    #[test]
    fn loose_issue_fields_are_normalized() {
        let raw: RawAnalysisResponse = serde_json::from_str(
            r#"{
                "success": true,
                "issues": [
                    {"ruleId": "var-to-const", "level": "warning", "message": "var found", "layer": 2, "line": 3},
                    {"type": "custom"},
                    {}
                ]
            }"#,
        )
        .expect("parse raw analysis");

        let result = normalize_analysis(raw);
        let analysis = result.analysis.expect("analysis");

        assert_eq!(analysis.recommended_layers, vec![1, 2, 3, 4, 5]);
        assert_eq!(analysis.confidence, 0.85);
        assert!(analysis.analysis_id.starts_with("analysis-"));

        let first = &analysis.detected_issues[0];
        assert_eq!(first.issue_type, "var-to-const");
        assert_eq!(first.rule_id.as_deref(), Some("var-to-const"));
        assert_eq!(first.severity, Severity::Medium);
        assert_eq!(first.description, "var found");
        assert_eq!(first.fixed_by_layer, 2);
        assert_eq!(first.line, Some(3));

        let second = &analysis.detected_issues[1];
        assert_eq!(second.rule_id.as_deref(), Some("custom"));

        let third = &analysis.detected_issues[2];
        assert_eq!(third.issue_type, "unknown");
        assert_eq!(third.description, "Issue detected");
        assert_eq!(third.fixed_by_layer, 1);
        assert_eq!(third.rule_id, None);
    }

    #[test]
    fn unsuccessful_analysis_keeps_error() {
        let raw = RawAnalysisResponse {
            success: false,
            error: Some("engine offline".to_string()),
            ..RawAnalysisResponse::default()
        };
        let result = normalize_analysis(raw);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("engine offline"));

        let result = normalize_analysis(RawAnalysisResponse::default());
        assert_eq!(result.error.as_deref(), Some("Analysis failed"));
    }

    #[test]
    fn fix_fields_fall_back() {
        let raw: RawFixResponse = serde_json::from_str(
            r#"{
                "success": true,
                "code": "const x = 1;",
                "appliedFixes": [{"ruleId": "var-to-const", "message": "converted", "fixedByLayer": 2}],
                "failedFixes": [{"type": "accessibility"}]
            }"#,
        )
        .expect("parse raw fix");

        let result = normalize_fix(raw);
        assert!(result.success);
        assert_eq!(result.applied_fixes[0].fix_type, "var-to-const");
        assert_eq!(result.applied_fixes[0].description, "converted");
        assert_eq!(result.applied_fixes[0].layer, 2);
        assert_eq!(result.failed_fixes[0].error, "Fix failed");
    }

    #[test]
    fn unsuccessful_fix_defaults_error() {
        let result = normalize_fix(RawFixResponse::default());
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Fix failed"));
        assert_eq!(result.code, None);
    }
}
