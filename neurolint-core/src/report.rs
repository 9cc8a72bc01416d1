//! Plain-text and JSON rendering of engine results.

use std::fmt::Write;

use serde::Serialize;

use crate::config::AppConfig;
use crate::demo::DemoResult;
use crate::domain::{AnalysisResult, EngineStatus, FixResult, LayerInfo};

/// Render an analysis result for a terminal.
pub fn render_analysis_text(file_path: &str, result: &AnalysisResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "File: {file_path}");
    let Some(analysis) = result.analysis.as_ref().filter(|_| result.success) else {
        let _ = writeln!(
            output,
            "Status: failed ({})",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return output;
    };

    let _ = writeln!(output, "Analysis: {}", analysis.analysis_id);
    let _ = writeln!(
        output,
        "Confidence: {:.0}% ({} ms)",
        analysis.confidence * 100.0,
        analysis.processing_time
    );
    if analysis.detected_issues.is_empty() {
        let _ = writeln!(output, "No issues detected.");
        return output;
    }

    let _ = writeln!(output, "Issues:");
    for issue in &analysis.detected_issues {
        let location = match (issue.line, issue.column) {
            (Some(line), Some(column)) => format!("{line}:{column} "),
            _ => String::new(),
        };
        let _ = writeln!(
            output,
            "  {location}[{}] layer {} {}: {}",
            issue.severity,
            issue.fixed_by_layer,
            issue.rule_id.as_deref().unwrap_or(&issue.issue_type),
            issue.description
        );
    }
    let layers: Vec<String> = analysis
        .recommended_layers
        .iter()
        .map(u8::to_string)
        .collect();
    let _ = writeln!(output, "Recommended layers: {}", layers.join(", "));
    output
}

/// Render a fix result for a terminal. The fixed code itself is not included.
pub fn render_fix_text(file_path: &str, result: &FixResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "File: {file_path}");
    if !result.success {
        let _ = writeln!(
            output,
            "Status: failed ({})",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return output;
    }

    if result.applied_fixes.is_empty() {
        let _ = writeln!(output, "No fixes applied.");
    } else {
        let _ = writeln!(output, "Applied fixes:");
        for fix in &result.applied_fixes {
            let _ = writeln!(
                output,
                "  layer {} {}: {}",
                fix.layer, fix.rule_id, fix.description
            );
        }
    }
    if !result.failed_fixes.is_empty() {
        let _ = writeln!(output, "Skipped:");
        for fix in &result.failed_fixes {
            let _ = writeln!(output, "  {}: {}", fix.description, fix.error);
        }
    }
    if let Some(backup) = &result.backup_path {
        let _ = writeln!(output, "Backup: {backup}");
    }
    output
}

/// Render engine status for a terminal.
pub fn render_status_text(status: &EngineStatus) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Engine {} ({})",
        status.version,
        if status.initialized {
            "ready"
        } else {
            "not initialized"
        }
    );
    let layers: Vec<String> = status.supported_layers.iter().map(u8::to_string).collect();
    let _ = writeln!(output, "Layers: {}", layers.join(", "));
    let _ = writeln!(output, "Rules: {}", status.total_rules);
    let stats = &status.stats;
    let _ = writeln!(
        output,
        "Analyses: {}  Fixes: {}  Errors: {}  Time: {} ms",
        stats.analyses, stats.fixes, stats.errors, stats.processing_time
    );
    output
}

/// Render the layer catalog for a terminal.
pub fn render_layers_text(layers: &[LayerInfo]) -> String {
    let mut output = String::new();
    for layer in layers {
        let _ = writeln!(output, "{}. {}: {}", layer.id, layer.name, layer.description);
        for rule in &layer.rules {
            let _ = writeln!(output, "   - {} ({})", rule.name, rule.id);
        }
    }
    output
}

/// Render a demo run, including the transformed code.
pub fn render_demo_text(sample_name: &str, result: &DemoResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Demo: {sample_name}");
    if !result.success {
        let _ = writeln!(output, "Status: failed");
        return output;
    }

    let _ = writeln!(
        output,
        "Detected {} issues in {} ms",
        result.analysis.detected_issues.len(),
        result.analysis.processing_time
    );
    for layer in result.layers.iter().filter(|layer| layer.success) {
        let _ = writeln!(output, "Layer {}:", layer.layer_id);
        for improvement in &layer.improvements {
            let _ = writeln!(output, "  - {improvement}");
        }
    }
    let _ = writeln!(output, "Total time: {} ms", result.processing_time);
    if let Some(transformed) = &result.transformed {
        let _ = writeln!(output, "\nTransformed code:\n{transformed}");
    }
    output
}

/// Render the resolved configuration for a terminal.
pub fn render_config_text(config: &AppConfig) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Environment: {:?}", config.environment);
    let _ = writeln!(output, "API: {}", config.api.base_url);
    let _ = writeln!(
        output,
        "Timeout: {} ms  Retries: {}",
        config.api.timeout, config.api.retries
    );
    let features = &config.features;
    let _ = writeln!(
        output,
        "Features: demo={} analytics={} errorReporting={}",
        features.demo, features.analytics, features.error_reporting
    );
    output
}

/// Render any serializable payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}
