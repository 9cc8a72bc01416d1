//! Analyze, fix, and summarize a snippet in one run.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::client::NeuroLintClient;
use crate::domain::{Analysis, AnalysisRequest, FixRequest, FixResult};
use crate::layers::ALL_LAYER_IDS;
use crate::notifications::{AppEvent, NotificationBus};
use crate::transport::Transport;

/// Action recorded on the bus when a demo run fails.
pub const DEMO_FAILURE_ACTION: &str = "analysis_failed";

/// Issues owned by one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOutcome {
    /// Layer id, 1..=7.
    pub layer_id: u8,
    /// Whether the layer had anything to improve.
    pub success: bool,
    /// Descriptions of the issues the layer owns.
    pub improvements: Vec<String>,
}

/// Result of a demo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoResult {
    /// Whether analysis succeeded.
    pub success: bool,
    /// Analysis payload, empty on failure.
    pub analysis: Analysis,
    /// One entry per layer, empty on failure.
    pub layers: Vec<LayerOutcome>,
    /// Code after fixing, or the input when nothing was fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformed: Option<String>,
    /// Fix response when fixes were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_result: Option<FixResult>,
    /// Wall-clock milliseconds for the whole run.
    pub processing_time: u64,
}

impl DemoResult {
    fn failed() -> Self {
        Self {
            success: false,
            analysis: Analysis {
                recommended_layers: Vec::new(),
                detected_issues: Vec::new(),
                confidence: 0.0,
                processing_time: 0,
                analysis_id: String::new(),
            },
            layers: Vec::new(),
            transformed: None,
            fix_result: None,
            processing_time: 0,
        }
    }
}

/// Run the demo pipeline, reporting each step through `progress`.
///
/// Steps are 1 (analyze), 2 (fix), 3 (summarize) and 4 (done), followed by
/// 0 once the run is over regardless of outcome.
pub async fn run_demo<T, P>(
    client: &NeuroLintClient<T>,
    code: &str,
    file_path: &str,
    bus: &NotificationBus,
    mut progress: P,
) -> DemoResult
where
    T: Transport,
    P: FnMut(u8),
{
    let started = Instant::now();
    let result = run_steps(client, code, file_path, &mut progress).await;
    progress(0);
    let mut result = result.unwrap_or_else(|error| {
        log::error!("demo run for {file_path} failed: {error}");
        bus.publish(AppEvent::log_error(DEMO_FAILURE_ACTION, error));
        DemoResult::failed()
    });
    result.processing_time = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    result
}

async fn run_steps<T: Transport>(
    client: &NeuroLintClient<T>,
    code: &str,
    file_path: &str,
    progress: &mut impl FnMut(u8),
) -> Result<DemoResult, String> {
    progress(1);
    let request = AnalysisRequest::new(code)
        .with_layers(ALL_LAYER_IDS)
        .with_file_path(file_path);
    let result = client.analyze_code(request).await;
    let analysis = match result.analysis {
        Some(analysis) if result.success => analysis,
        _ => {
            return Err(result
                .error
                .unwrap_or_else(|| "Analysis failed".to_string()));
        }
    };

    progress(2);
    let mut transformed = code.to_string();
    let mut fix_result = None;
    if !analysis.detected_issues.is_empty() {
        let mut request = FixRequest::new(code, analysis.detected_issues.clone());
        request.options.file_path = Some(file_path.to_string());
        let fixed = client.fix_code(request).await;
        if let (true, Some(code)) = (fixed.success, fixed.code.as_ref()) {
            transformed = code.clone();
        }
        fix_result = Some(fixed);
    }

    progress(3);
    let layers = layer_outcomes(&analysis);

    progress(4);
    Ok(DemoResult {
        success: true,
        analysis,
        layers,
        transformed: Some(transformed),
        fix_result,
        processing_time: 0,
    })
}

fn layer_outcomes(analysis: &Analysis) -> Vec<LayerOutcome> {
    let mut improvements: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for issue in &analysis.detected_issues {
        improvements
            .entry(issue.fixed_by_layer)
            .or_default()
            .push(issue.description.clone());
    }
    ALL_LAYER_IDS
        .iter()
        .map(|layer_id| {
            let improvements = improvements.remove(layer_id).unwrap_or_default();
            LayerOutcome {
                layer_id: *layer_id,
                success: !improvements.is_empty(),
                improvements,
            }
        })
        .collect()
}
