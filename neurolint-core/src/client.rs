//! Client facade used by the CLI and the demo pipeline.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::domain::{
    AnalysisRequest, AnalysisResult, DEFAULT_FILE_PATH, EngineStatus, FixRequest, FixResult,
    LayerInfo,
};
use crate::layers::layer_catalog;
use crate::transport::Transport;

const CLIENT_ID_SUFFIX_LEN: usize = 9;

/// Fills request defaults and turns transport failures into failed results.
#[derive(Debug, Clone)]
pub struct NeuroLintClient<T> {
    transport: T,
    client_id: String,
}

impl<T: Transport> NeuroLintClient<T> {
    /// Create a client with a generated id.
    pub fn new(transport: T) -> Self {
        Self::with_client_id(transport, generate_client_id())
    }

    /// Create a client with an explicit id.
    pub fn with_client_id(transport: T, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
        }
    }

    /// Id sent with every request.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Analyze code. Never fails; errors come back as `success: false`.
    pub async fn analyze_code(&self, mut request: AnalysisRequest) -> AnalysisResult {
        if request.options.client_id.is_none() {
            request.options.client_id = Some(self.client_id.clone());
        }
        match self.transport.analyze(&request).await {
            Ok(result) => result,
            Err(err) => {
                log::error!("analysis of {} failed: {err}", request.file_path);
                AnalysisResult::failed(err.to_string())
            }
        }
    }

    /// Fix code. Never fails; errors come back as `success: false`.
    pub async fn fix_code(&self, mut request: FixRequest) -> FixResult {
        if request.options.file_path.is_none() {
            request.options.file_path = Some(DEFAULT_FILE_PATH.to_string());
        }
        match self.transport.fix(&request).await {
            Ok(result) => result,
            Err(err) => {
                log::error!("fix failed: {err}");
                FixResult::failed(err.to_string())
            }
        }
    }

    /// Engine status, or the built-in fallback when unreachable.
    pub async fn engine_status(&self) -> EngineStatus {
        self.transport.status().await.unwrap_or_else(|err| {
            log::warn!("status unavailable, using fallback: {err}");
            EngineStatus::fallback()
        })
    }

    /// Layer catalog, or the built-in catalog when unreachable.
    pub async fn layer_info(&self) -> Vec<LayerInfo> {
        self.transport.layers().await.unwrap_or_else(|err| {
            log::warn!("layer catalog unavailable, using built-in: {err}");
            layer_catalog()
        })
    }
}

/// `demo-<millis>-<9 random chars>`.
pub fn generate_client_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!("demo-{millis}-{}", &random[..CLIENT_ID_SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{NeuroLintClient, generate_client_id};
    use crate::domain::{
        AnalysisRequest, AnalysisResult, EngineStatus, FixRequest, FixResult, LayerInfo,
    };
    use crate::error::NeuroLintError;
    use crate::transport::{SimulatedTransport, Transport, TransportFuture};

    struct UnreachableTransport;

    impl Transport for UnreachableTransport {
        fn analyze<'a>(
            &'a self,
            _request: &'a AnalysisRequest,
        ) -> TransportFuture<'a, AnalysisResult> {
            Box::pin(async { Err(NeuroLintError::Transport("connection refused".to_string())) })
        }

        fn fix<'a>(&'a self, _request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
            Box::pin(async { Err(NeuroLintError::Transport("connection refused".to_string())) })
        }

        fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
            Box::pin(async { Err(NeuroLintError::Transport("connection refused".to_string())) })
        }

        fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
            Box::pin(async { Err(NeuroLintError::Transport("connection refused".to_string())) })
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        analyses: Mutex<Vec<AnalysisRequest>>,
        fixes: Mutex<Vec<FixRequest>>,
    }

    impl Transport for RecordingTransport {
        fn analyze<'a>(
            &'a self,
            request: &'a AnalysisRequest,
        ) -> TransportFuture<'a, AnalysisResult> {
            self.analyses.lock().expect("analyses").push(request.clone());
            Box::pin(async { Ok(AnalysisResult::failed("recorded")) })
        }

        fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
            self.fixes.lock().expect("fixes").push(request.clone());
            Box::pin(async { Ok(FixResult::failed("recorded")) })
        }

        fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
            Box::pin(async { Ok(EngineStatus::fallback()) })
        }

        fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[test]
    fn client_id_has_demo_shape() {
        let id = generate_client_id();
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "demo");
        assert!(parts[1].parse::<u128>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[tokio::test]
    async fn transport_errors_become_failed_results() {
        let client = NeuroLintClient::new(UnreachableTransport);

        let analysis = client
            .analyze_code(AnalysisRequest::new("var x = 1; var y = 2;"))
            .await;
        assert!(!analysis.success);
        assert_eq!(analysis.error.as_deref(), Some("connection refused"));
        assert!(analysis.issues().is_empty());

        let fix = client
            .fix_code(FixRequest::new("var x = 1; var y = 2;", Vec::new()))
            .await;
        assert!(!fix.success);
        assert!(fix.code.is_none());
    }

    #[tokio::test]
    async fn status_and_layers_fall_back_when_unreachable() {
        let client = NeuroLintClient::new(UnreachableTransport);

        let status = client.engine_status().await;
        assert_eq!(status.version, "1.2.1");
        assert_eq!(status.total_rules, 45);

        let layers = client.layer_info().await;
        assert_eq!(layers.len(), 7);
        assert_eq!(layers[0].id, 1);
    }

    #[tokio::test]
    async fn requests_carry_client_defaults() {
        let client = NeuroLintClient::with_client_id(RecordingTransport::default(), "demo-1-abc");

        client
            .analyze_code(AnalysisRequest::new("const a = 1;"))
            .await;
        client
            .fix_code(FixRequest::new("const a = 1;", Vec::new()))
            .await;

        let transport = client.transport();
        let analyses = transport.analyses.lock().expect("analyses");
        assert_eq!(analyses[0].options.client_id.as_deref(), Some("demo-1-abc"));
        let fixes = transport.fixes.lock().expect("fixes");
        assert_eq!(fixes[0].options.file_path.as_deref(), Some("demo.tsx"));
    }

    #[tokio::test]
    async fn simulated_client_analyzes_and_fixes() {
        let client = NeuroLintClient::new(SimulatedTransport::new());
        let code = "var greeting = 'hi';\nconsole.log(greeting);\n";

        let analysis = client.analyze_code(AnalysisRequest::new(code)).await;
        assert!(analysis.success);

        let fix = client
            .fix_code(FixRequest::new(code, analysis.issues().to_vec()))
            .await;
        assert_eq!(fix.code.as_deref(), Some("const greeting = 'hi';\n"));
        assert_eq!(fix.applied_fixes.len(), 2);
    }
}
