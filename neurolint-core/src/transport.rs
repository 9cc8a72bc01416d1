//! Request transport seam between the client facade and an engine.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::{AnalysisRequest, AnalysisResult, EngineStatus, FixRequest, FixResult, LayerInfo};
use crate::engine::SimulatedEngine;
use crate::error::Result;

/// Boxed future returned by transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Carries analysis and fix requests to an engine.
pub trait Transport: Send + Sync {
    /// Submit code for analysis.
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> TransportFuture<'a, AnalysisResult>;

    /// Submit code and issues for fixing.
    fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult>;

    /// Fetch engine status.
    fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus>;

    /// Fetch the layer catalog.
    fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> TransportFuture<'a, AnalysisResult> {
        (**self).analyze(request)
    }

    fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
        (**self).fix(request)
    }

    fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
        (**self).status()
    }

    fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
        (**self).layers()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> TransportFuture<'a, AnalysisResult> {
        (**self).analyze(request)
    }

    fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
        (**self).fix(request)
    }

    fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
        (**self).status()
    }

    fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
        (**self).layers()
    }
}

/// Answers requests in-process with a [`SimulatedEngine`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    engine: Arc<SimulatedEngine>,
}

impl SimulatedTransport {
    /// Create a transport with a fresh engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing engine, e.g. with a server.
    pub fn with_engine(engine: Arc<SimulatedEngine>) -> Self {
        Self { engine }
    }

    /// The engine answering requests.
    pub fn engine(&self) -> &Arc<SimulatedEngine> {
        &self.engine
    }
}

impl Transport for SimulatedTransport {
    fn analyze<'a>(&'a self, request: &'a AnalysisRequest) -> TransportFuture<'a, AnalysisResult> {
        Box::pin(async move { self.engine.analyze(request) })
    }

    fn fix<'a>(&'a self, request: &'a FixRequest) -> TransportFuture<'a, FixResult> {
        Box::pin(async move { self.engine.fix(request) })
    }

    fn status<'a>(&'a self) -> TransportFuture<'a, EngineStatus> {
        Box::pin(async move { Ok(self.engine.status()) })
    }

    fn layers<'a>(&'a self) -> TransportFuture<'a, Vec<LayerInfo>> {
        Box::pin(async move { Ok(self.engine.layers()) })
    }
}
