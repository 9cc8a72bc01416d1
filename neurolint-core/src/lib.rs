#![deny(missing_docs)]
//! NeuroLint core library.
//!
//! Configuration, the layer catalog, the mock analyzer and fixer, the client
//! facade over pluggable transports, and the notification bus shared by the
//! NeuroLint CLI and server.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod demo;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fixer;
pub mod fs;
pub mod layers;
pub mod notifications;
pub mod report;
pub mod samples;
pub mod transport;
pub mod validation;
/// Loosely shaped HTTP payloads and their normalization.
pub mod wire;

pub use client::{NeuroLintClient, generate_client_id};
pub use config::{AppConfig, ConfigOverrides, Environment};
pub use demo::{DemoResult, LayerOutcome, run_demo};
pub use domain::{
    AnalysisRequest, AnalysisResult, DetectedIssue, EngineStatus, FixRequest, FixResult,
    LayerInfo, Severity,
};
pub use engine::SimulatedEngine;
pub use error::{NeuroLintError, Result};
pub use fs::{FileSystem, StdFileSystem, write_fixed_source};
pub use notifications::{AppEvent, Notification, NotificationBus, NotificationKind};
pub use report::{
    render_analysis_text, render_config_text, render_demo_text, render_fix_text, render_json,
    render_layers_text, render_status_text,
};
pub use samples::{Sample, find_sample};
pub use transport::{SimulatedTransport, Transport, TransportFuture};
