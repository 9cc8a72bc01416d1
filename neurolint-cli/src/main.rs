#![deny(missing_docs)]
//! NeuroLint command-line interface.
//!
//! Analyzes and fixes source files, runs the built-in demo, and reports
//! engine status through either the in-memory engine or a remote API.

mod http;

use clap::{Args, Parser, Subcommand, ValueEnum};
use http::HttpTransport;
use neurolint_core::config::{AppConfig, ConfigOverrides, Environment, resolve};
use neurolint_core::domain::{AnalysisRequest, FixOptions, FixRequest};
use neurolint_core::layers::ALL_LAYER_IDS;
use neurolint_core::samples::default_sample;
use neurolint_core::{
    FileSystem, NeuroLintClient, NotificationBus, SimulatedTransport, Transport, find_sample,
    render_analysis_text, render_config_text, render_demo_text,
    render_fix_text, render_json, render_layers_text, render_status_text, run_demo,
    write_fixed_source,
};
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "neurolint", version, about = "NeuroLint CLI")]
struct Cli {
    /// Runtime environment (development, production, test).
    #[arg(long = "env", env = "NODE_ENV", global = true)]
    environment: Option<String>,
    /// Override the API base URL.
    #[arg(long, env = "NEXT_PUBLIC_API_URL", global = true)]
    api_url: Option<String>,
    /// Engine answering requests.
    #[arg(long, value_enum, default_value_t = TransportKind::Auto, global = true)]
    transport: TransportKind,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum TransportKind {
    /// In-memory engine when demo mode is on, HTTP otherwise.
    Auto,
    /// Remote API at the configured base URL.
    Http,
    /// In-memory engine, no network.
    Simulated,
}

#[derive(Args, Clone)]
struct LayerArgs {
    /// Layers to run (repeatable or comma-separated). Defaults to all seven.
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(1..=7))]
    layers: Vec<u8>,
}

impl LayerArgs {
    fn selected(&self) -> Vec<u8> {
        if self.layers.is_empty() {
            ALL_LAYER_IDS.to_vec()
        } else {
            self.layers.clone()
        }
    }
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect issues in a source file.
    Analyze {
        /// Source file to analyze.
        file: PathBuf,
        #[command(flatten)]
        layers: LayerArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Detect and fix issues in a source file.
    Fix {
        /// Source file to fix.
        file: PathBuf,
        #[command(flatten)]
        layers: LayerArgs,
        /// Write the fixed code back to the file instead of printing it.
        #[arg(long)]
        write: bool,
        /// Keep a `.bak` copy of the original when writing.
        #[arg(long, requires = "write")]
        backup: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show engine status.
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the seven layers and their rules.
    Layers {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze and fix a built-in sample or a file in one run.
    Demo {
        /// Built-in sample id.
        #[arg(long, conflicts_with = "file")]
        sample: Option<String>,
        /// Source file to use instead of a sample.
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the resolved configuration.
    Config {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Rendered command output and whether the command succeeded.
struct CommandOutput {
    contents: String,
    success: bool,
}

impl CommandOutput {
    fn ok(contents: String) -> Self {
        Self {
            contents,
            success: true,
        }
    }
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    use env_logger::Env;
    use neurolint_core::{StdFileSystem, generate_client_id};

    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = resolve_config(cli.environment.as_deref(), cli.api_url.clone());

    let bus = NotificationBus::new();
    bus.subscribe(|notification| {
        eprintln!(
            "[{}] {}: {}",
            notification.kind, notification.title, notification.message
        );
    });

    let client_id = generate_client_id();
    let transport = build_transport(cli.transport, &config, &client_id)?;
    let client = NeuroLintClient::with_client_id(transport, client_id);

    let output = run_command(cli.command, &client, &config, &bus, &StdFileSystem::new()).await?;
    print!("{}", output.contents);
    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
fn main() {}

fn resolve_config(environment: Option<&str>, api_url: Option<String>) -> AppConfig {
    resolve(Environment::parse(environment), &ConfigOverrides { api_url })
}

fn use_http(kind: TransportKind, config: &AppConfig) -> bool {
    match kind {
        TransportKind::Auto => !config.features.demo,
        TransportKind::Http => true,
        TransportKind::Simulated => false,
    }
}

#[cfg_attr(test, allow(dead_code))]
fn build_transport(
    kind: TransportKind,
    config: &AppConfig,
    client_id: &str,
) -> CliResult<Box<dyn Transport>> {
    if use_http(kind, config) {
        log::info!("using HTTP transport at {}", config.api.base_url);
        Ok(Box::new(HttpTransport::new(config.clone(), client_id)?))
    } else {
        log::info!("using in-memory engine");
        Ok(Box::new(SimulatedTransport::new()))
    }
}

async fn run_command<T: Transport, F: FileSystem>(
    command: Commands,
    client: &NeuroLintClient<T>,
    config: &AppConfig,
    bus: &NotificationBus,
    fs: &F,
) -> CliResult<CommandOutput> {
    match command {
        Commands::Analyze {
            file,
            layers,
            output,
        } => run_analyze(client, fs, &file, layers.selected(), output.format).await,
        Commands::Fix {
            file,
            layers,
            write,
            backup,
            output,
        } => {
            let options = FixRunOptions {
                layers: layers.selected(),
                write,
                backup,
                format: output.format,
            };
            run_fix(client, fs, &file, options).await
        }
        Commands::Status { output } => {
            let status = client.engine_status().await;
            let contents = match output.format {
                OutputFormat::Text => render_status_text(&status),
                OutputFormat::Json => render_json(&status)?,
            };
            Ok(CommandOutput::ok(contents))
        }
        Commands::Layers { output } => {
            let layers = client.layer_info().await;
            let contents = match output.format {
                OutputFormat::Text => render_layers_text(&layers),
                OutputFormat::Json => render_json(&layers)?,
            };
            Ok(CommandOutput::ok(contents))
        }
        Commands::Demo {
            sample,
            file,
            output,
        } => run_demo_command(client, bus, fs, sample, file, output.format).await,
        Commands::Config { output } => {
            let contents = match output.format {
                OutputFormat::Text => render_config_text(config),
                OutputFormat::Json => render_json(config)?,
            };
            Ok(CommandOutput::ok(contents))
        }
    }
}

async fn run_analyze<T: Transport, F: FileSystem>(
    client: &NeuroLintClient<T>,
    fs: &F,
    file: &Path,
    layers: Vec<u8>,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let file_path = file.display().to_string();
    let code = fs.read_to_string(file)?;
    let request = AnalysisRequest::new(code)
        .with_layers(layers)
        .with_file_path(&file_path);
    let result = client.analyze_code(request).await;
    let contents = match format {
        OutputFormat::Text => render_analysis_text(&file_path, &result),
        OutputFormat::Json => render_json(&result)?,
    };
    Ok(CommandOutput {
        contents,
        success: result.success,
    })
}

struct FixRunOptions {
    layers: Vec<u8>,
    write: bool,
    backup: bool,
    format: OutputFormat,
}

async fn run_fix<T: Transport, F: FileSystem>(
    client: &NeuroLintClient<T>,
    fs: &F,
    file: &Path,
    options: FixRunOptions,
) -> CliResult<CommandOutput> {
    let file_path = file.display().to_string();
    let code = fs.read_to_string(file)?;
    let analysis = client
        .analyze_code(
            AnalysisRequest::new(code.clone())
                .with_layers(options.layers)
                .with_file_path(&file_path),
        )
        .await;
    if !analysis.success {
        let contents = match options.format {
            OutputFormat::Text => render_analysis_text(&file_path, &analysis),
            OutputFormat::Json => render_json(&analysis)?,
        };
        return Ok(CommandOutput {
            contents,
            success: false,
        });
    }

    let mut request = FixRequest::new(code.clone(), analysis.issues().to_vec());
    request.options = FixOptions {
        backup: options.backup,
        file_path: Some(file_path.clone()),
    };
    let mut result = client.fix_code(request).await;

    let fixed = result.code.clone().filter(|fixed| *fixed != code);
    if let (true, Some(fixed)) = (options.write, fixed.as_deref()) {
        let backup = write_fixed_source(fs, file, fixed, options.backup)?;
        result.backup_path = backup.map(|path| path.display().to_string());
        log::info!("wrote fixed source to {file_path}");
    }

    let contents = match options.format {
        OutputFormat::Json => render_json(&result)?,
        OutputFormat::Text => {
            let mut contents = render_fix_text(&file_path, &result);
            if let (false, Some(fixed)) = (options.write, fixed.as_deref()) {
                contents.push('\n');
                contents.push_str(fixed);
            }
            contents
        }
    };
    Ok(CommandOutput {
        contents,
        success: result.success,
    })
}

async fn run_demo_command<T: Transport, F: FileSystem>(
    client: &NeuroLintClient<T>,
    bus: &NotificationBus,
    fs: &F,
    sample: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> CliResult<CommandOutput> {
    let (name, file_path, code) = match (file, sample) {
        (Some(file), _) => {
            let code = fs.read_to_string(&file)?;
            let file_path = file.display().to_string();
            (file_path.clone(), file_path, code)
        }
        (None, Some(id)) => {
            let sample = find_sample(&id).ok_or_else(|| format!("unknown sample: {id}"))?;
            (
                sample.name.to_string(),
                sample.file_path.to_string(),
                sample.code.to_string(),
            )
        }
        (None, None) => {
            let sample = default_sample();
            (
                sample.name.to_string(),
                sample.file_path.to_string(),
                sample.code.to_string(),
            )
        }
    };

    let result = run_demo(client, &code, &file_path, bus, |step| {
        log::debug!("demo step {step}");
    })
    .await;
    let contents = match format {
        OutputFormat::Text => render_demo_text(&name, &result),
        OutputFormat::Json => render_json(&result)?,
    };
    Ok(CommandOutput {
        contents,
        success: result.success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurolint_core::StdFileSystem;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn simulated_client() -> NeuroLintClient<SimulatedTransport> {
        NeuroLintClient::with_client_id(SimulatedTransport::new(), "demo-test")
    }

    fn temp_source(name: &str, contents: &str) -> (PathBuf, PathBuf) {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!("neurolint_cli_test_{nanos}_{count}"));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join(name);
        std::fs::write(&path, contents).expect("write source");
        (root, path)
    }

    fn text() -> OutputArgs {
        OutputArgs {
            format: OutputFormat::Text,
        }
    }

    fn development() -> AppConfig {
        resolve_config(Some("development"), None)
    }

    #[test]
    fn cli_parses_fix_flags() {
        let cli = Cli::try_parse_from([
            "neurolint",
            "--transport",
            "simulated",
            "fix",
            "src/App.tsx",
            "--layers",
            "2,4",
            "--write",
            "--backup",
        ])
        .expect("parse");

        assert_eq!(cli.transport, TransportKind::Simulated);
        match cli.command {
            Commands::Fix {
                file,
                layers,
                write,
                backup,
                ..
            } => {
                assert_eq!(file, PathBuf::from("src/App.tsx"));
                assert_eq!(layers.selected(), vec![2, 4]);
                assert!(write);
                assert!(backup);
            }
            _ => panic!("expected fix command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_layers_and_backup_without_write() {
        assert!(Cli::try_parse_from(["neurolint", "analyze", "a.ts", "--layers", "8"]).is_err());
        assert!(Cli::try_parse_from(["neurolint", "fix", "a.ts", "--backup"]).is_err());
    }

    #[test]
    fn transport_help_describes_every_choice() {
        use clap::CommandFactory;

        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("Remote API at the configured base URL"));
        assert!(help.contains("In-memory engine, no network"));
    }

    #[test]
    fn auto_transport_follows_demo_flag() {
        let production = resolve_config(Some("production"), None);
        assert!(use_http(TransportKind::Auto, &production));
        assert!(!use_http(TransportKind::Auto, &development()));
        assert!(use_http(TransportKind::Http, &development()));
        assert!(!use_http(TransportKind::Simulated, &production));
    }

    #[tokio::test]
    async fn analyze_reports_issues_for_file() {
        let (root, path) = temp_source("App.tsx", "var count = 0;\nconsole.log(count);\n");
        let bus = NotificationBus::new();

        let output = run_command(
            Commands::Analyze {
                file: path.clone(),
                layers: LayerArgs { layers: Vec::new() },
                output: text(),
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .expect("analyze");

        assert!(output.success);
        assert!(output.contents.contains("var-to-const"));
        assert!(output.contents.contains("remove-console"));
        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[tokio::test]
    async fn analyze_rejects_unsupported_files() {
        let (root, path) = temp_source("notes.md", "var count = 0;\n");
        let bus = NotificationBus::new();

        let output = run_command(
            Commands::Analyze {
                file: path,
                layers: LayerArgs { layers: Vec::new() },
                output: text(),
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .expect("analyze");

        assert!(!output.success);
        assert!(output.contents.contains("TypeScript or JavaScript"));
        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[tokio::test]
    async fn fix_writes_file_and_backup() {
        let (root, path) = temp_source("app.js", "var total = 1;\n");
        let bus = NotificationBus::new();

        let output = run_command(
            Commands::Fix {
                file: path.clone(),
                layers: LayerArgs { layers: Vec::new() },
                write: true,
                backup: true,
                output: OutputArgs {
                    format: OutputFormat::Json,
                },
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .expect("fix");

        assert!(output.success);
        let parsed: serde_json::Value = serde_json::from_str(&output.contents).expect("json");
        let backup = parsed["backupPath"].as_str().expect("backup path");
        assert_eq!(std::fs::read_to_string(&path).expect("fixed"), "const total = 1;\n");
        assert_eq!(std::fs::read_to_string(backup).expect("backup"), "var total = 1;\n");
        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[tokio::test]
    async fn fix_without_write_prints_code_and_leaves_file() {
        let (root, path) = temp_source("app.js", "var total = 1;\n");
        let bus = NotificationBus::new();

        let output = run_command(
            Commands::Fix {
                file: path.clone(),
                layers: LayerArgs { layers: vec![2] },
                write: false,
                backup: false,
                output: text(),
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .expect("fix");

        assert!(output.contents.contains("layer 2 var-to-const"));
        assert!(output.contents.ends_with("const total = 1;\n"));
        assert_eq!(std::fs::read_to_string(&path).expect("source"), "var total = 1;\n");
        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[tokio::test]
    async fn demo_runs_named_sample() {
        let bus = NotificationBus::new();

        let output = run_command(
            Commands::Demo {
                sample: Some("nextjs-app-router".to_string()),
                file: None,
                output: text(),
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .expect("demo");

        assert!(output.success);
        assert!(output.contents.contains("Next.js App Router Component"));
        assert!(output.contents.contains("'use client';"));
        assert!(output.contents.contains("next/navigation"));
    }

    #[tokio::test]
    async fn demo_rejects_unknown_sample() {
        let bus = NotificationBus::new();

        let error = run_command(
            Commands::Demo {
                sample: Some("nope".to_string()),
                file: None,
                output: text(),
            },
            &simulated_client(),
            &development(),
            &bus,
            &StdFileSystem::new(),
        )
        .await
        .err()
        .expect("unknown sample");

        assert_eq!(error.to_string(), "unknown sample: nope");
    }

    #[tokio::test]
    async fn status_layers_and_config_render() {
        let bus = NotificationBus::new();
        let client = simulated_client();
        let fs = StdFileSystem::new();
        let config = development();

        let status = run_command(Commands::Status { output: text() }, &client, &config, &bus, &fs)
            .await
            .expect("status");
        assert!(status.contents.contains("Rules: 21"));

        let layers = run_command(Commands::Layers { output: text() }, &client, &config, &bus, &fs)
            .await
            .expect("layers");
        assert!(layers.contents.starts_with("1. "));

        let rendered = run_command(
            Commands::Config {
                output: OutputArgs {
                    format: OutputFormat::Json,
                },
            },
            &client,
            &config,
            &bus,
            &fs,
        )
        .await
        .expect("config");
        let parsed: serde_json::Value = serde_json::from_str(&rendered.contents).expect("json");
        assert_eq!(parsed["features"]["demo"], true);
        assert_eq!(parsed["api"]["baseUrl"], "http://localhost:3000/api");
    }
}
