//! Runtime configuration resolved from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layers::{LAYER_COUNT, LAYERS, find_layer};

/// Environment variable selecting the runtime environment.
pub const ENVIRONMENT_VAR: &str = "NODE_ENV";
/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "NEXT_PUBLIC_API_URL";

const LOCAL_API_URL: &str = "http://localhost:3000/api";
const PRODUCTION_API_URL: &str = "https://app.neurolint.dev/api";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RETRIES: u32 = 3;

/// Runtime environment indicator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    Development,
    /// Deployed production.
    Production,
    /// Test runs.
    Test,
    /// Unset or unrecognized.
    Unspecified,
}

impl Environment {
    /// Parse a `NODE_ENV` style value. Unknown values map to `Unspecified`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|value| value.trim().to_lowercase()).as_deref() {
            Some("development") => Self::Development,
            Some("production") => Self::Production,
            Some("test") => Self::Test,
            _ => Self::Unspecified,
        }
    }
}

/// Optional values that replace built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// API base URL override.
    pub api_url: Option<String>,
}

impl ConfigOverrides {
    fn api_url(&self) -> Option<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout: u64,
    /// Retry budget for failed requests.
    pub retries: u32,
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

/// Feature toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Whether the in-memory demo engine is enabled.
    pub demo: bool,
    /// Whether analytics are enabled.
    pub analytics: bool,
    /// Whether error reporting is enabled.
    pub error_reporting: bool,
}

/// Static layer names and descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMetadata {
    /// Number of layers.
    pub count: u8,
    /// Layer names, indexed by `id - 1`.
    pub names: Vec<String>,
    /// Layer descriptions, indexed by `id - 1`.
    pub descriptions: Vec<String>,
}

impl LayerMetadata {
    fn from_catalog() -> Self {
        Self {
            count: LAYER_COUNT,
            names: LAYERS.iter().map(|layer| layer.name.to_string()).collect(),
            descriptions: LAYERS
                .iter()
                .map(|layer| layer.description.to_string())
                .collect(),
        }
    }
}

/// Id, name, and description of one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    /// Layer id, 1-7.
    pub id: u8,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Immutable application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment the configuration was resolved for.
    pub environment: Environment,
    /// API settings.
    pub api: ApiConfig,
    /// Feature toggles.
    pub features: FeatureFlags,
    /// Layer reference data.
    pub layers: LayerMetadata,
}

/// Resolve configuration for an environment. Pure; never fails.
pub fn resolve(environment: Environment, overrides: &ConfigOverrides) -> AppConfig {
    let production = environment == Environment::Production;
    let default_url = if production {
        PRODUCTION_API_URL
    } else {
        LOCAL_API_URL
    };
    let base_url = overrides
        .api_url()
        .unwrap_or(default_url)
        .trim_end_matches('/')
        .to_string();

    AppConfig {
        environment,
        api: ApiConfig {
            base_url,
            timeout: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
        },
        features: FeatureFlags {
            demo: !production,
            analytics: production,
            error_reporting: production,
        },
        layers: LayerMetadata::from_catalog(),
    }
}

/// Resolve configuration from `NODE_ENV` and `NEXT_PUBLIC_API_URL`.
pub fn from_env() -> AppConfig {
    let environment = Environment::parse(std::env::var(ENVIRONMENT_VAR).ok().as_deref());
    let overrides = ConfigOverrides {
        api_url: std::env::var(API_URL_VAR).ok(),
    };
    resolve(environment, &overrides)
}

impl AppConfig {
    /// Join the base URL and an endpoint with exactly one slash.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url,
            endpoint.trim_start_matches('/')
        )
    }

    /// Summary for a layer id; `None` outside 1-7.
    pub fn layer_info(&self, id: u8) -> Option<LayerSummary> {
        find_layer(id)?;
        let index = usize::from(id - 1);
        Some(LayerSummary {
            id,
            name: self.layers.names.get(index)?.clone(),
            description: self.layers.descriptions.get(index)?.clone(),
        })
    }

    /// Summaries for every layer, in id order.
    pub fn all_layers(&self) -> Vec<LayerSummary> {
        (1..=self.layers.count)
            .filter_map(|id| self.layer_info(id))
            .collect()
    }
}
