use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ErrorCode;
use std::{env, fmt};

/// Environment variable overriding `[layout] order`.
pub const LAYOUT_ORDER_ENV: &str = "HIREFLOW_LAYOUT_ORDER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub order: LayerOrder,
}

/// Ordering key for tasks sharing a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrder {
    /// Position of the task in the workflow definition.
    #[default]
    Declaration,
    /// Lexicographic task identifier.
    Identifier,
}

impl LayerOrder {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "declaration" => Some(Self::Declaration),
            "identifier" | "id" => Some(Self::Identifier),
            _ => None,
        }
    }
}

impl fmt::Display for LayerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Declaration => "declaration",
            Self::Identifier => "identifier",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Whether a `not_applicable` dependency counts as satisfied.
    #[serde(default = "default_true")]
    pub not_applicable_satisfies: bool,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            not_applicable_satisfies: default_true(),
        }
    }
}

/// Load engine configuration from a TOML file.
///
/// A missing file yields [`EngineConfig::default`].
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "engine config not found, using defaults");
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EngineConfig>(&content)
        .with_context(|| format!("{}: Failed to parse {}", ErrorCode::ConfigParseError, path.display()))
}

/// Load the config file and apply environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or the
/// `HIREFLOW_LAYOUT_ORDER` override holds an unknown value.
pub fn resolve_engine_config(path: &Path) -> Result<EngineConfig> {
    let config = load_engine_config(path)?;
    apply_overrides(config, env::var(LAYOUT_ORDER_ENV).ok())
}

fn apply_overrides(mut config: EngineConfig, env_order: Option<String>) -> Result<EngineConfig> {
    if let Some(raw) = env_order {
        let Some(order) = LayerOrder::parse(&raw) else {
            bail!("invalid {LAYOUT_ORDER_ENV} value '{raw}': expected declaration or identifier");
        };
        config.layout.order = order;
    }
    Ok(config)
}

const fn default_true() -> bool {
    true
}
