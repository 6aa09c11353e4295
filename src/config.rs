use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::Context;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    pub query: QueryConfig,
    pub pad_rank: PadRankConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct QueryConfig {
    /// Report a sibling query whose root misses the parent as an error
    /// instead of an empty result.
    pub strict_siblings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PadRankConfig {
    /// Dot products closer than this are ranked by distance instead.
    pub dot_tolerance: f64,
}

impl Default for PadRankConfig {
    fn default() -> Self {
        Self {
            dot_tolerance: 1e-6,
        }
    }
}

/// Load a JSON config file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    let tolerance = config.pad_rank.dot_tolerance;
    if tolerance.is_nan() || tolerance < 0.0 {
        anyhow::bail!(
            "padRank.dotTolerance must be a non-negative number, got {}",
            tolerance
        );
    }
    Ok(config)
}
