use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Metric used to pick a merge target when several bursting connections
/// qualify for the same job. The original system made this a compile-time
/// choice; here it is a config parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Prefer the connection with the fewest merges so far.
    #[default]
    BurstCount,
    /// Prefer the connection with the fewest bytes still to be sent.
    OutstandingBytes,
}

/// Global configuration loaded from `~/.config/fanout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Maximum times files may be appended to one connection for a single
    /// job. Only enforced for requests that ask for the cap.
    pub max_bursts_per_connection: u32,
    /// Merge-target selection metric among bursting connections.
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_bursts_per_connection: 50,
            tie_break: TieBreak::BurstCount,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fanout")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FanoutConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FanoutConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FanoutConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FanoutConfig::default();
        assert_eq!(cfg.max_bursts_per_connection, 50);
        assert_eq!(cfg.tie_break, TieBreak::BurstCount);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FanoutConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FanoutConfig = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.max_bursts_per_connection,
            cfg.max_bursts_per_connection
        );
        assert_eq!(parsed.tie_break, cfg.tie_break);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            max_bursts_per_connection = 8
            tie_break = "outstanding-bytes"
        "#;
        let cfg: FanoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_bursts_per_connection, 8);
        assert_eq!(cfg.tie_break, TieBreak::OutstandingBytes);
    }

    #[test]
    fn config_toml_tie_break_defaults_to_burst_count() {
        let toml = "max_bursts_per_connection = 3";
        let cfg: FanoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.tie_break, TieBreak::BurstCount);
    }
}
