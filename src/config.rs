//! Load and validate runtime configuration.

use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::types::{Mode, TradeInput};

/// Baseline restored by `reset`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DefaultsCfg {
    pub buy_price: f64,
    pub sell_price: f64,
    pub amount: f64,
    pub mode: Mode,
    pub fee_percentage: f64,
}

impl Default for DefaultsCfg {
    fn default() -> Self {
        let d = TradeInput::default();
        Self {
            buy_price: d.buy_price,
            sell_price: d.sell_price,
            amount: d.amount,
            mode: d.mode,
            fee_percentage: d.fee_percentage,
        }
    }
}

impl DefaultsCfg {
    pub fn to_input(&self) -> TradeInput {
        TradeInput {
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            amount: self.amount,
            mode: self.mode,
            fee_percentage: self.fee_percentage,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InsightCfg {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_sec: u64,
    pub asset_label: String,
}

impl Default for InsightCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            max_output_tokens: 150,
            timeout_sec: 20,
            asset_label: "Asset".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayCfg {
    pub money_decimals: usize,
    pub quantity_decimals: usize,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            money_decimals: 2,
            quantity_decimals: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: DefaultsCfg,
    pub insight: InsightCfg,
    pub display: DisplayCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Self =
            serde_yaml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Explicit path, then `./config.yaml`, then the platform config dir.
    /// Returns built-in defaults (and `None` as the source) when none exists.
    pub fn discover(explicit: Option<&str>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(p) = explicit {
            return Ok((Self::load(p)?, Some(PathBuf::from(p))));
        }
        let mut candidates = vec![PathBuf::from("config.yaml")];
        if let Some(dirs) = ProjectDirs::from("", "", "tradepulse") {
            candidates.push(dirs.config_dir().join("config.yaml"));
        }
        for c in candidates {
            if c.exists() {
                return Ok((Self::load(&c)?, Some(c)));
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.defaults.to_input(), TradeInput::default());
        assert_eq!(cfg.insight.model, "gemini-2.5-flash");
        assert_eq!(cfg.insight.max_output_tokens, 150);
        assert_eq!(cfg.insight.asset_label, "Asset");
        assert_eq!(cfg.display.money_decimals, 2);
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
defaults:
  buy_price: 25
  mode: quantity
insight:
  enabled: false
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.defaults.buy_price, 25.0);
        assert_eq!(cfg.defaults.sell_price, 150.0);
        assert_eq!(cfg.defaults.mode, Mode::Quantity);
        assert!(!cfg.insight.enabled);
        assert_eq!(cfg.insight.timeout_sec, 20);
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "display:\n  money_decimals: 4\n").unwrap();
        let cfg = AppConfig::load(f.path()).unwrap();
        assert_eq!(cfg.display.money_decimals, 4);
        assert_eq!(cfg.display.quantity_decimals, 4);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(AppConfig::load("/definitely/not/here/config.yaml").is_err());
    }

    #[test]
    fn test_discover_explicit_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "defaults:\n  fee_percentage: 0.5").unwrap();
        let path = f.path().to_string_lossy().to_string();
        let (cfg, src) = AppConfig::discover(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.fee_percentage, 0.5);
        assert_eq!(src, Some(PathBuf::from(path)));
    }
}
