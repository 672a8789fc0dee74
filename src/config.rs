//! Engine Configuration
//!
//! Every field has a default; a config file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ENGINE_VERSION;

pub const MIN_PROMPT_BUDGET: usize = 512;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Config requires engine >= {0}, current is {1}")]
    EngineVersionMismatch(String, String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_engine_min_version")]
    pub engine_min_version: String,
    #[serde(default = "default_max_prompt_length")]
    pub max_prompt_length: usize,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub placement: PlacementThresholds,
}

fn default_engine_min_version() -> String { "1.0.0".to_string() }
fn default_max_prompt_length() -> usize { 10000 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_min_version: default_engine_min_version(),
            max_prompt_length: default_max_prompt_length(),
            scoring: ScoringConfig::default(),
            placement: PlacementThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default = "default_issue_penalty")]
    pub issue_penalty: i32,
    #[serde(default = "default_warning_penalty")]
    pub warning_penalty: i32,
    #[serde(default = "default_compliance_bonus")]
    pub compliance_bonus: i32,
    #[serde(default = "default_production_threshold")]
    pub production_threshold: u8,
}

fn default_issue_penalty() -> i32 { 15 }
fn default_warning_penalty() -> i32 { 5 }
fn default_compliance_bonus() -> i32 { 2 }
fn default_production_threshold() -> u8 { 85 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            issue_penalty: default_issue_penalty(),
            warning_penalty: default_warning_penalty(),
            compliance_bonus: default_compliance_bonus(),
            production_threshold: default_production_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementThresholds {
    #[serde(default = "default_override_confidence")]
    pub override_confidence: f64,
    #[serde(default = "default_warning_confidence")]
    pub warning_confidence: f64,
}

fn default_override_confidence() -> f64 { 0.7 }
fn default_warning_confidence() -> f64 { 0.6 }

impl Default for PlacementThresholds {
    fn default() -> Self {
        Self {
            override_confidence: default_override_confidence(),
            warning_confidence: default_warning_confidence(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_engine_version()?;

        if self.max_prompt_length < MIN_PROMPT_BUDGET {
            return Err(ConfigError::Invalid(format!(
                "maxPromptLength must be at least {}, got {}",
                MIN_PROMPT_BUDGET, self.max_prompt_length
            )));
        }
        if self.scoring.production_threshold > 100 {
            return Err(ConfigError::Invalid("productionThreshold must be within 0..=100".into()));
        }
        if self.scoring.issue_penalty < 0 || self.scoring.warning_penalty < 0 || self.scoring.compliance_bonus < 0 {
            return Err(ConfigError::Invalid("scoring penalties and bonus must be non-negative".into()));
        }

        let p = &self.placement;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(p.override_confidence) || !in_unit(p.warning_confidence) {
            return Err(ConfigError::Invalid("placement confidences must be within [0, 1]".into()));
        }
        if p.warning_confidence > p.override_confidence {
            return Err(ConfigError::Invalid(
                "warningConfidence must not exceed overrideConfidence".into(),
            ));
        }

        Ok(())
    }

    fn check_engine_version(&self) -> Result<(), ConfigError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| ConfigError::Invalid("Invalid engine version".into()))?;
        let min_ver = semver::Version::parse(&self.engine_min_version)
            .map_err(|_| ConfigError::Invalid(format!("Invalid engineMinVersion {}", self.engine_min_version)))?;

        if engine_ver < min_ver {
            return Err(ConfigError::EngineVersionMismatch(
                self.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }
        Ok(())
    }
}
