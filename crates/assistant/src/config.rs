//! Assistant configuration structures and loaders.

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AppDomain;

/// Category name used for milestones over all answered queries.
pub const OVERALL_CATEGORY: &str = "overall";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Policy knobs recognized by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Minimum classifier confidence (inclusive) for a query to be answered.
    pub confidence_threshold: f32,
    /// Opportunities must score strictly above this to be surfaced.
    pub relevance_floor: f32,
    /// Relevance drift under which a previous suggestion is reused.
    pub relevance_epsilon: f32,
    /// Milestone thresholds keyed by intent category (or [`OVERALL_CATEGORY`]).
    pub milestone_thresholds: BTreeMap<String, Vec<u32>>,
    /// Thresholds for categories without an explicit entry.
    pub default_milestone_thresholds: Vec<u32>,
    /// Ticks between model refresh calls. `0` disables refreshing.
    pub model_refresh_interval: u64,
    /// Ticks a proactive suggestion blocks further suggestions.
    pub suggestion_cooldown: u64,
    /// Ticks without activity before a "next step" hint becomes relevant.
    pub idle_suggestion_after: u64,
    /// Number of recent activity events kept for snapshots.
    pub activity_window: usize,
    /// Age in ticks after which an activity event no longer counts as recent.
    pub activity_horizon: u64,
    /// Minimum change in target complexity that is forwarded to the UI.
    pub complexity_hysteresis: f32,
    /// Capacity of the error channel.
    pub error_buffer_size: usize,
    pub domain: AppDomain,
    /// Panic on invariant violations instead of logging and resetting.
    pub strict_invariants: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            relevance_floor: 0.4,
            relevance_epsilon: 0.05,
            milestone_thresholds: BTreeMap::new(),
            default_milestone_thresholds: vec![1, 5, 10, 25],
            model_refresh_interval: 120,
            suggestion_cooldown: 30,
            idle_suggestion_after: 90,
            activity_window: 32,
            activity_horizon: 120,
            complexity_hysteresis: 0.05,
            error_buffer_size: 64,
            domain: AppDomain::default(),
            strict_invariants: cfg!(debug_assertions),
        }
    }
}

impl AssistantConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ASSISTANT_CONFIDENCE_THRESHOLD` - Query confidence threshold (default: 0.5)
    /// - `ASSISTANT_RELEVANCE_FLOOR` - Opportunity relevance floor (default: 0.4)
    /// - `ASSISTANT_MODEL_REFRESH_INTERVAL` - Ticks between model refreshes (default: 120)
    /// - `ASSISTANT_SUGGESTION_COOLDOWN` - Ticks between suggestions (default: 30)
    /// - `ASSISTANT_ACTIVITY_HORIZON` - Ticks an activity event stays recent (default: 120)
    /// - `ASSISTANT_DOMAIN` - game, cad, animation or general (default: general)
    /// - `ASSISTANT_STRICT_INVARIANTS` - Panic on invariant violations
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables on top of `self`.
    pub fn apply_env(&mut self) {
        if let Some(value) = read_env::<f32>("ASSISTANT_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = value;
        }
        if let Some(value) = read_env::<f32>("ASSISTANT_RELEVANCE_FLOOR") {
            self.relevance_floor = value;
        }
        if let Some(value) = read_env::<u64>("ASSISTANT_MODEL_REFRESH_INTERVAL") {
            self.model_refresh_interval = value;
        }
        if let Some(value) = read_env::<u64>("ASSISTANT_SUGGESTION_COOLDOWN") {
            self.suggestion_cooldown = value;
        }
        if let Some(value) = read_env::<u64>("ASSISTANT_ACTIVITY_HORIZON") {
            self.activity_horizon = value;
        }
        if let Some(domain) = read_env::<AppDomain>("ASSISTANT_DOMAIN") {
            self.domain = domain;
        }
        if let Some(strict) = read_env::<bool>("ASSISTANT_STRICT_INVARIANTS") {
            self.strict_invariants = strict;
        }
    }

    /// Parse a RON document. Missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("confidence_threshold", self.confidence_threshold)?;
        check_unit("relevance_floor", self.relevance_floor)?;
        check_unit("complexity_hysteresis", self.complexity_hysteresis)?;
        if self.relevance_epsilon.is_nan() || self.relevance_epsilon < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "relevance_epsilon",
                value: f64::from(self.relevance_epsilon),
            });
        }
        if self.activity_window == 0 {
            return Err(ConfigError::Zero {
                field: "activity_window",
            });
        }
        if self.activity_horizon == 0 {
            return Err(ConfigError::Zero {
                field: "activity_horizon",
            });
        }
        if self.error_buffer_size == 0 {
            return Err(ConfigError::Zero {
                field: "error_buffer_size",
            });
        }
        Ok(())
    }

    /// Milestone thresholds that apply to `category`.
    pub fn milestone_thresholds_for(&self, category: &str) -> &[u32] {
        self.milestone_thresholds
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&self.default_milestone_thresholds)
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: f64::from(value),
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AssistantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_threshold, 0.5);
    }

    #[test]
    fn ron_overrides_selected_fields() {
        let config = AssistantConfig::from_ron_str(
            r#"(
                confidence_threshold: 0.7,
                domain: game,
                milestone_thresholds: { "add_physics_component": [2, 4] },
            )"#,
        )
        .unwrap();

        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.domain, AppDomain::Game);
        assert_eq!(config.relevance_floor, 0.4);
        assert_eq!(
            config.milestone_thresholds_for("add_physics_component"),
            &[2, 4]
        );
        assert_eq!(config.milestone_thresholds_for("set_keyframe"), &[1, 5, 10, 25]);
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = AssistantConfig::from_ron_str("(confidence_threshold: 1.5)").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "confidence_threshold",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_window() {
        let config = AssistantConfig {
            activity_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "activity_window"
            })
        ));
    }
}
