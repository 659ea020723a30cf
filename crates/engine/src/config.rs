use serde::Deserialize;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// All engine tunables. Every heuristic threshold is a named field so the
/// scorer and linker stay tunable independently of each other.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub linker: LinkerConfig,
    #[serde(default)]
    pub anomaly: AnomalyConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            linker: LinkerConfig::default(),
            anomaly: AnomalyConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

fn default_name() -> String {
    "default".into()
}

// ---------------------------------------------------------------------------
// Linker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LinkerConfig {
    /// Minimum name similarity for a declared relation to match a co-resident.
    /// The first candidate in household order clearing this wins; ties between
    /// later candidates are never considered.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.6
}

// ---------------------------------------------------------------------------
// Anomaly rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyConfig {
    /// Score contributed by each rule trigger.
    #[serde(default = "default_rule_weight")]
    pub rule_weight: u32,
    /// Minimum plausible parent-to-child age gap in years.
    #[serde(default = "default_min_parent_gap")]
    pub min_parent_gap: u32,
    /// Maximum head-type relation declarations before a household looks odd.
    #[serde(default = "default_max_heads")]
    pub max_heads: usize,
    /// Minimum eligible voter age.
    #[serde(default = "default_min_voter_age")]
    pub min_voter_age: u32,
    /// Minimum age spread expected of a real multigenerational household.
    #[serde(default = "default_min_age_spread")]
    pub min_age_spread: u32,
    /// The age-spread rule only fires above this many members with known age.
    #[serde(default = "default_spread_min_members")]
    pub spread_min_members: usize,
    /// Households above this size with zero links look fabricated.
    #[serde(default = "default_large_household")]
    pub large_household: usize,
    /// Similarity threshold for the parentage rule's name match.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            rule_weight: default_rule_weight(),
            min_parent_gap: default_min_parent_gap(),
            max_heads: default_max_heads(),
            min_voter_age: default_min_voter_age(),
            min_age_spread: default_min_age_spread(),
            spread_min_members: default_spread_min_members(),
            large_household: default_large_household(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

fn default_rule_weight() -> u32 {
    2
}

fn default_min_parent_gap() -> u32 {
    15
}

fn default_max_heads() -> usize {
    4
}

fn default_min_voter_age() -> u32 {
    18
}

fn default_min_age_spread() -> u32 {
    10
}

fn default_spread_min_members() -> usize {
    4
}

fn default_large_household() -> usize {
    8
}

// ---------------------------------------------------------------------------
// Tree layout
// ---------------------------------------------------------------------------

/// Node box dimensions and gaps, in abstract layout units.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_node_width")]
    pub node_width: f32,
    #[serde(default = "default_node_height")]
    pub node_height: f32,
    #[serde(default = "default_h_gap")]
    pub h_gap: f32,
    #[serde(default = "default_v_gap")]
    pub v_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            h_gap: default_h_gap(),
            v_gap: default_v_gap(),
        }
    }
}

fn default_node_width() -> f32 {
    120.0
}

fn default_node_height() -> f32 {
    70.0
}

fn default_h_gap() -> f32 {
    20.0
}

fn default_v_gap() -> f32 {
    40.0
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (label, value) in [
            ("linker.similarity_threshold", self.linker.similarity_threshold),
            ("anomaly.similarity_threshold", self.anomaly.similarity_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(EngineError::ConfigValidation(format!(
                    "{label} must be in (0, 1], got {value}"
                )));
            }
        }

        if self.anomaly.rule_weight == 0 {
            return Err(EngineError::ConfigValidation(
                "anomaly.rule_weight must be at least 1".into(),
            ));
        }

        if self.layout.node_width <= 0.0 || self.layout.node_height <= 0.0 {
            return Err(EngineError::ConfigValidation(format!(
                "layout node box must be positive, got {}x{}",
                self.layout.node_width, self.layout.node_height
            )));
        }

        if self.layout.h_gap < 0.0 || self.layout.v_gap < 0.0 {
            return Err(EngineError::ConfigValidation(
                "layout gaps must not be negative".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
