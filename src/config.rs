//! Engine configuration, difficulty presets and feature flags
//!
//! Difficulty data is owned by collaborators (JSON files, menus); the engine
//! only consumes the derived [`EngineConfig`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::particle::PhysicsConfig;
use crate::sim::swipe::SwipeOptions;

/// A set of Moore-neighborhood counts (0..=8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct NeighborSet(u16);

impl NeighborSet {
    pub const EMPTY: Self = Self(0);

    pub fn from_counts(counts: &[u8]) -> Self {
        let mut bits = 0u16;
        for &count in counts {
            if count <= 8 {
                bits |= 1 << count;
            }
        }
        Self(bits)
    }

    #[inline]
    pub fn contains(&self, count: usize) -> bool {
        count <= 8 && self.0 & (1 << count) != 0
    }

    pub fn counts(&self) -> Vec<u8> {
        (0..=8u8).filter(|&n| self.contains(n as usize)).collect()
    }
}

impl From<Vec<u8>> for NeighborSet {
    fn from(counts: Vec<u8>) -> Self {
        Self::from_counts(&counts)
    }
}

impl From<NeighborSet> for Vec<u8> {
    fn from(set: NeighborSet) -> Self {
        set.counts()
    }
}

impl fmt::Display for NeighborSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.counts().iter().map(u8::to_string).collect();
        write!(f, "{{{}}}", parts.join(","))
    }
}

/// Birth/survival rule set shared by the grid and the particle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeRules {
    pub birth: NeighborSet,
    pub survival: NeighborSet,
}

impl Default for LifeRules {
    /// Standard Conway: B3/S23
    fn default() -> Self {
        Self {
            birth: NeighborSet::from_counts(&[3]),
            survival: NeighborSet::from_counts(&[2, 3]),
        }
    }
}

impl LifeRules {
    pub fn new(birth: &[u8], survival: &[u8]) -> Self {
        Self {
            birth: NeighborSet::from_counts(birth),
            survival: NeighborSet::from_counts(survival),
        }
    }

    /// Next alive/dead status for a cell with `neighbors` alive neighbors
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: usize) -> bool {
        if alive {
            self.survival.contains(neighbors)
        } else {
            self.birth.contains(neighbors)
        }
    }
}

/// Isolation decay parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayConfig {
    pub amount: u32,
    #[serde(default = "default_minimum_energy")]
    pub minimum_energy: u32,
}

fn default_minimum_energy() -> u32 {
    1
}

impl DecayConfig {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            minimum_energy: 1,
        }
    }
}

/// Blight token spawning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlightConfig {
    /// Probability in [0, 1] of attempting a spawn each turn
    pub spawn_chance: f64,
    /// Charges carried by a freshly spawned token
    pub linger: u32,
    /// Optional cap on simultaneous tokens
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

/// Catalyst token spawning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalystConfig {
    pub spawn_chance: f64,
    pub max_count: usize,
}

/// Everything the turn orchestrator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub e_cap: u32,
    pub life: LifeRules,
    pub dormancy_threshold: u32,
    #[serde(default)]
    pub decay: Option<DecayConfig>,
    #[serde(default)]
    pub blight: Option<BlightConfig>,
    #[serde(default)]
    pub catalyst: Option<CatalystConfig>,
    #[serde(default)]
    pub colony_bonus: bool,
    pub colony_size_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            e_cap: DEFAULT_E_CAP,
            life: LifeRules::default(),
            dormancy_threshold: DEFAULT_DORMANCY_THRESHOLD,
            decay: None,
            blight: None,
            catalyst: None,
            colony_bonus: false,
            colony_size_threshold: DEFAULT_COLONY_SIZE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Derive engine settings from a difficulty preset and the active feature flags
    pub fn from_difficulty(difficulty: &DifficultyConfig, flags: &FeatureFlags) -> Self {
        let birth: &[u8] = match difficulty.birth_rule {
            BirthRule::TwoThree => &[2, 3],
            BirthRule::Three => &[3],
        };

        let decay = (flags.decay && difficulty.decay).then(|| DecayConfig::new(1));

        let blight = (flags.blight && difficulty.blight != HazardLevel::Off).then(|| BlightConfig {
            spawn_chance: difficulty.blight.blight_spawn_chance(),
            linger: match difficulty.blight {
                HazardLevel::Medium | HazardLevel::High => 2,
                _ => 1,
            },
            max_tokens: Some(3),
        });

        let catalyst = flags.catalysts.then(|| CatalystConfig {
            spawn_chance: difficulty.catalyst_rate.catalyst_spawn_chance(),
            max_count: 2,
        });

        Self {
            e_cap: difficulty.e_cap,
            life: LifeRules::new(birth, &[2, 3]),
            dormancy_threshold: DEFAULT_DORMANCY_THRESHOLD,
            decay,
            blight,
            catalyst,
            ..Self::default()
        }
    }

    /// Whether any stochastic stage is active (requires a random source)
    pub fn has_hazards(&self) -> bool {
        self.blight.is_some() || self.catalyst.is_some()
    }

    pub fn swipe_options(&self) -> SwipeOptions {
        SwipeOptions {
            e_cap: self.e_cap,
            colony_bonus: self.colony_bonus,
            colony_size_threshold: self.colony_size_threshold,
        }
    }
}

/// Hazard intensity levels used by difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardLevel {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl HazardLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardLevel::Off => "off",
            HazardLevel::Low => "low",
            HazardLevel::Medium => "medium",
            HazardLevel::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(HazardLevel::Off),
            "low" => Some(HazardLevel::Low),
            "medium" | "med" => Some(HazardLevel::Medium),
            "high" => Some(HazardLevel::High),
            _ => None,
        }
    }

    /// Per-turn blight spawn probability
    pub fn blight_spawn_chance(&self) -> f64 {
        match self {
            HazardLevel::Off => 0.0,
            HazardLevel::Low => 0.15,
            HazardLevel::Medium => 0.25,
            HazardLevel::High => 0.35,
        }
    }

    /// Per-turn catalyst spawn probability
    pub fn catalyst_spawn_chance(&self) -> f64 {
        match self {
            HazardLevel::Off => 0.0,
            HazardLevel::Low => 0.1,
            HazardLevel::Medium => 0.2,
            HazardLevel::High => 0.3,
        }
    }
}

/// Which neighbor counts give birth to a new cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BirthRule {
    #[default]
    #[serde(rename = "2-3")]
    TwoThree,
    #[serde(rename = "3")]
    Three,
}

/// A difficulty preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub name: String,
    pub board_size: usize,
    pub e_cap: u32,
    pub birth_rule: BirthRule,
    pub blight: HazardLevel,
    /// Isolation decay enabled
    #[serde(with = "on_off")]
    pub decay: bool,
    pub catalyst_rate: HazardLevel,
    /// Total energy a stable board must reach to win
    pub stabilize_threshold: u64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::early()
    }
}

impl DifficultyConfig {
    /// Opening difficulty: small board, no blight or decay
    pub fn early() -> Self {
        Self {
            name: "early".to_string(),
            board_size: 6,
            e_cap: DEFAULT_E_CAP,
            birth_rule: BirthRule::TwoThree,
            blight: HazardLevel::Off,
            decay: false,
            catalyst_rate: HazardLevel::Low,
            stabilize_threshold: 25,
        }
    }

    /// Parse a preset, falling back to `early` when the document is malformed
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(difficulty) => difficulty,
            Err(e) => {
                log::warn!("Failed to parse difficulty ({e}), using early");
                Self::early()
            }
        }
    }
}

mod on_off {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "on" } else { "off" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(serde::de::Error::unknown_variant(other, &["on", "off"])),
        }
    }
}

/// Feature toggles layered over difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub blight: bool,
    pub catalysts: bool,
    pub decay: bool,
    pub telemetry: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            blight: false,
            catalysts: true,
            decay: false,
            telemetry: true,
        }
    }
}

/// Continuous-space Life parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleLifeOptions {
    pub rules: LifeRules,
    /// Radius within which alive particles count as neighbors
    pub neighbor_radius: f32,
    /// Ring radius for sampled birth sites around each alive particle
    pub birth_radius: f32,
    /// Upper bound on births per tick
    pub max_births: usize,
}

impl Default for ParticleLifeOptions {
    fn default() -> Self {
        Self {
            rules: LifeRules::new(&[2, 3], &[2, 3]),
            neighbor_radius: 0.15,
            birth_radius: 0.08,
            max_births: 4,
        }
    }
}

/// Particle variant turn configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub physics: PhysicsConfig,
    /// Impulse applied in the swipe direction
    pub force_strength: f32,
    /// Hard bound on settling iterations
    pub max_physics_steps: u32,
    /// A particle with any velocity component above this is still moving
    pub movement_threshold: f32,
    pub e_cap: u32,
    pub life: ParticleLifeOptions,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            force_strength: 0.15,
            max_physics_steps: 60,
            movement_threshold: 0.005,
            e_cap: DEFAULT_E_CAP,
            life: ParticleLifeOptions::default(),
        }
    }
}
