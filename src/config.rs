//! Strategy options for a round's draw.
//!
//! Loaded from TOML or JSON; every field has a default, so an empty
//! document is a valid config (standard teams, one chair per room).

use serde::{Deserialize, Serialize};

use crate::error::DrawError;
use crate::filter::{Combination, Filter};
use crate::local_search::DEFAULT_MAX_SWAP_ITERATIONS;
use crate::model::condition::ConflictWeights;
use crate::position::SideMethod;

fn default_max_swap_iterations() -> usize {
    DEFAULT_MAX_SWAP_ITERATIONS
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub team: TeamAllocation,
    pub adjudicator: AdjudicatorAllocation,
}

impl DrawConfig {
    pub fn from_toml_str(source: &str) -> Result<DrawConfig, DrawError> {
        toml::from_str(source).map_err(|e| DrawError::Config(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<DrawConfig, DrawError> {
        serde_json::from_str(source).map_err(|e| DrawError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TeamAllocation {
    Standard(StandardTeamOptions),
    Strict(StrictOptions),
    Powerpair(PowerpairOptions),
}

impl Default for TeamAllocation {
    fn default() -> Self {
        TeamAllocation::Standard(StandardTeamOptions::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardTeamOptions {
    pub filters: Vec<Filter>,
    pub combination: Combination,
    pub position: SideMethod,
}

impl Default for StandardTeamOptions {
    fn default() -> Self {
        StandardTeamOptions {
            filters: vec![Filter::Strength, Filter::Side, Filter::PastOpponent, Filter::Institution],
            combination: Combination::Original,
            position: SideMethod::Adjusted,
        }
    }
}

/// Which teams of the next bracket down are pulled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PullUpMethod {
    #[default]
    #[serde(rename = "fromtop")]
    FromTop,
    #[serde(rename = "frombottom")]
    FromBottom,
    #[serde(rename = "random")]
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMethod {
    /// `team_num` contiguous blocks zipped positionally.
    Sort,
    /// As `sort`, with the back half of the blocks reversed.
    #[default]
    Fold,
    /// Consecutive runs of `team_num` teams.
    Slide,
    /// Seeded shuffle, then consecutive runs.
    Random,
    /// Exhaustive search for the split with the least side repetition.
    /// Pools of more than 12 teams are cut into consecutive chunks first and
    /// each chunk is searched on its own, so the result is only the minimum
    /// per chunk.
    Adjusted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrictOptions {
    pub pullup: PullUpMethod,
    pub pairing: PairingMethod,
    pub position: SideMethod,
    pub avoid_conflict: bool,
    #[serde(default = "default_max_swap_iterations")]
    pub max_swap_iterations: usize,
    pub conflict_weights: ConflictWeights,
}

impl Default for StrictOptions {
    fn default() -> Self {
        StrictOptions {
            pullup: PullUpMethod::FromTop,
            pairing: PairingMethod::Fold,
            position: SideMethod::Adjusted,
            avoid_conflict: true,
            max_swap_iterations: DEFAULT_MAX_SWAP_ITERATIONS,
            conflict_weights: ConflictWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddBracket {
    #[default]
    PullupTop,
    PullupBottom,
    PullupRandom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerpairMethod {
    #[default]
    Fold,
    Slide,
    Random,
}

impl From<PowerpairMethod> for PairingMethod {
    fn from(method: PowerpairMethod) -> Self {
        match method {
            PowerpairMethod::Fold => PairingMethod::Fold,
            PowerpairMethod::Slide => PairingMethod::Slide,
            PowerpairMethod::Random => PairingMethod::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidConflicts {
    Off,
    #[default]
    OneUpOneDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerpairOptions {
    pub odd_bracket: OddBracket,
    pub pairing_method: PowerpairMethod,
    pub position: SideMethod,
    pub avoid_conflicts: AvoidConflicts,
    #[serde(default = "default_max_swap_iterations")]
    pub max_swap_iterations: usize,
    pub conflict_weights: ConflictWeights,
}

impl Default for PowerpairOptions {
    fn default() -> Self {
        PowerpairOptions {
            odd_bracket: OddBracket::PullupTop,
            pairing_method: PowerpairMethod::Fold,
            position: SideMethod::Adjusted,
            avoid_conflicts: AvoidConflicts::OneUpOneDown,
            max_swap_iterations: DEFAULT_MAX_SWAP_ITERATIONS,
            conflict_weights: ConflictWeights::default(),
        }
    }
}

/// Adjudicators requested per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCounts {
    pub chairs: usize,
    pub panels: usize,
    pub trainees: usize,
}

impl Default for RoleCounts {
    fn default() -> Self {
        RoleCounts { chairs: 1, panels: 0, trainees: 0 }
    }
}

impl RoleCounts {
    pub fn per_square(&self) -> usize {
        self.chairs + self.panels + self.trainees
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AdjudicatorAllocation {
    Standard(StandardAdjudicatorOptions),
    Traditional(TraditionalOptions),
}

impl Default for AdjudicatorAllocation {
    fn default() -> Self {
        AdjudicatorAllocation::Standard(StandardAdjudicatorOptions::default())
    }
}

impl AdjudicatorAllocation {
    pub fn roles(&self) -> RoleCounts {
        match self {
            AdjudicatorAllocation::Standard(options) => options.roles,
            AdjudicatorAllocation::Traditional(options) => options.roles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardAdjudicatorOptions {
    pub roles: RoleCounts,
    /// How a room ranks adjudicators.
    pub square_filters: Vec<Filter>,
    /// How an adjudicator ranks rooms.
    pub adjudicator_filters: Vec<Filter>,
    /// Combines `square_filters`; custom weights match that list.
    pub square_combination: Combination,
    /// Combines `adjudicator_filters`; custom weights match that list.
    pub adjudicator_combination: Combination,
}

impl Default for StandardAdjudicatorOptions {
    fn default() -> Self {
        StandardAdjudicatorOptions {
            roles: RoleCounts::default(),
            square_filters: vec![Filter::Bubble, Filter::Strength, Filter::Attendance, Filter::Random],
            adjudicator_filters: vec![Filter::Past, Filter::Institution, Filter::Conflict],
            square_combination: Combination::Original,
            adjudicator_combination: Combination::Original,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraditionalStrategy {
    #[default]
    HighToHigh,
    HighToSlight,
    MiddleToHigh,
    MiddleToSlight,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraditionalOptions {
    pub roles: RoleCounts,
    pub strategy: TraditionalStrategy,
    pub scatter: bool,
}
