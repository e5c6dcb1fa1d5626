use thiserror::Error;

use crate::filter::Filter;
use crate::model::entity::{Id, Round};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DrawError {
    #[error("style.team_num must be 2 or 4, got {0}")]
    InvalidTeamNum(usize),
    #[error("powerpair supports only style.team_num=2")]
    PowerpairTeamNum { team_num: usize },
    #[error("{available} available teams cannot be split into rooms of {team_num}")]
    IndivisibleTeams { available: usize, team_num: usize },
    #[error("bracket with {points} wins is odd and no lower bracket has a team to pull up")]
    NoDonor { points: u32 },
    #[error("bracket with {points} wins is still odd after pull-ups")]
    OddBracket { points: u32 },
    #[error("filter {filter} cannot rank {subject}")]
    UnsupportedFilter { filter: Filter, subject: &'static str },
    #[error("custom ranking needs {expected} weights, got {got}")]
    CustomWeights { expected: usize, got: usize },
    #[error("no compiled result for team {0}")]
    MissingTeamResult(Id),
    #[error("no compiled result for adjudicator {0}")]
    MissingAdjudicatorResult(Id),
    #[error("{kind} {id} has no detail for round {round}")]
    MissingRoundDetail { kind: &'static str, id: Id, round: Round },
    #[error("{kind} id {id} appears more than once")]
    DuplicateId { kind: &'static str, id: Id },
    #[error("no team is available in round {0}")]
    NoTeams(Round),
    #[error("the team draw is empty")]
    EmptyDraw,
    #[error("{available} available venues for {squares} rooms")]
    NotEnoughVenues { available: usize, squares: usize },
    #[error("team {seed} could only be grouped with {found} of {wanted} partners")]
    IncompleteGroup { seed: Id, found: usize, wanted: usize },
    #[error("invalid draw config: {0}")]
    Config(String),
}
