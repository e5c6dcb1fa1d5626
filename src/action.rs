use std::ops::Add;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::model::condition::Score;

pub type Index = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub group_index: Index,
    pub member_index: Index,
}

impl Position {
    pub fn new(group_index: Index, member_index: Index) -> Position {
        Position { group_index, member_index }
    }
}

/// Exchange of two teams between rooms. `upper` is always the earlier room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub upper: Position,
    pub lower: Position,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Swap within one group")]
    SameGroup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Change of the conflict score; negative is an improvement.
    ScoreDiff(Score),
    Failed(Vec<ActionError>),
}

impl ActionResult {
    pub fn gain(&self) -> Option<Score> {
        match self {
            ActionResult::ScoreDiff(diff) => Some(-diff),
            ActionResult::Failed(_) => None,
        }
    }
}

impl Add for ActionResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (ActionResult::ScoreDiff(s1), ActionResult::ScoreDiff(s2))
                => ActionResult::ScoreDiff(s1 + s2),
            (ActionResult::Failed(err1), ActionResult::Failed(err2))
                => ActionResult::Failed(err1.into_iter().chain(err2).collect()),
            (failed @ ActionResult::Failed(_), _) | (_, failed @ ActionResult::Failed(_))
                => failed,
        }
    }
}
