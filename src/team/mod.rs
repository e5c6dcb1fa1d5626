//! Team allocation: grouping the available teams into squares.

pub mod bracket;
pub mod pairing;
mod powerpair;
mod standard;
mod strict;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TeamAllocation;
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::local_search::SwapRecord;
use crate::model::draw::Square;
use crate::model::entity::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullUp {
    pub team_id: Id,
    pub from_points: u32,
    pub to_points: u32,
}

/// How one win bracket was resolved and paired.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BracketReport {
    pub points: u32,
    /// The pool that was paired, after pull-ups and push-downs.
    pub teams: Vec<Id>,
    pub pulled_in: Vec<Id>,
    /// Teams of this bracket carried into the next pool down.
    pub pushed_down: Vec<Id>,
    pub groups_before: Vec<Vec<Id>>,
    pub groups_after: Vec<Vec<Id>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamDraw {
    pub squares: Vec<Square>,
    pub pullups: Vec<PullUp>,
    pub brackets: Vec<BracketReport>,
    pub swaps: Vec<SwapRecord>,
}

impl TeamDraw {
    /// Square ids are the group's index in the draw.
    pub fn from_groups(groups: Vec<Vec<Id>>) -> TeamDraw {
        let squares = groups.into_iter()
            .enumerate()
            .map(|(i, teams)| Square::new(i as Id, teams))
            .collect();
        TeamDraw { squares, ..Default::default() }
    }
}

pub fn allocate(ctx: &RoundContext, allocation: &TeamAllocation) -> Result<TeamDraw, DrawError> {
    let (strategy, draw) = match allocation {
        TeamAllocation::Standard(options) => ("standard", standard::allocate(ctx, options)?),
        TeamAllocation::Strict(options) => ("strict", strict::allocate(ctx, options)?),
        TeamAllocation::Powerpair(options) => ("powerpair", powerpair::allocate(ctx, options)?),
    };
    info!(
        tournament = ctx.tournament,
        round = ctx.round,
        strategy,
        squares = draw.squares.len(),
        pullups = draw.pullups.len(),
        swaps = draw.swaps.len(),
        "team draw done"
    );
    Ok(draw)
}

/// Splits `groups` back into consecutive runs of the given lengths.
fn split_runs(groups: &[Vec<Id>], lengths: &[usize]) -> Vec<Vec<Vec<Id>>> {
    let mut start = 0;
    lengths.iter()
        .map(|length| {
            let end = (start + length).min(groups.len());
            let run = groups[start.min(end)..end].to_vec();
            start = end;
            run
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_ids_follow_draw_order() {
        let draw = TeamDraw::from_groups(vec![vec![4, 1], vec![2, 3]]);
        assert_eq!(draw.squares.iter().map(|square| square.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(draw.squares[1].teams, vec![2, 3]);
        assert!(draw.squares.iter().all(|square| square.chairs.is_empty() && square.venue.is_none()));
    }

    #[test]
    fn test_split_runs() {
        let groups = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        assert_eq!(split_runs(&groups, &[1, 0, 2]), vec![
            vec![vec![1, 2]],
            vec![],
            vec![vec![3, 4], vec![5, 6]],
        ]);
    }
}
