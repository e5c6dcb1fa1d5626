//! Greedy swap search over formed rooms.
//!
//! Each iteration evaluates every candidate swap of the neighbourhood and
//! applies the one with the largest strictly positive gain. Candidates are
//! generated in `(upper group, lower group, upper member, lower member)`
//! order and only a strictly larger gain replaces the best so far, which
//! fixes the tie-break.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{Index, Position, Swap};
use crate::cache::TableCache;
use crate::model::condition::{ConflictPenalty, Score};
use crate::model::entity::Id;

pub const DEFAULT_MAX_SWAP_ITERATIONS: usize = 24;

const MIN_GAIN: Score = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbourhood {
    /// Any two rooms.
    AllPairs,
    /// Consecutive rooms only, one team from each.
    Adjacent,
}

struct SwapGenerator {
    sizes: Vec<Index>,
    neighbourhood: Neighbourhood,
}

impl SwapGenerator {
    fn group_pairs(&self) -> Vec<(Index, Index)> {
        let n = self.sizes.len();
        match self.neighbourhood {
            Neighbourhood::AllPairs => (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).collect(),
            Neighbourhood::Adjacent => (1..n).map(|j| (j - 1, j)).collect(),
        }
    }

    fn candidates(&self) -> Vec<Swap> {
        self.group_pairs()
            .into_iter()
            .flat_map(|(upper, lower)| {
                let lower_size = self.sizes[lower];
                (0..self.sizes[upper]).flat_map(move |i| {
                    (0..lower_size).map(move |j| Swap { upper: Position::new(upper, i), lower: Position::new(lower, j) })
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub iteration: usize,
    pub upper: Position,
    pub lower: Position,
    /// Team moved down, team moved up.
    pub teams: (Id, Id),
    pub gain: Score,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub groups: Vec<Vec<Id>>,
    pub swaps: Vec<SwapRecord>,
    pub score_before: Score,
    pub score_after: Score,
}

pub fn minimise_conflicts(
    groups: Vec<Vec<Id>>,
    penalty: &ConflictPenalty,
    neighbourhood: Neighbourhood,
    max_iterations: usize,
) -> SearchOutcome {
    let mut table = TableCache::create(&groups, penalty);
    let score_before = table.penalty_score;
    let generator = SwapGenerator { sizes: table.sizes(), neighbourhood };
    let candidates = generator.candidates();
    let mut swaps = Vec::new();

    for iteration in 0..max_iterations {
        let mut best: Option<(Swap, Score)> = None;
        for swap in &candidates {
            let Some(gain) = table.simulate(swap).gain() else { continue };
            if gain > MIN_GAIN && best.map_or(true, |(_, top)| gain > top) {
                best = Some((*swap, gain));
            }
        }
        let Some((swap, gain)) = best else { break };
        let (Some(upper), Some(lower)) = (table.get_member(&swap.upper), table.get_member(&swap.lower)) else { break };
        if table.act(&swap).is_err() {
            break;
        }
        debug!(iteration, upper, lower, gain, "swapped teams between rooms");
        swaps.push(SwapRecord { iteration, upper: swap.upper, lower: swap.lower, teams: (upper, lower), gain });
    }

    SearchOutcome { groups: table.groups(), swaps, score_before, score_after: table.penalty_score }
}
