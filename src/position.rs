//! Which team of a room takes which side.

use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::context::RoundContext;
use crate::model::entity::Id;
use crate::seed::seeded_rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideMethod {
    /// Fewest repeated sides, from past side counts.
    #[default]
    Adjusted,
    /// Seeded shuffle.
    Random,
}

/// Times each team has already held the slot it occupies in `order`.
pub fn side_cost(ctx: &RoundContext, order: &[Id]) -> usize {
    order.iter()
        .enumerate()
        .map(|(side, id)| ctx.team(*id).map_or(0, |team| team.result.side_count(side)))
        .sum()
}

/// The cheapest ordering of `group`. Ties keep the earliest ordering in
/// lexicographic permutation order of the input, so an unplayed group keeps
/// its given order.
pub fn assign_adjusted(ctx: &RoundContext, group: &[Id]) -> Vec<Id> {
    let mut best: Option<(usize, Vec<Id>)> = None;
    for order in group.iter().copied().permutations(group.len()) {
        let cost = side_cost(ctx, &order);
        if best.as_ref().map_or(true, |(lowest, _)| cost < *lowest) {
            best = Some((cost, order));
        }
    }
    best.map_or_else(|| group.to_vec(), |(_, order)| order)
}

pub fn min_side_cost(ctx: &RoundContext, group: &[Id]) -> usize {
    side_cost(ctx, &assign_adjusted(ctx, group))
}

/// Orders every group. `first_square` is the id the first group's square
/// will get, which keys the random stream of each square.
pub fn assign_sides(ctx: &RoundContext, groups: Vec<Vec<Id>>, method: SideMethod, first_square: usize) -> Vec<Vec<Id>> {
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| match method {
            SideMethod::Adjusted => assign_adjusted(ctx, &group),
            SideMethod::Random => {
                let mut rng = seeded_rng(ctx.tournament, ctx.round, &format!("sides:{}", first_square + i));
                let mut order = group;
                order.shuffle(&mut rng);
                order
            }
        })
        .collect()
}
