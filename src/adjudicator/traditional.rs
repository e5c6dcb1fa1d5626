//! Rank-sorted greedy allocation.
//!
//! Squares are ordered by strength or by slightness (how evenly matched
//! their teams are), starting from the top or from the middle of that
//! order. Adjudicators are taken strongest first; an adjudicator who shares
//! an institution or has a declared conflict with a room's teams is skipped
//! for that room.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::{RoleCounts, TraditionalOptions, TraditionalStrategy};
use crate::context::RoundContext;
use crate::model::draw::{Role, Square};
use crate::model::entity::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// One panel seat per room, before any chair is placed.
    PanelFirst,
    /// Chairs, the remaining panel seats, then trainees.
    Full,
}

impl Pass {
    fn seats(self, roles: &RoleCounts) -> Vec<(Role, usize)> {
        match self {
            Pass::PanelFirst => vec![(Role::Panel, roles.panels.min(1))],
            Pass::Full => vec![(Role::Chair, roles.chairs), (Role::Panel, roles.panels), (Role::Trainee, roles.trainees)],
        }
    }
}

fn passes(strategy: TraditionalStrategy, roles: &RoleCounts) -> Vec<Pass> {
    match strategy {
        TraditionalStrategy::MiddleToHigh | TraditionalStrategy::MiddleToSlight if roles.panels > 0 => {
            vec![Pass::PanelFirst, Pass::Full]
        }
        _ => vec![Pass::Full],
    }
}

fn wins(ctx: &RoundContext, square: &Square) -> Vec<f64> {
    square.teams.iter().map(|id| ctx.team(*id).map_or(0.0, |team| team.result.win as f64)).collect()
}

/// Stronger rooms first: total wins, then total speaker score.
fn compare_strength(ctx: &RoundContext, a: &Square, b: &Square) -> Ordering {
    let total = |square: &Square| -> (f64, f64) {
        square.teams.iter()
            .filter_map(|id| ctx.team(*id))
            .fold((0.0, 0.0), |(win, sum), team| (win + team.result.win as f64, sum + team.result.sum))
    };
    let (x, y) = (total(a), total(b));
    y.0.total_cmp(&x.0).then_with(|| y.1.total_cmp(&x.1)).then_with(|| a.id.cmp(&b.id))
}

/// Variance of the teams' wins; the closest rooms come first.
fn slightness(ctx: &RoundContext, square: &Square) -> f64 {
    let wins = wins(ctx, square);
    if wins.is_empty() {
        return 0.0;
    }
    let mean = wins.iter().sum::<f64>() / wins.len() as f64;
    wins.iter().map(|win| (win - mean).powi(2)).sum::<f64>() / wins.len() as f64
}

/// Indices of `n` sorted rooms from the middle outwards.
fn middle_out(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mid = n / 2;
    let mut order = vec![mid];
    for step in 1..=n {
        if step <= mid {
            order.push(mid - step);
        }
        if mid + step < n {
            order.push(mid + step);
        }
    }
    order
}

fn square_order(ctx: &RoundContext, squares: &[Square], strategy: TraditionalStrategy) -> Vec<usize> {
    let mut sorted: Vec<usize> = (0..squares.len()).collect();
    match strategy {
        TraditionalStrategy::HighToHigh | TraditionalStrategy::MiddleToHigh => {
            sorted.sort_by(|a, b| compare_strength(ctx, &squares[*a], &squares[*b]));
        }
        TraditionalStrategy::HighToSlight | TraditionalStrategy::MiddleToSlight => {
            sorted.sort_by(|a, b| {
                slightness(ctx, &squares[*a]).total_cmp(&slightness(ctx, &squares[*b]))
                    .then_with(|| compare_strength(ctx, &squares[*a], &squares[*b]))
            });
        }
    }
    match strategy {
        TraditionalStrategy::HighToHigh | TraditionalStrategy::HighToSlight => sorted,
        TraditionalStrategy::MiddleToHigh | TraditionalStrategy::MiddleToSlight => {
            middle_out(sorted.len()).into_iter().map(|i| sorted[i]).collect()
        }
    }
}

fn adjudicator_order(ctx: &RoundContext) -> Vec<Id> {
    let strength = |id: &Id| ctx.adjudicator(*id).map_or(0.0, |judge| judge.strength);
    let mut ids = ctx.adjudicator_ids();
    ids.sort_by(|a, b| strength(b).total_cmp(&strength(a)).then_with(|| a.cmp(b)));
    ids
}

/// Fills the pass's seats room by room. With `scatter`, a room looks at
/// no more than its share of the pool before the next room is served.
fn fill(ctx: &RoundContext, squares: &mut [Square], order: &[usize], pool: &mut Vec<Id>, seats: &[(Role, usize)], scatter: bool) {
    let cap = if scatter && !order.is_empty() {
        (pool.len() + order.len() - 1) / order.len()
    } else {
        usize::MAX
    };
    for index in order {
        let square = &mut squares[*index];
        let mut scanned = 0;
        let mut cursor = 0;
        while cursor < pool.len() && scanned < cap {
            let Some(role) = seats.iter().find(|(role, wanted)| square.role(*role).len() < *wanted).map(|(role, _)| *role) else {
                break;
            };
            let candidate = pool[cursor];
            scanned += 1;
            if ctx.adjudicator_conflicts(candidate, &square.teams) {
                cursor += 1;
                continue;
            }
            square.role_mut(role).push(candidate);
            pool.remove(cursor);
        }
    }
}

pub fn allocate(ctx: &RoundContext, draw: &[Square], options: &TraditionalOptions) -> Vec<Square> {
    let mut squares: Vec<Square> = draw.iter().map(Square::unstaffed).collect();
    let order = square_order(ctx, &squares, options.strategy);
    let mut pool = adjudicator_order(ctx);
    for pass in passes(options.strategy, &options.roles) {
        fill(ctx, &mut squares, &order, &mut pool, &pass.seats(&options.roles), options.scatter);
        debug!(?pass, remaining = pool.len(), "traditional pass finished");
    }
    squares
}
