//! Swiss power pairing for two-team styles.
//!
//! Odd brackets borrow one team from the nearest lower bracket that still
//! has teams. After pairing, the optional one-up-one-down pass swaps teams
//! between consecutive rooms only.

use tracing::debug;

use crate::config::{AvoidConflicts, PowerpairOptions};
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::local_search::{minimise_conflicts, Neighbourhood};
use crate::position::assign_sides;
use crate::team::bracket::{self, Bracket, Pick};
use crate::team::{pairing, split_runs, BracketReport, PullUp, TeamDraw};

fn resolve_odd_brackets(
    ctx: &RoundContext,
    brackets: &mut [Bracket],
    pick: Pick,
) -> Result<(Vec<BracketReport>, Vec<PullUp>), DrawError> {
    let mut reports: Vec<BracketReport> = brackets.iter()
        .map(|bracket| BracketReport { points: bracket.points, ..Default::default() })
        .collect();
    let mut pullups = Vec::new();

    for i in 0..brackets.len() {
        if brackets[i].teams.len() % 2 == 0 {
            continue;
        }
        let points = brackets[i].points;
        let donor = (i + 1..brackets.len())
            .find(|j| !brackets[*j].teams.is_empty())
            .ok_or(DrawError::NoDonor { points })?;
        let from_points = brackets[donor].points;
        let pulled = bracket::take(ctx, &mut brackets[donor].teams, 1, pick, &format!("pullup:{}", i));
        for team_id in pulled {
            debug!(team_id, from_points, to_points = points, "pulled up");
            pullups.push(PullUp { team_id, from_points, to_points: points });
            reports[i].pulled_in.push(team_id);
            brackets[i].teams.push(team_id);
        }
    }

    if let Some(odd) = brackets.iter().find(|bracket| bracket.teams.len() % 2 != 0) {
        return Err(DrawError::OddBracket { points: odd.points });
    }
    for (report, bracket) in reports.iter_mut().zip(brackets.iter()) {
        report.teams = bracket.teams.clone();
    }
    Ok((reports, pullups))
}

pub fn allocate(ctx: &RoundContext, options: &PowerpairOptions) -> Result<TeamDraw, DrawError> {
    if ctx.team_num() != 2 {
        return Err(DrawError::PowerpairTeamNum { team_num: ctx.team_num() });
    }
    let mut brackets = bracket::brackets(ctx);
    let (mut reports, pullups) = resolve_odd_brackets(ctx, &mut brackets, Pick::from(options.odd_bracket))?;

    let mut groups = Vec::new();
    let mut lengths = Vec::with_capacity(reports.len());
    for (i, report) in reports.iter_mut().enumerate() {
        let paired = pairing::pair(ctx, &report.teams, options.pairing_method.into(), &format!("pairing:{}", i));
        lengths.push(paired.len());
        report.groups_before = paired.clone();
        groups.extend(paired);
    }

    let (groups, swaps) = match options.avoid_conflicts {
        AvoidConflicts::OneUpOneDown => {
            let penalty = ctx.conflict_penalty(&ctx.team_ids(), &options.conflict_weights);
            let outcome = minimise_conflicts(groups, &penalty, Neighbourhood::Adjacent, options.max_swap_iterations);
            debug!(before = outcome.score_before, after = outcome.score_after, swaps = outcome.swaps.len(), "one up one down");
            (outcome.groups, outcome.swaps)
        }
        AvoidConflicts::Off => (groups, Vec::new()),
    };
    for (report, run) in reports.iter_mut().zip(split_runs(&groups, &lengths)) {
        report.groups_after = run;
    }

    let mut draw = TeamDraw::from_groups(assign_sides(ctx, groups, options.position, 0));
    draw.pullups = pullups;
    draw.brackets = reports;
    draw.swaps = swaps;
    Ok(draw)
}
