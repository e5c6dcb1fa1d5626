//! Bracket pairing: every pool is made divisible by `team_num` before
//! pairing, by pulling teams up from the next bracket or pushing the
//! surplus down into it.

use tracing::debug;

use crate::config::StrictOptions;
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::local_search::{minimise_conflicts, Neighbourhood};
use crate::model::entity::Id;
use crate::position::assign_sides;
use crate::team::bracket::{self, Pick};
use crate::team::{pairing, split_runs, BracketReport, PullUp, TeamDraw};

fn resolve_pools(ctx: &RoundContext, options: &StrictOptions) -> Result<(Vec<BracketReport>, Vec<PullUp>), DrawError> {
    let team_num = ctx.team_num();
    let mut brackets = bracket::brackets(ctx);
    let available: usize = brackets.iter().map(|b| b.teams.len()).sum();
    if available % team_num != 0 {
        return Err(DrawError::IndivisibleTeams { available, team_num });
    }

    let mut pools = Vec::with_capacity(brackets.len());
    let mut pullups = Vec::new();
    let mut carried: Vec<Id> = Vec::new();
    for i in 0..brackets.len() {
        let points = brackets[i].points;
        let mut teams = std::mem::take(&mut carried);
        teams.append(&mut brackets[i].teams);
        let mut report = BracketReport { points, ..Default::default() };

        let surplus = teams.len() % team_num;
        if surplus != 0 {
            let deficit = team_num - surplus;
            match brackets.get_mut(i + 1) {
                Some(next) if next.teams.len() >= deficit => {
                    let pulled = bracket::take(ctx, &mut next.teams, deficit, Pick::from(options.pullup), &format!("pullup:{}", i));
                    for team_id in &pulled {
                        debug!(team_id, from_points = next.points, to_points = points, "pulled up");
                        pullups.push(PullUp { team_id: *team_id, from_points: next.points, to_points: points });
                    }
                    report.pulled_in = pulled.clone();
                    teams.extend(pulled);
                }
                Some(_) => {
                    carried = teams.split_off(teams.len() - surplus);
                    debug!(points, pushed = carried.len(), "pushed surplus down");
                    report.pushed_down = carried.clone();
                }
                None => return Err(DrawError::IndivisibleTeams { available, team_num }),
            }
        }
        report.teams = teams;
        pools.push(report);
    }
    Ok((pools, pullups))
}

pub fn allocate(ctx: &RoundContext, options: &StrictOptions) -> Result<TeamDraw, DrawError> {
    let (mut pools, pullups) = resolve_pools(ctx, options)?;

    let mut groups = Vec::new();
    let mut lengths = Vec::with_capacity(pools.len());
    for (i, pool) in pools.iter().enumerate() {
        let paired = pairing::pair(ctx, &pool.teams, options.pairing, &format!("pairing:{}", i));
        lengths.push(paired.len());
        groups.extend(paired);
    }
    let groups = assign_sides(ctx, groups, options.position, 0);
    for (pool, run) in pools.iter_mut().zip(split_runs(&groups, &lengths)) {
        pool.groups_before = run;
    }

    let (groups, swaps) = if options.avoid_conflict {
        let penalty = ctx.conflict_penalty(&ctx.team_ids(), &options.conflict_weights);
        let outcome = minimise_conflicts(groups, &penalty, Neighbourhood::AllPairs, options.max_swap_iterations);
        debug!(before = outcome.score_before, after = outcome.score_after, swaps = outcome.swaps.len(), "resolved conflicts");
        (outcome.groups, outcome.swaps)
    } else {
        (groups, Vec::new())
    };
    for (pool, run) in pools.iter_mut().zip(split_runs(&groups, &lengths)) {
        pool.groups_after = run;
    }

    let mut draw = TeamDraw::from_groups(groups);
    draw.pullups = pullups;
    draw.brackets = pools;
    draw.swaps = swaps;
    Ok(draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PairingMethod, PullUpMethod};
    use crate::fixtures::Fixture;

    fn groups(draw: &TeamDraw) -> Vec<Vec<Id>> {
        draw.squares.iter().map(|square| square.teams.clone()).collect()
    }

    fn options(pullup: PullUpMethod) -> StrictOptions {
        StrictOptions { pullup, avoid_conflict: false, ..Default::default() }
    }

    fn fixture() -> Fixture {
        let mut fixture = Fixture::teams(&[(1, &[1]), (2, &[2]), (3, &[3]), (4, &[4]), (5, &[5]), (6, &[6])]);
        fixture.set_wins(&[(1, 2), (2, 1), (3, 1), (4, 1), (5, 0), (6, 0)]);
        fixture
    }

    #[test]
    fn test_pull_up_from_top() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let draw = allocate(&ctx, &options(PullUpMethod::FromTop)).unwrap();
        assert_eq!(draw.pullups, vec![PullUp { team_id: 2, from_points: 1, to_points: 2 }]);
        assert_eq!(groups(&draw), vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(draw.brackets[0].pulled_in, vec![2]);
        assert_eq!(draw.brackets[1].teams, vec![3, 4]);
    }

    #[test]
    fn test_pull_up_from_bottom() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let draw = allocate(&ctx, &options(PullUpMethod::FromBottom)).unwrap();
        assert_eq!(draw.pullups, vec![PullUp { team_id: 4, from_points: 1, to_points: 2 }]);
        assert_eq!(groups(&draw), vec![vec![1, 4], vec![2, 3], vec![5, 6]]);
    }

    #[test]
    fn test_surplus_is_pushed_down_when_next_bracket_is_short() {
        let mut fixture = Fixture::teams(&[(1, &[1]), (2, &[2]), (3, &[3]), (4, &[4])]);
        // the top pool needs two more teams but the next bracket has one
        fixture.set_wins(&[(1, 3), (2, 3), (3, 2), (4, 0)]);
        fixture.style.team_num = 4;
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let draw = allocate(&ctx, &options(PullUpMethod::FromTop)).unwrap();
        assert_eq!(draw.brackets[0].pushed_down, vec![1, 2]);
        assert!(draw.brackets[0].teams.is_empty());
        assert_eq!(draw.pullups, vec![PullUp { team_id: 4, from_points: 0, to_points: 2 }]);
        assert_eq!(draw.brackets[1].teams, vec![1, 2, 3, 4]);
        assert!(draw.brackets[2].teams.is_empty());
        assert_eq!(groups(&draw), vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_indivisible_is_rejected() {
        let fixture = Fixture::teams(&[(1, &[1]), (2, &[2]), (3, &[3])]);
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        assert_eq!(
            allocate(&ctx, &options(PullUpMethod::FromTop)).err(),
            Some(DrawError::IndivisibleTeams { available: 3, team_num: 2 })
        );
    }

    #[test]
    fn test_avoid_conflict_swaps_across_brackets() {
        let mut fixture = Fixture::teams(&[(1, &[1]), (2, &[1]), (3, &[2]), (4, &[3])]);
        fixture.set_wins(&[(1, 1), (2, 1), (3, 0), (4, 0)]);
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let options = StrictOptions { pairing: PairingMethod::Slide, ..Default::default() };
        let draw = allocate(&ctx, &options).unwrap();
        assert_eq!(draw.brackets[0].groups_before, vec![vec![1, 2]]);
        assert_eq!(groups(&draw), vec![vec![3, 2], vec![1, 4]]);
        assert_eq!(draw.swaps.len(), 1);
        assert_eq!(draw.brackets[0].groups_after, vec![vec![3, 2]]);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let options = StrictOptions {
            pullup: PullUpMethod::Random,
            pairing: PairingMethod::Random,
            position: crate::position::SideMethod::Random,
            avoid_conflict: false,
            ..Default::default()
        };
        assert_eq!(allocate(&ctx, &options).unwrap(), allocate(&ctx, &options).unwrap());
    }
}
