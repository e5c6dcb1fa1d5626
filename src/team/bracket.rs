//! Win-count brackets and the choice of which teams move between them.

use itertools::Itertools;
use rand::seq::index;

use crate::config::{OddBracket, PullUpMethod};
use crate::context::RoundContext;
use crate::model::entity::Id;
use crate::seed::seeded_rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    pub points: u32,
    /// Strongest first.
    pub teams: Vec<Id>,
}

/// Available teams by win count, highest bracket first. Only win counts
/// some team actually has get a bracket.
pub fn brackets(ctx: &RoundContext) -> Vec<Bracket> {
    let mut ids = ctx.team_ids();
    ctx.sort_by_strength(&mut ids);
    let wins = |id: &Id| ctx.team(*id).map_or(0, |team| team.result.win);
    ids.into_iter()
        .group_by(wins)
        .into_iter()
        .map(|(points, teams)| Bracket { points, teams: teams.collect() })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Top,
    Bottom,
    Random,
}

impl From<PullUpMethod> for Pick {
    fn from(method: PullUpMethod) -> Self {
        match method {
            PullUpMethod::FromTop => Pick::Top,
            PullUpMethod::FromBottom => Pick::Bottom,
            PullUpMethod::Random => Pick::Random,
        }
    }
}

impl From<OddBracket> for Pick {
    fn from(method: OddBracket) -> Self {
        match method {
            OddBracket::PullupTop => Pick::Top,
            OddBracket::PullupBottom => Pick::Bottom,
            OddBracket::PullupRandom => Pick::Random,
        }
    }
}

/// Removes `count` teams from `teams` and returns them in their original
/// order. `label` keys the random stream of `Pick::Random`.
pub fn take(ctx: &RoundContext, teams: &mut Vec<Id>, count: usize, pick: Pick, label: &str) -> Vec<Id> {
    let count = count.min(teams.len());
    let mut chosen: Vec<usize> = match pick {
        Pick::Top => (0..count).collect(),
        Pick::Bottom => (teams.len() - count..teams.len()).collect(),
        Pick::Random => {
            let mut rng = seeded_rng(ctx.tournament, ctx.round, label);
            index::sample(&mut rng, teams.len(), count).into_vec()
        }
    };
    chosen.sort_unstable();
    let taken = chosen.iter().map(|i| teams[*i]).collect();
    let mut position = 0;
    teams.retain(|_| {
        let keep = chosen.binary_search(&position).is_err();
        position += 1;
        keep
    });
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;

    fn fixture() -> Fixture {
        let mut fixture = Fixture::teams(&[(1, &[1]), (2, &[2]), (3, &[3]), (4, &[4]), (5, &[5]), (6, &[6])]);
        fixture.set_wins(&[(1, 1), (2, 3), (3, 1), (4, 0), (5, 3), (6, 1)]);
        fixture
    }

    #[test]
    fn test_brackets_by_wins_descending() {
        let mut fixture = fixture();
        fixture.team_result(6).sum = 10.0;
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        assert_eq!(brackets(&ctx), vec![
            Bracket { points: 3, teams: vec![2, 5] },
            Bracket { points: 1, teams: vec![6, 1, 3] },
            Bracket { points: 0, teams: vec![4] },
        ]);
    }

    #[test]
    fn test_take_from_either_end() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let mut teams = vec![1, 3, 6, 4];
        assert_eq!(take(&ctx, &mut teams, 1, Pick::Top, "pullup:0"), vec![1]);
        assert_eq!(take(&ctx, &mut teams, 2, Pick::Bottom, "pullup:0"), vec![6, 4]);
        assert_eq!(teams, vec![3]);
        assert_eq!(take(&ctx, &mut teams, 5, Pick::Top, "pullup:0"), vec![3]);
        assert!(teams.is_empty());
    }

    #[test]
    fn test_random_take_is_seeded() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let mut first = vec![1, 2, 3, 4, 5, 6];
        let mut second = first.clone();
        let a = take(&ctx, &mut first, 2, Pick::Random, "pullup:1");
        let b = take(&ctx, &mut second, 2, Pick::Random, "pullup:1");
        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(a.len() + first.len(), 6);
        assert!(a.iter().all(|id| !first.contains(id)));
    }
}
