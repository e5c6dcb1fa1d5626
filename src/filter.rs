//! Named comparator chains used to build preference lists.
//!
//! A filter compares two candidates `a` and `b` from the point of view of a
//! pivot and returns `-1`, `0` or `1`. A positive value means `a` is worse
//! and sorts after `b`. When every filter ties, candidates fall back to
//! ascending id, so two distinct candidates never compare equal.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::RoundContext;
use crate::error::DrawError;
use crate::model::entity::{Id, Round};

/// Offset of the deterministic tie-break key `id mod (round + 2760)`.
pub const RANDOM_KEY_OFFSET: Round = 2760;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    #[serde(rename = "by_strength")]
    Strength,
    #[serde(rename = "by_bubble")]
    Bubble,
    #[serde(rename = "by_attendance")]
    Attendance,
    #[serde(rename = "by_past")]
    Past,
    #[serde(rename = "by_institution")]
    Institution,
    #[serde(rename = "by_conflict")]
    Conflict,
    #[serde(rename = "by_random")]
    Random,
    #[serde(rename = "by_side")]
    Side,
    #[serde(rename = "by_past_opponent")]
    PastOpponent,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Strength => "by_strength",
            Filter::Bubble => "by_bubble",
            Filter::Attendance => "by_attendance",
            Filter::Past => "by_past",
            Filter::Institution => "by_institution",
            Filter::Conflict => "by_conflict",
            Filter::Random => "by_random",
            Filter::Side => "by_side",
            Filter::PastOpponent => "by_past_opponent",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the per-filter results of one comparison are combined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Combination {
    /// First non-zero filter decides.
    #[default]
    Original,
    /// Sign of the unweighted sum.
    Straight,
    /// Sign of the sum weighted by `1 / (index + 1)`.
    Weighted,
    Custom { weights: Vec<f64> },
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// `a` is worse when its key is larger.
fn smaller_first(a: f64, b: f64) -> i8 {
    sign(a - b)
}

/// `a` is worse when its key is smaller.
fn larger_first(a: f64, b: f64) -> i8 {
    sign(b - a)
}

pub fn random_key(id: Id, round: Round) -> Id {
    id % (round + RANDOM_KEY_OFFSET)
}

/// One side of a preference relation: who ranks, and over whom.
pub trait Ranker {
    const SUBJECT: &'static str;

    fn supports(filter: Filter) -> bool;

    fn evaluate(&self, filter: Filter, pivot: Id, a: Id, b: Id) -> i8;
}

/// A validated filter chain bound to a ranker.
pub struct Ranking<'r, R: Ranker> {
    ranker: &'r R,
    filters: Vec<Filter>,
    weights: Option<Vec<f64>>,
}

impl<'r, R: Ranker> Ranking<'r, R> {
    pub fn new(ranker: &'r R, filters: &[Filter], combination: &Combination) -> Result<Self, DrawError> {
        if let Some(filter) = filters.iter().find(|filter| !R::supports(**filter)) {
            return Err(DrawError::UnsupportedFilter { filter: *filter, subject: R::SUBJECT });
        }
        let weights = match combination {
            Combination::Original => None,
            Combination::Straight => Some(vec![1.0; filters.len()]),
            Combination::Weighted => Some((0..filters.len()).map(|i| 1.0 / (i + 1) as f64).collect()),
            Combination::Custom { weights } if weights.len() == filters.len() => Some(weights.clone()),
            Combination::Custom { weights } => {
                return Err(DrawError::CustomWeights { expected: filters.len(), got: weights.len() })
            }
        };
        Ok(Ranking { ranker, filters: filters.to_vec(), weights })
    }

    pub fn compare(&self, pivot: Id, a: Id, b: Id) -> Ordering {
        let verdict = match &self.weights {
            None => self.filters.iter()
                .map(|filter| self.ranker.evaluate(*filter, pivot, a, b))
                .find(|result| *result != 0)
                .unwrap_or(0),
            Some(weights) => sign(self.filters.iter().zip(weights)
                .map(|(filter, weight)| weight * self.ranker.evaluate(*filter, pivot, a, b) as f64)
                .sum()),
        };
        match verdict {
            1 => Ordering::Greater,
            -1 => Ordering::Less,
            _ => a.cmp(&b),
        }
    }

    /// Candidates best first. Pivot and candidates may live in different id
    /// spaces, so the pivot is not filtered out here.
    pub fn preferences(&self, pivot: Id, candidates: &[Id]) -> Vec<Id> {
        let mut ranked = candidates.to_vec();
        merge_sort(&mut ranked, |a, b| self.compare(pivot, *a, *b));
        ranked
    }

    pub fn preference_table(&self, pivots: &[Id], candidates: &[Id]) -> BTreeMap<Id, Vec<Id>> {
        pivots.iter().map(|pivot| (*pivot, self.preferences(*pivot, candidates))).collect()
    }

    /// Preferences of each pivot over the others of the same set.
    pub fn peer_table(&self, ids: &[Id]) -> BTreeMap<Id, Vec<Id>> {
        ids.iter()
            .map(|pivot| {
                let others: Vec<Id> = ids.iter().copied().filter(|id| id != pivot).collect();
                (*pivot, self.preferences(*pivot, &others))
            })
            .collect()
    }
}

/// Stable merge sort. Weighted combinations are not always transitive, and
/// unlike `slice::sort_by` this never panics on such a comparator.
fn merge_sort<T: Copy, F: Fn(&T, &T) -> Ordering>(items: &mut Vec<T>, compare: F) {
    fn sort<T: Copy, F: Fn(&T, &T) -> Ordering>(items: &[T], compare: &F) -> Vec<T> {
        if items.len() <= 1 {
            return items.to_vec();
        }
        let (left, right) = items.split_at(items.len() / 2);
        let (left, right) = (sort(left, compare), sort(right, compare));
        let mut merged = Vec::with_capacity(items.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            if compare(&right[j], &left[i]) == Ordering::Less {
                merged.push(right[j]);
                j += 1;
            } else {
                merged.push(left[i]);
                i += 1;
            }
        }
        merged.extend_from_slice(&left[i..]);
        merged.extend_from_slice(&right[j..]);
        merged
    }
    *items = sort(items, &compare);
}

/// Teams ranking the teams they could share a room with.
pub struct TeamRanker<'c, 'a> {
    ctx: &'c RoundContext<'a>,
}

impl<'c, 'a> TeamRanker<'c, 'a> {
    pub fn new(ctx: &'c RoundContext<'a>) -> Self {
        TeamRanker { ctx }
    }

    fn side_overlap(&self, pivot: Id, other: Id) -> f64 {
        match (self.ctx.team(pivot), self.ctx.team(other)) {
            (Some(p), Some(o)) => (0..self.ctx.team_num())
                .map(|side| p.result.side_count(side).min(o.result.side_count(side)))
                .sum::<usize>() as f64,
            _ => 0.0,
        }
    }

    fn distance(&self, pivot: Id, other: Id) -> (f64, f64) {
        match (self.ctx.team(pivot), self.ctx.team(other)) {
            (Some(p), Some(o)) => (
                (p.result.win as f64 - o.result.win as f64).abs(),
                (p.result.sum - o.result.sum).abs(),
            ),
            _ => (0.0, 0.0),
        }
    }

    fn institution_overlap(&self, pivot: Id, other: Id) -> f64 {
        match (self.ctx.team(pivot), self.ctx.team(other)) {
            (Some(p), Some(o)) => self.ctx.style.shared_institutions(p.institutions, o.institutions),
            _ => 0.0,
        }
    }

    fn times_met(&self, pivot: Id, other: Id) -> f64 {
        self.ctx.team(pivot).map_or(0.0, |p| p.result.times_met(other) as f64)
    }
}

impl Ranker for TeamRanker<'_, '_> {
    const SUBJECT: &'static str = "teams";

    fn supports(filter: Filter) -> bool {
        matches!(filter, Filter::Strength | Filter::Side | Filter::PastOpponent | Filter::Institution | Filter::Random)
    }

    fn evaluate(&self, filter: Filter, pivot: Id, a: Id, b: Id) -> i8 {
        match filter {
            Filter::Strength => {
                let (win_a, sum_a) = self.distance(pivot, a);
                let (win_b, sum_b) = self.distance(pivot, b);
                match smaller_first(win_a, win_b) {
                    0 => smaller_first(sum_a, sum_b),
                    verdict => verdict,
                }
            }
            Filter::Side => smaller_first(self.side_overlap(pivot, a), self.side_overlap(pivot, b)),
            Filter::PastOpponent => smaller_first(self.times_met(pivot, a), self.times_met(pivot, b)),
            Filter::Institution => smaller_first(self.institution_overlap(pivot, a), self.institution_overlap(pivot, b)),
            Filter::Random => smaller_first(
                random_key(a, self.ctx.round) as f64,
                random_key(b, self.ctx.round) as f64,
            ),
            _ => 0,
        }
    }
}

/// Squares ranking adjudicators.
pub struct SquareRanker<'c, 'a> {
    ctx: &'c RoundContext<'a>,
}

impl<'c, 'a> SquareRanker<'c, 'a> {
    pub fn new(ctx: &'c RoundContext<'a>) -> Self {
        SquareRanker { ctx }
    }
}

impl Ranker for SquareRanker<'_, '_> {
    const SUBJECT: &'static str = "adjudicators";

    fn supports(filter: Filter) -> bool {
        matches!(filter, Filter::Bubble | Filter::Strength | Filter::Attendance | Filter::Random)
    }

    fn evaluate(&self, filter: Filter, _square: Id, a: Id, b: Id) -> i8 {
        let (Some(x), Some(y)) = (self.ctx.adjudicator(a), self.ctx.adjudicator(b)) else { return 0 };
        match filter {
            Filter::Bubble => 0,
            Filter::Strength => larger_first(x.strength, y.strength),
            Filter::Attendance => larger_first(x.result.active_num as f64, y.result.active_num as f64),
            Filter::Random => smaller_first(
                random_key(a, self.ctx.round) as f64,
                random_key(b, self.ctx.round) as f64,
            ),
            _ => 0,
        }
    }
}

/// Adjudicators ranking squares. Holds a copy of each square's teams.
pub struct AdjudicatorRanker<'c, 'a> {
    ctx: &'c RoundContext<'a>,
    square_teams: BTreeMap<Id, Vec<Id>>,
}

impl<'c, 'a> AdjudicatorRanker<'c, 'a> {
    pub fn new(ctx: &'c RoundContext<'a>, square_teams: BTreeMap<Id, Vec<Id>>) -> Self {
        AdjudicatorRanker { ctx, square_teams }
    }

    fn teams(&self, square: Id) -> &[Id] {
        self.square_teams.get(&square).map(Vec::as_slice).unwrap_or(&[])
    }

    fn repeats(&self, adjudicator: Id, square: Id) -> f64 {
        self.ctx.adjudicator(adjudicator).map_or(0.0, |judge| {
            self.teams(square).iter().map(|team| judge.result.times_judged(*team)).sum::<usize>() as f64
        })
    }
}

impl Ranker for AdjudicatorRanker<'_, '_> {
    const SUBJECT: &'static str = "squares";

    fn supports(filter: Filter) -> bool {
        matches!(filter, Filter::Past | Filter::Institution | Filter::Conflict | Filter::Random)
    }

    fn evaluate(&self, filter: Filter, adjudicator: Id, a: Id, b: Id) -> i8 {
        match filter {
            Filter::Past => smaller_first(self.repeats(adjudicator, a), self.repeats(adjudicator, b)),
            Filter::Institution => smaller_first(
                self.ctx.adjudicator_institution_overlap(adjudicator, self.teams(a)),
                self.ctx.adjudicator_institution_overlap(adjudicator, self.teams(b)),
            ),
            Filter::Conflict => smaller_first(
                self.ctx.adjudicator_conflict_count(adjudicator, self.teams(a)) as f64,
                self.ctx.adjudicator_conflict_count(adjudicator, self.teams(b)) as f64,
            ),
            Filter::Random => smaller_first(
                random_key(a, self.ctx.round) as f64,
                random_key(b, self.ctx.round) as f64,
            ),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;

    fn fixture() -> Fixture {
        let mut fixture = Fixture::teams(&[(1, &[1]), (2, &[1]), (3, &[2]), (4, &[3]), (5, &[3])]);
        fixture.set_wins(&[(1, 2), (2, 2), (3, 1), (4, 0), (5, 2)]);
        fixture
    }

    #[test]
    fn test_sign_convention() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let ranker = TeamRanker::new(&ctx);
        // from team 1's view, 2 is closer in strength than 4: 4 is worse
        assert_eq!(ranker.evaluate(Filter::Strength, 1, 4, 2), 1);
        assert_eq!(ranker.evaluate(Filter::Strength, 1, 2, 4), -1);
        // 2 shares institution 1 with team 1
        assert_eq!(ranker.evaluate(Filter::Institution, 1, 2, 3), 1);
    }

    #[test]
    fn test_original_chain_falls_through_in_order() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let ranker = TeamRanker::new(&ctx);
        let ranking = Ranking::new(&ranker, &[Filter::Strength, Filter::Institution], &Combination::Original).unwrap();
        // 2 and 5 tie on strength, institution pushes 2 back
        assert_eq!(ranking.preferences(1, &[2, 3, 4, 5]), vec![5, 2, 3, 4]);
        let ranking = Ranking::new(&ranker, &[Filter::Institution, Filter::Strength], &Combination::Original).unwrap();
        assert_eq!(ranking.preferences(1, &[2, 3, 4, 5]), vec![5, 3, 4, 2]);
    }

    #[test]
    fn test_total_order_on_full_ties() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let ranker = TeamRanker::new(&ctx);
        for combination in [Combination::Original, Combination::Straight, Combination::Weighted] {
            let ranking = Ranking::new(&ranker, &[Filter::Side], &combination).unwrap();
            for (a, b) in [(2, 3), (3, 4), (2, 5)] {
                let forward = ranking.compare(1, a, b);
                let backward = ranking.compare(1, b, a);
                assert_ne!(forward, Ordering::Equal);
                assert_eq!(forward, backward.reverse());
            }
            assert_eq!(ranking.peer_table(&ctx.team_ids())[&1], vec![2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_weighted_combinations() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let ranker = TeamRanker::new(&ctx);
        let filters = [Filter::Institution, Filter::Strength, Filter::Random];
        // pivot 1, a = 2 (same institution, same wins), b = 3 (other institution, one win apart)
        // institution says 2 is worse (+1), strength says 2 is better (-1), random key says 2 first (-1)
        let straight = Ranking::new(&ranker, &filters, &Combination::Straight).unwrap();
        assert_eq!(straight.compare(1, 2, 3), Ordering::Less);
        let weighted = Ranking::new(&ranker, &filters, &Combination::Weighted).unwrap();
        // 1 - 1/2 - 1/3 > 0
        assert_eq!(weighted.compare(1, 2, 3), Ordering::Greater);
        let custom = Ranking::new(&ranker, &filters, &Combination::Custom { weights: vec![0.5, 1.0, 1.0] }).unwrap();
        assert_eq!(custom.compare(1, 2, 3), Ordering::Less);
    }

    #[test]
    fn test_configuration_errors() {
        let fixture = fixture();
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let ranker = TeamRanker::new(&ctx);
        assert_eq!(
            Ranking::new(&ranker, &[Filter::Attendance], &Combination::Original).err(),
            Some(DrawError::UnsupportedFilter { filter: Filter::Attendance, subject: "teams" })
        );
        assert_eq!(
            Ranking::new(&ranker, &[Filter::Strength], &Combination::Custom { weights: vec![] }).err(),
            Some(DrawError::CustomWeights { expected: 1, got: 0 })
        );
    }

    #[test]
    fn test_random_key_is_idempotent() {
        assert_eq!(random_key(3000, 1), 3000 % 2761);
        assert_eq!(random_key(3000, 1), random_key(3000, 1));
        assert_eq!(random_key(12, 5), 12);
    }

    #[test]
    fn test_adjudicator_views() {
        let mut fixture = fixture();
        fixture.add_adjudicator(10, 9.0, &[1]);
        fixture.add_adjudicator(11, 7.0, &[]);
        fixture.adjudicator_results[1].active_num = 3;
        fixture.adjudicators[1].details[0].conflicts.insert(3);
        let ctx = RoundContext::new(&fixture.input()).unwrap();

        let squares = SquareRanker::new(&ctx);
        let by_strength = Ranking::new(&squares, &[Filter::Strength], &Combination::Original).unwrap();
        assert_eq!(by_strength.preferences(0, &[10, 11]), vec![10, 11]);
        let by_attendance = Ranking::new(&squares, &[Filter::Attendance], &Combination::Original).unwrap();
        assert_eq!(by_attendance.preferences(0, &[10, 11]), vec![11, 10]);

        let square_teams = BTreeMap::from([(0, vec![1, 2]), (1, vec![3, 4])]);
        let judges = AdjudicatorRanker::new(&ctx, square_teams);
        let ranking = Ranking::new(&judges, &[Filter::Institution, Filter::Conflict], &Combination::Original).unwrap();
        assert_eq!(ranking.preferences(10, &[0, 1]), vec![1, 0]);
        assert_eq!(ranking.preferences(11, &[0, 1]), vec![0, 1]);
    }
}
