//! Splitting one resolved pool into groups of `team_num`.

use itertools::Itertools;
use rand::seq::SliceRandom;

use crate::config::PairingMethod;
use crate::context::RoundContext;
use crate::model::entity::Id;
use crate::position::min_side_cost;
use crate::seed::seeded_rng;

/// Largest pool `adjusted` searches exhaustively. Larger pools are split
/// into consecutive chunks of at most this size first.
const ADJUSTED_POOL_LIMIT: usize = 12;

/// `pool` is in strength order and its length a multiple of `team_num`;
/// `label` keys the random stream of `PairingMethod::Random`.
pub fn pair(ctx: &RoundContext, pool: &[Id], method: PairingMethod, label: &str) -> Vec<Vec<Id>> {
    let team_num = ctx.team_num();
    if pool.is_empty() || team_num == 0 {
        return Vec::new();
    }
    match method {
        PairingMethod::Sort => zip_blocks(pool, team_num, false),
        PairingMethod::Fold => zip_blocks(pool, team_num, true),
        PairingMethod::Slide => slide(pool, team_num),
        PairingMethod::Random => {
            let mut rng = seeded_rng(ctx.tournament, ctx.round, label);
            let mut shuffled = pool.to_vec();
            shuffled.shuffle(&mut rng);
            slide(&shuffled, team_num)
        }
        PairingMethod::Adjusted => {
            let chunk = (ADJUSTED_POOL_LIMIT / team_num).max(1) * team_num;
            pool.chunks(chunk).flat_map(|part| adjusted(ctx, part, team_num)).collect()
        }
    }
}

fn slide(pool: &[Id], team_num: usize) -> Vec<Vec<Id>> {
    pool.chunks(team_num).map(<[Id]>::to_vec).collect()
}

/// Cuts the pool into `team_num` blocks and takes the j-th team of every
/// block for group j. `fold` reverses the blocks of the back half, so with
/// two teams per room the top meets the bottom.
fn zip_blocks(pool: &[Id], team_num: usize, fold: bool) -> Vec<Vec<Id>> {
    let rooms = pool.len() / team_num;
    if rooms == 0 {
        return Vec::new();
    }
    let blocks: Vec<Vec<Id>> = pool.chunks(rooms)
        .take(team_num)
        .enumerate()
        .map(|(b, block)| {
            let mut block = block.to_vec();
            if fold && b >= team_num / 2 {
                block.reverse();
            }
            block
        })
        .collect();
    (0..rooms).map(|j| blocks.iter().filter_map(|block| block.get(j).copied()).collect()).collect()
}

struct Partition<'c, 'a> {
    ctx: &'c RoundContext<'a>,
    team_num: usize,
    best: Option<(usize, Vec<Vec<Id>>)>,
}

impl Partition<'_, '_> {
    /// Depth-first over the groups containing the first remaining team.
    /// Only a strictly cheaper split replaces the best one.
    fn search(&mut self, remaining: &[Id], groups: &mut Vec<Vec<Id>>, cost: usize) {
        if self.best.as_ref().map_or(false, |(best, _)| cost >= *best) {
            return;
        }
        let Some((first, rest)) = remaining.split_first() else {
            self.best = Some((cost, groups.clone()));
            return;
        };
        for partners in rest.iter().copied().combinations(self.team_num - 1) {
            let group: Vec<Id> = std::iter::once(*first).chain(partners.iter().copied()).collect();
            let group_cost = min_side_cost(self.ctx, &group);
            let left: Vec<Id> = rest.iter().copied().filter(|id| !partners.contains(id)).collect();
            groups.push(group);
            self.search(&left, groups, cost + group_cost);
            groups.pop();
        }
    }
}

fn adjusted(ctx: &RoundContext, pool: &[Id], team_num: usize) -> Vec<Vec<Id>> {
    let mut partition = Partition { ctx, team_num, best: None };
    partition.search(pool, &mut Vec::new(), 0);
    partition.best.map_or_else(|| slide(pool, team_num), |(_, groups)| groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;
    use crate::position::side_cost;

    fn fixture(n: Id) -> Fixture {
        let teams: Vec<(Id, &[u32])> = (1..=n).map(|id| (id, &[][..])).collect();
        Fixture::teams(&teams)
    }

    #[test]
    fn test_two_team_methods() {
        let fixture = fixture(6);
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let pool = [1, 2, 3, 4, 5, 6];
        assert_eq!(pair(&ctx, &pool, PairingMethod::Sort, ""), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(pair(&ctx, &pool, PairingMethod::Fold, ""), vec![vec![1, 6], vec![2, 5], vec![3, 4]]);
        assert_eq!(pair(&ctx, &pool, PairingMethod::Slide, ""), vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn test_four_team_fold() {
        let mut fixture = fixture(8);
        fixture.style.team_num = 4;
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let pool = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(pair(&ctx, &pool, PairingMethod::Sort, ""), vec![vec![1, 3, 5, 7], vec![2, 4, 6, 8]]);
        assert_eq!(pair(&ctx, &pool, PairingMethod::Fold, ""), vec![vec![1, 3, 6, 8], vec![2, 4, 5, 7]]);
    }

    #[test]
    fn test_random_is_a_seeded_partition() {
        let fixture = fixture(8);
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let pool = [1, 2, 3, 4, 5, 6, 7, 8];
        let groups = pair(&ctx, &pool, PairingMethod::Random, "pairing:0");
        assert_eq!(groups, pair(&ctx, &pool, PairingMethod::Random, "pairing:0"));
        let mut seen: Vec<Id> = groups.concat();
        seen.sort();
        assert_eq!(seen, pool.to_vec());
    }

    #[test]
    fn test_adjusted_avoids_repeated_sides() {
        let mut fixture = fixture(4);
        // 1 and 2 both always opened, 3 and 4 both always closed
        fixture.team_result(1).past_sides = vec![0, 0];
        fixture.team_result(2).past_sides = vec![0, 0];
        fixture.team_result(3).past_sides = vec![1, 1];
        fixture.team_result(4).past_sides = vec![1, 1];
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let groups = pair(&ctx, &[1, 2, 3, 4], PairingMethod::Adjusted, "");
        assert_eq!(groups, vec![vec![1, 3], vec![2, 4]]);
        let cost: usize = groups.iter().map(|group| min_side_cost(&ctx, group)).sum();
        assert_eq!(cost, 0);
        assert_eq!(side_cost(&ctx, &[1, 2]), 2);
    }

    #[test]
    fn test_adjusted_splits_large_pools() {
        let fixture = fixture(16);
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let pool: Vec<Id> = (1..=16).collect();
        let groups = pair(&ctx, &pool, PairingMethod::Adjusted, "");
        // no side history: every split costs nothing and the first is kept
        assert_eq!(groups, slide(&pool, 2));
    }

    #[test]
    fn test_adjusted_searches_each_chunk_alone() {
        let mut fixture = fixture(14);
        for id in 1..=12 {
            fixture.team_result(id).past_sides = vec![0, 0];
        }
        fixture.team_result(13).past_sides = vec![1, 1];
        fixture.team_result(14).past_sides = vec![1, 1];
        let ctx = RoundContext::new(&fixture.input()).unwrap();
        let pool: Vec<Id> = (1..=14).collect();
        let groups = pair(&ctx, &pool, PairingMethod::Adjusted, "");
        // over the whole pool 13 and 14 would each face an opener (cost 10)
        assert!(groups[..6].iter().flatten().all(|id| *id <= 12));
        assert_eq!(groups[6], vec![13, 14]);
        let cost: usize = groups.iter().map(|group| min_side_cost(&ctx, group)).sum();
        assert_eq!(cost, 14);
    }
}
