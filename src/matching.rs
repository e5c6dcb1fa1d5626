//! Deferred acceptance.
//!
//! `gale_shapley` is the many-to-one form: every proposer wants up to
//! `capacity` candidates, every candidate holds at most one proposer. The
//! result is the proposer-optimal stable matching, which is unique for
//! strict preferences, so the order in which free proposers are served does
//! not change the outcome. Proposers are still served in ascending id order.
//!
//! `m_gale_shapley` groups a single set of teams by electing every
//! `group_size`-th team of a strength order as a seed and matching the seeds
//! against the rest with capacity `group_size - 1`.

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::debug;

use crate::error::DrawError;
use crate::model::entity::Id;

pub type Preferences = BTreeMap<Id, Vec<Id>>;

/// Matches proposers to candidates. A candidate that does not list a
/// proposer never accepts it. Proposers that run out of acceptable
/// candidates stay under-filled.
pub fn gale_shapley(proposers: &Preferences, candidates: &Preferences, capacity: usize) -> BTreeMap<Id, Vec<Id>> {
    let ranks: HashMap<Id, HashMap<Id, usize>> = candidates
        .iter()
        .map(|(candidate, prefs)| {
            (*candidate, prefs.iter().enumerate().map(|(rank, proposer)| (*proposer, rank)).collect())
        })
        .collect();

    let mut next: BTreeMap<Id, usize> = proposers.keys().map(|id| (*id, 0)).collect();
    let mut matched: BTreeMap<Id, Vec<Id>> = proposers.keys().map(|id| (*id, Vec::new())).collect();
    let mut held: HashMap<Id, Id> = HashMap::new();
    let mut free: VecDeque<Id> = if capacity == 0 { VecDeque::new() } else { proposers.keys().copied().collect() };
    let mut proposals = 0usize;

    while let Some(proposer) = free.pop_front() {
        let prefs = &proposers[&proposer];
        loop {
            let (Some(list), Some(cursor)) = (matched.get(&proposer), next.get(&proposer).copied()) else { break };
            if list.len() >= capacity || cursor >= prefs.len() {
                break;
            }
            next.insert(proposer, cursor + 1);
            proposals += 1;
            let candidate = prefs[cursor];
            let Some(rank) = ranks.get(&candidate).and_then(|r| r.get(&proposer)).copied() else { continue };

            match held.get(&candidate).copied() {
                None => {
                    held.insert(candidate, proposer);
                    matched.entry(proposer).or_default().push(candidate);
                }
                Some(current) => {
                    let current_rank = ranks[&candidate].get(&current).copied().unwrap_or(usize::MAX);
                    if rank < current_rank {
                        held.insert(candidate, proposer);
                        if let Some(list) = matched.get_mut(&current) {
                            list.retain(|id| *id != candidate);
                        }
                        matched.entry(proposer).or_default().push(candidate);
                        free.push_back(current);
                    }
                }
            }
        }
    }

    // each proposer's matches in its own preference order
    for (proposer, list) in matched.iter_mut() {
        let prefs = &proposers[proposer];
        list.sort_by_key(|candidate| prefs.iter().position(|id| id == candidate));
    }
    debug!(proposers = proposers.len(), candidates = candidates.len(), capacity, proposals, "deferred acceptance finished");
    matched
}

/// Partitions `order` into groups of `group_size`. `order` is the seeding
/// order (strongest first) and `prefs[id]` ranks every other team.
pub fn m_gale_shapley(order: &[Id], prefs: &Preferences, group_size: usize) -> Result<Vec<Vec<Id>>, DrawError> {
    if group_size == 0 || order.len() % group_size != 0 {
        return Err(DrawError::IndivisibleTeams { available: order.len(), team_num: group_size });
    }
    let seeds: Vec<Id> = order.iter().step_by(group_size).copied().collect();
    let others: Vec<Id> = order.iter().copied().filter(|id| !seeds.contains(id)).collect();

    let restrict = |id: &Id, to: &[Id]| -> Vec<Id> {
        let mut listed: Vec<Id> = prefs.get(id).map_or_else(Vec::new, |list| {
            list.iter().copied().filter(|other| to.contains(other)).collect()
        });
        // unlisted members go last in seeding order, so lists stay complete
        let unlisted: Vec<Id> = to.iter().copied().filter(|other| !listed.contains(other)).collect();
        listed.extend(unlisted);
        listed
    };
    let seed_prefs: Preferences = seeds.iter().map(|seed| (*seed, restrict(seed, &others))).collect();
    let other_prefs: Preferences = others.iter().map(|other| (*other, restrict(other, &seeds))).collect();

    let matching = gale_shapley(&seed_prefs, &other_prefs, group_size - 1);
    seeds
        .iter()
        .map(|seed| {
            let partners = matching.get(seed).cloned().unwrap_or_default();
            if partners.len() + 1 != group_size {
                return Err(DrawError::IncompleteGroup { seed: *seed, found: partners.len(), wanted: group_size - 1 });
            }
            Ok(std::iter::once(*seed).chain(partners).collect::<Vec<Id>>())
        })
        .collect()
}
