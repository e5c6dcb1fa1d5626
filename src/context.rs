//! Validated, indexed view of one round's input.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::DrawError;
use crate::model::condition::{ConflictPenalty, ConflictWeights, Score};
use crate::model::entity::{Adjudicator, Entity, Id, InstitutionId, Round, Team, Venue};
use crate::model::result::{AdjudicatorResult, TeamResult};
use crate::style::Style;

/// Everything a draw for one round depends on. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RoundInput<'a> {
    pub tournament: &'a str,
    pub round: Round,
    pub style: &'a Style,
    pub teams: &'a [Team],
    pub adjudicators: &'a [Adjudicator],
    pub venues: &'a [Venue],
    pub team_results: &'a [TeamResult],
    pub adjudicator_results: &'a [AdjudicatorResult],
}

#[derive(Debug, Clone, Copy)]
pub struct TeamView<'a> {
    pub team: &'a Team,
    pub result: &'a TeamResult,
    pub institutions: &'a BTreeSet<InstitutionId>,
}

impl TeamView<'_> {
    pub fn id(&self) -> Id {
        self.team.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdjudicatorView<'a> {
    pub adjudicator: &'a Adjudicator,
    pub result: &'a AdjudicatorResult,
    pub institutions: &'a BTreeSet<InstitutionId>,
    pub conflicts: &'a BTreeSet<Id>,
    /// Preev blended with the in-tournament average.
    pub strength: f64,
}

impl AdjudicatorView<'_> {
    pub fn id(&self) -> Id {
        self.adjudicator.id
    }
}

pub struct RoundContext<'a> {
    pub tournament: &'a str,
    pub round: Round,
    pub style: &'a Style,
    teams: BTreeMap<Id, TeamView<'a>>,
    adjudicators: BTreeMap<Id, AdjudicatorView<'a>>,
    venues: Vec<&'a Venue>,
}

fn index_by_id<T, F: Fn(&T) -> Id>(items: &[T], id: F) -> BTreeMap<Id, &T> {
    let mut map = BTreeMap::new();
    for item in items {
        map.entry(id(item)).or_insert(item);
    }
    map
}

fn check_unique<E: Entity>(kind: &'static str, entities: &[E]) -> Result<(), DrawError> {
    let mut seen = BTreeSet::new();
    for entity in entities {
        if !seen.insert(entity.id()) {
            return Err(DrawError::DuplicateId { kind, id: entity.id() });
        }
    }
    Ok(())
}

impl<'a> RoundContext<'a> {
    /// Indexes the available entities of `input.round`. Fails when an
    /// available team or adjudicator has no compiled result.
    pub fn new(input: &RoundInput<'a>) -> Result<RoundContext<'a>, DrawError> {
        input.style.validate()?;
        check_unique("team", input.teams)?;
        check_unique("adjudicator", input.adjudicators)?;
        check_unique("venue", input.venues)?;
        let round = input.round;

        let team_results = index_by_id(input.team_results, |result| result.id);
        let mut teams = BTreeMap::new();
        for team in input.teams.iter().filter(|team| team.is_available(round)) {
            let result = team_results.get(&team.id).copied().ok_or(DrawError::MissingTeamResult(team.id))?;
            teams.insert(team.id, TeamView { team, result, institutions: team.institutions(round) });
        }

        let adjudicator_results = index_by_id(input.adjudicator_results, |result| result.id);
        let weight = input.style.preev_weight(round);
        let mut adjudicators = BTreeMap::new();
        for adjudicator in input.adjudicators.iter().filter(|adjudicator| adjudicator.is_available(round)) {
            let result = adjudicator_results
                .get(&adjudicator.id)
                .copied()
                .ok_or(DrawError::MissingAdjudicatorResult(adjudicator.id))?;
            let strength = if result.has_scores() {
                weight * adjudicator.preev + (1.0 - weight) * result.average
            } else {
                adjudicator.preev
            };
            adjudicators.insert(adjudicator.id, AdjudicatorView {
                adjudicator,
                result,
                institutions: adjudicator.institutions(round),
                conflicts: adjudicator.conflicts(round),
                strength,
            });
        }

        let venues = input.venues.iter().filter(|venue| venue.is_available(round)).collect();

        Ok(RoundContext {
            tournament: input.tournament,
            round,
            style: input.style,
            teams,
            adjudicators,
            venues,
        })
    }

    pub fn team_num(&self) -> usize {
        self.style.team_num
    }

    /// Available team ids, ascending.
    pub fn team_ids(&self) -> Vec<Id> {
        self.teams.keys().copied().collect()
    }

    pub fn team(&self, id: Id) -> Option<&TeamView<'a>> {
        self.teams.get(&id)
    }

    pub fn adjudicator_ids(&self) -> Vec<Id> {
        self.adjudicators.keys().copied().collect()
    }

    pub fn adjudicator(&self, id: Id) -> Option<&AdjudicatorView<'a>> {
        self.adjudicators.get(&id)
    }

    pub fn venues(&self) -> &[&'a Venue] {
        &self.venues
    }

    /// Strongest first: wins, speaker sum, margin, then id.
    pub fn compare_team_strength(&self, a: Id, b: Id) -> Ordering {
        match (self.team(a), self.team(b)) {
            (Some(x), Some(y)) => y.result.win.cmp(&x.result.win)
                .then_with(|| y.result.sum.total_cmp(&x.result.sum))
                .then_with(|| y.result.margin.total_cmp(&x.result.margin))
                .then_with(|| a.cmp(&b)),
            _ => a.cmp(&b),
        }
    }

    pub fn sort_by_strength(&self, ids: &mut [Id]) {
        ids.sort_by(|a, b| self.compare_team_strength(*a, *b));
    }

    pub fn team_conflict(&self, a: Id, b: Id, weights: &ConflictWeights) -> Score {
        match (self.team(a), self.team(b)) {
            (Some(x), Some(y)) => {
                let met = x.result.times_met(b).max(y.result.times_met(a)) as Score;
                weights.institution * self.style.shared_institutions(x.institutions, y.institutions)
                    + weights.past_opponent * met
            }
            _ => 0.0,
        }
    }

    pub fn conflict_penalty(&self, ids: &[Id], weights: &ConflictWeights) -> ConflictPenalty {
        let mut penalty = ConflictPenalty::new(0.0);
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                let score = self.team_conflict(*a, *b, weights);
                if score != 0.0 {
                    penalty.set_pair([*a, *b], score);
                }
            }
        }
        penalty
    }

    /// Priority-weighted institutions an adjudicator shares with the teams.
    pub fn adjudicator_institution_overlap(&self, adjudicator: Id, teams: &[Id]) -> f64 {
        let Some(judge) = self.adjudicator(adjudicator) else { return 0.0 };
        teams.iter()
            .filter_map(|id| self.team(*id))
            .map(|team| self.style.shared_institutions(judge.institutions, team.institutions))
            .sum()
    }

    pub fn adjudicator_conflict_count(&self, adjudicator: Id, teams: &[Id]) -> usize {
        self.adjudicator(adjudicator)
            .map_or(0, |judge| teams.iter().filter(|id| judge.conflicts.contains(id)).count())
    }

    /// Shared institution or declared conflict with any of the teams.
    pub fn adjudicator_conflicts(&self, adjudicator: Id, teams: &[Id]) -> bool {
        self.adjudicator_institution_overlap(adjudicator, teams) > 0.0
            || self.adjudicator_conflict_count(adjudicator, teams) > 0
    }
}
