//! Roster checks run before each allocation family.

use std::collections::HashSet;

use tracing::warn;

use crate::config::{RoleCounts, TeamAllocation};
use crate::context::RoundInput;
use crate::error::DrawError;
use crate::model::draw::Square;
use crate::model::entity::{Entity, Round};

fn check_roster<'e, E: Entity>(kind: &'static str, entities: &'e [E], round: Round) -> Result<Vec<&'e E>, DrawError> {
    let mut seen = HashSet::new();
    for entity in entities {
        if !seen.insert(entity.id()) {
            return Err(DrawError::DuplicateId { kind, id: entity.id() });
        }
        if entity.detail(round).is_none() {
            return Err(DrawError::MissingRoundDetail { kind, id: entity.id(), round });
        }
    }
    Ok(entities.iter().filter(|entity| entity.is_available(round)).collect())
}

pub fn teams(input: &RoundInput, allocation: &TeamAllocation) -> Result<(), DrawError> {
    input.style.validate()?;
    let team_num = input.style.team_num;
    if matches!(allocation, TeamAllocation::Powerpair(_)) && team_num != 2 {
        return Err(DrawError::PowerpairTeamNum { team_num });
    }
    let available = check_roster("team", input.teams, input.round)?;
    if available.is_empty() {
        return Err(DrawError::NoTeams(input.round));
    }
    if available.len() % team_num != 0 {
        return Err(DrawError::IndivisibleTeams { available: available.len(), team_num });
    }
    let compiled: HashSet<_> = input.team_results.iter().map(|result| result.id).collect();
    if let Some(team) = available.iter().find(|team| !compiled.contains(&team.id)) {
        return Err(DrawError::MissingTeamResult(team.id));
    }
    Ok(())
}

pub fn adjudicators(input: &RoundInput, draw: &[Square], roles: &RoleCounts) -> Result<(), DrawError> {
    if draw.is_empty() {
        return Err(DrawError::EmptyDraw);
    }
    let available = check_roster("adjudicator", input.adjudicators, input.round)?;
    let compiled: HashSet<_> = input.adjudicator_results.iter().map(|result| result.id).collect();
    if let Some(adjudicator) = available.iter().find(|adjudicator| !compiled.contains(&adjudicator.id)) {
        return Err(DrawError::MissingAdjudicatorResult(adjudicator.id));
    }
    let requested = roles.per_square() * draw.len();
    if available.len() < requested {
        warn!(available = available.len(), requested, "not enough adjudicators for every seat");
    }
    Ok(())
}

pub fn venues(input: &RoundInput, draw: &[Square]) -> Result<(), DrawError> {
    let available = check_roster("venue", input.venues, input.round)?;
    if available.len() < draw.len() {
        return Err(DrawError::NotEnoughVenues { available: available.len(), squares: draw.len() });
    }
    Ok(())
}
