//! Roster builder shared by the integration tests.

#![allow(dead_code)]

use debate_draw::model::entity::{InstitutionId, RoundDetail};
use debate_draw::{Adjudicator, AdjudicatorResult, Id, RoundInput, Style, Team, TeamResult, Venue};

pub const ROUND: u32 = 3;

fn detail(institutions: &[InstitutionId]) -> RoundDetail {
    let mut detail = RoundDetail::new(ROUND);
    detail.institutions = institutions.iter().copied().collect();
    detail
}

/// One round of a tournament, every entity available in [`ROUND`].
#[derive(Debug)]
pub struct Tournament {
    pub name: String,
    pub style: Style,
    pub teams: Vec<Team>,
    pub adjudicators: Vec<Adjudicator>,
    pub venues: Vec<Venue>,
    pub team_results: Vec<TeamResult>,
    pub adjudicator_results: Vec<AdjudicatorResult>,
}

impl Tournament {
    pub fn new(name: &str, team_num: usize) -> Tournament {
        Tournament {
            name: name.to_string(),
            style: Style { team_num, ..Style::default() },
            teams: Vec::new(),
            adjudicators: Vec::new(),
            venues: Vec::new(),
            team_results: Vec::new(),
            adjudicator_results: Vec::new(),
        }
    }

    pub fn team(mut self, id: Id, institutions: &[InstitutionId], win: u32) -> Tournament {
        self.teams.push(Team { id, name: format!("team {}", id), details: vec![detail(institutions)] });
        self.team_results.push(TeamResult { id, win, ..Default::default() });
        self
    }

    pub fn adjudicator(mut self, id: Id, preev: f64, institutions: &[InstitutionId]) -> Tournament {
        self.adjudicators.push(Adjudicator { id, name: format!("adjudicator {}", id), preev, details: vec![detail(institutions)] });
        self.adjudicator_results.push(AdjudicatorResult { id, ..Default::default() });
        self
    }

    pub fn venue(mut self, id: Id) -> Tournament {
        self.venues.push(Venue { id, name: format!("room {}", id), details: vec![detail(&[])] });
        self
    }

    pub fn result(&mut self, id: Id) -> &mut TeamResult {
        let index = self.team_results.iter().position(|result| result.id == id).unwrap();
        &mut self.team_results[index]
    }

    pub fn input(&self) -> RoundInput<'_> {
        RoundInput {
            tournament: &self.name,
            round: ROUND,
            style: &self.style,
            teams: &self.teams,
            adjudicators: &self.adjudicators,
            venues: &self.venues,
            team_results: &self.team_results,
            adjudicator_results: &self.adjudicator_results,
        }
    }
}
