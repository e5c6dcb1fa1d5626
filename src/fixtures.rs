use crate::context::RoundInput;
use crate::model::entity::{Adjudicator, Id, InstitutionId, RoundDetail, Team, Venue};
use crate::model::result::{AdjudicatorResult, TeamResult};
use crate::style::Style;

fn detail(institutions: &[InstitutionId]) -> RoundDetail {
    let mut detail = RoundDetail::new(1);
    detail.institutions = institutions.iter().copied().collect();
    detail
}

/// Round 1 of tournament "test", everyone available.
pub(crate) struct Fixture {
    pub teams: Vec<Team>,
    pub adjudicators: Vec<Adjudicator>,
    pub venues: Vec<Venue>,
    pub team_results: Vec<TeamResult>,
    pub adjudicator_results: Vec<AdjudicatorResult>,
    pub style: Style,
}

impl Fixture {
    pub fn teams(teams: &[(Id, &[InstitutionId])]) -> Fixture {
        Fixture {
            teams: teams.iter()
                .map(|(id, institutions)| Team { id: *id, name: format!("team {}", id), details: vec![detail(institutions)] })
                .collect(),
            adjudicators: Vec::new(),
            venues: Vec::new(),
            team_results: teams.iter().map(|(id, _)| TeamResult { id: *id, ..Default::default() }).collect(),
            adjudicator_results: Vec::new(),
            style: Style::default(),
        }
    }

    pub fn input(&self) -> RoundInput<'_> {
        RoundInput {
            tournament: "test",
            round: 1,
            style: &self.style,
            teams: &self.teams,
            adjudicators: &self.adjudicators,
            venues: &self.venues,
            team_results: &self.team_results,
            adjudicator_results: &self.adjudicator_results,
        }
    }

    pub fn set_wins(&mut self, wins: &[(Id, u32)]) {
        for (id, win) in wins {
            if let Some(result) = self.team_results.iter_mut().find(|result| result.id == *id) {
                result.win = *win;
            }
        }
    }

    pub fn team_result(&mut self, id: Id) -> &mut TeamResult {
        let index = self.team_results.iter().position(|result| result.id == id).unwrap();
        &mut self.team_results[index]
    }

    pub fn add_adjudicator(&mut self, id: Id, preev: f64, institutions: &[InstitutionId]) -> &mut Adjudicator {
        self.adjudicator_results.push(AdjudicatorResult { id, ..Default::default() });
        self.adjudicators.push(Adjudicator { id, name: format!("adjudicator {}", id), preev, details: vec![detail(institutions)] });
        self.adjudicators.last_mut().unwrap()
    }

    pub fn add_venue(&mut self, id: Id) {
        self.venues.push(Venue { id, name: format!("room {}", id), details: vec![detail(&[])] });
    }
}
