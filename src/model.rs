pub mod entity {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Serialize};

    pub type Id = u32;
    pub type InstitutionId = u32;
    pub type Round = u32;

    static NO_IDS: BTreeSet<Id> = BTreeSet::new();

    fn available_by_default() -> bool {
        true
    }

    /// Per-round facts about an entity. Looked up by `r`, never mutated.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RoundDetail {
        pub r: Round,
        #[serde(default = "available_by_default")]
        pub available: bool,
        #[serde(default)]
        pub institutions: BTreeSet<InstitutionId>,
        /// Team ids an adjudicator must not judge.
        #[serde(default)]
        pub conflicts: BTreeSet<Id>,
    }

    impl RoundDetail {
        pub fn new(r: Round) -> RoundDetail {
            RoundDetail { r, available: true, institutions: BTreeSet::new(), conflicts: BTreeSet::new() }
        }
    }

    pub trait Entity {
        fn id(&self) -> Id;
        fn name(&self) -> &str;
        fn details(&self) -> &[RoundDetail];

        fn detail(&self, r: Round) -> Option<&RoundDetail> {
            self.details().iter().find(|detail| detail.r == r)
        }
        fn is_available(&self, r: Round) -> bool {
            self.detail(r).map_or(false, |detail| detail.available)
        }
        fn institutions(&self, r: Round) -> &BTreeSet<InstitutionId> {
            self.detail(r).map_or(&NO_IDS, |detail| &detail.institutions)
        }
        fn conflicts(&self, r: Round) -> &BTreeSet<Id> {
            self.detail(r).map_or(&NO_IDS, |detail| &detail.conflicts)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Team {
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub details: Vec<RoundDetail>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Adjudicator {
        pub id: Id,
        pub name: String,
        /// Prior strength estimate, blended with in-tournament scores.
        #[serde(default)]
        pub preev: f64,
        #[serde(default)]
        pub details: Vec<RoundDetail>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Venue {
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub details: Vec<RoundDetail>,
    }

    macro_rules! impl_entity {
        ($($ty:ty),*) => {
            $(impl Entity for $ty {
                fn id(&self) -> Id { self.id }
                fn name(&self) -> &str { &self.name }
                fn details(&self) -> &[RoundDetail] { &self.details }
            })*
        };
    }

    impl_entity!(Team, Adjudicator, Venue);
}


pub mod result {
    use serde::{Deserialize, Serialize};
    use super::entity::{Id, Round};
    use super::draw::Side;

    /// Aggregated team results up to (not including) the round being drawn.
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct TeamResult {
        pub id: Id,
        #[serde(default)]
        pub win: u32,
        #[serde(default)]
        pub sum: f64,
        #[serde(default)]
        pub margin: f64,
        #[serde(default)]
        pub past_opponents: Vec<Id>,
        #[serde(default)]
        pub past_sides: Vec<Side>,
    }

    impl TeamResult {
        pub fn side_count(&self, side: Side) -> usize {
            self.past_sides.iter().filter(|s| **s == side).count()
        }
        pub fn times_met(&self, opponent: Id) -> usize {
            self.past_opponents.iter().filter(|id| **id == opponent).count()
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ScoreDetail {
        pub r: Round,
        pub score: f64,
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct AdjudicatorResult {
        pub id: Id,
        #[serde(default)]
        pub average: f64,
        #[serde(default)]
        pub judged_teams: Vec<Id>,
        #[serde(default)]
        pub active_num: u32,
        #[serde(default)]
        pub details: Vec<ScoreDetail>,
    }

    impl AdjudicatorResult {
        pub fn has_scores(&self) -> bool {
            !self.details.is_empty()
        }
        pub fn times_judged(&self, team: Id) -> usize {
            self.judged_teams.iter().filter(|id| **id == team).count()
        }
    }
}


pub mod draw {
    use serde::{Deserialize, Serialize};
    use super::entity::Id;

    /// Slot index inside a square; 0 is gov (opening gov in four-team styles).
    pub type Side = usize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Chair,
        Panel,
        Trainee,
    }

    impl Role {
        pub const ALL: [Role; 3] = [Role::Chair, Role::Panel, Role::Trainee];
    }

    /// One room of a round.
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    pub struct Square {
        pub id: Id,
        pub teams: Vec<Id>,
        #[serde(default)]
        pub chairs: Vec<Id>,
        #[serde(default)]
        pub panels: Vec<Id>,
        #[serde(default)]
        pub trainees: Vec<Id>,
        #[serde(default)]
        pub venue: Option<Id>,
    }

    impl Square {
        pub fn new(id: Id, teams: Vec<Id>) -> Square {
            Square { id, teams, ..Default::default() }
        }

        /// Same room, no adjudicators.
        pub fn unstaffed(&self) -> Square {
            Square { id: self.id, teams: self.teams.clone(), venue: self.venue, ..Default::default() }
        }

        pub fn role(&self, role: Role) -> &Vec<Id> {
            match role {
                Role::Chair => &self.chairs,
                Role::Panel => &self.panels,
                Role::Trainee => &self.trainees,
            }
        }

        pub fn role_mut(&mut self, role: Role) -> &mut Vec<Id> {
            match role {
                Role::Chair => &mut self.chairs,
                Role::Panel => &mut self.panels,
                Role::Trainee => &mut self.trainees,
            }
        }

        pub fn adjudicators(&self) -> impl Iterator<Item = &Id> {
            self.chairs.iter().chain(self.panels.iter()).chain(self.trainees.iter())
        }
    }
}


pub mod condition {
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};
    use super::entity::Id;

    pub type Score = f64;

    /// Scales the two components of a conflict between grouped teams.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ConflictWeights {
        pub institution: Score,
        pub past_opponent: Score,
    }

    impl Default for ConflictWeights {
        fn default() -> Self {
            ConflictWeights { institution: 1.0, past_opponent: 1.0 }
        }
    }

    /// Symmetric pairwise conflict table.
    #[derive(Debug, Clone, Default)]
    pub struct ConflictPenalty {
        pub scores: HashMap<(Id, Id), Score>,
        pub default: Score,
    }

    fn key([a, b]: [Id; 2]) -> (Id, Id) {
        if a <= b { (a, b) } else { (b, a) }
    }

    impl ConflictPenalty {
        pub fn new(default: Score) -> ConflictPenalty {
            ConflictPenalty {
                scores: HashMap::new(),
                default,
            }
        }
        pub fn set_pair(&mut self, ids: [Id; 2], score: Score) {
            self.scores.insert(key(ids), score);
        }
        pub fn get_pair(&self, ids: [Id; 2]) -> Score {
            self.scores.get(&key(ids)).copied().unwrap_or(self.default)
        }
        pub fn group_score(&self, ids: &[Id]) -> Score {
            ids.iter().enumerate()
                .flat_map(|(i, a)| ids[i + 1..].iter().map(move |b| [*a, *b]))
                .map(|pair| self.get_pair(pair))
                .sum()
        }
    }
}
