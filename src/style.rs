use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::DrawError;
use crate::model::entity::{InstitutionId, Round};

/// Debate style: room size and weighting knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub team_num: usize,
    #[serde(default)]
    pub score_weights: Vec<f64>,
    /// Weight of an adjudicator's preev in round `r`, read at `r - 1`.
    #[serde(default)]
    pub preev_weights: Vec<f64>,
    #[serde(default)]
    pub institution_priority_map: Option<HashMap<InstitutionId, f64>>,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            team_num: 2,
            score_weights: vec![1.0, 1.0, 0.5],
            preev_weights: Vec::new(),
            institution_priority_map: None,
        }
    }
}

impl Style {
    pub fn validate(&self) -> Result<(), DrawError> {
        match self.team_num {
            2 | 4 => Ok(()),
            n => Err(DrawError::InvalidTeamNum(n)),
        }
    }

    pub fn institution_weight(&self, institution: InstitutionId) -> f64 {
        self.institution_priority_map
            .as_ref()
            .and_then(|map| map.get(&institution))
            .copied()
            .unwrap_or(1.0)
    }

    /// Sum of institution weights over `a ∩ b`. With no priority map this is
    /// the plain count of shared institutions.
    pub fn shared_institutions(&self, a: &BTreeSet<InstitutionId>, b: &BTreeSet<InstitutionId>) -> f64 {
        a.intersection(b).map(|institution| self.institution_weight(*institution)).sum()
    }

    pub fn preev_weight(&self, r: Round) -> f64 {
        let index = (r as usize).saturating_sub(1);
        self.preev_weights
            .get(index)
            .or_else(|| self.preev_weights.last())
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_institutions_unweighted() {
        let style = Style::default();
        let a = BTreeSet::from([1, 2, 3]);
        let b = BTreeSet::from([2, 3, 4]);
        assert_eq!(style.shared_institutions(&a, &b), 2.0);
    }

    #[test]
    fn test_shared_institutions_weighted() {
        let style = Style {
            institution_priority_map: Some(HashMap::from([(2, 0.0), (3, 2.5)])),
            ..Default::default()
        };
        let a = BTreeSet::from([1, 2, 3]);
        let b = BTreeSet::from([1, 2, 3]);
        // 1 falls back to weight 1
        assert_eq!(style.shared_institutions(&a, &b), 3.5);
    }

    #[test]
    fn test_preev_weight_reuses_last_entry() {
        let style = Style { preev_weights: vec![0.8, 0.5], ..Default::default() };
        assert_eq!(style.preev_weight(1), 0.8);
        assert_eq!(style.preev_weight(2), 0.5);
        assert_eq!(style.preev_weight(7), 0.5);
        assert_eq!(Style::default().preev_weight(1), 0.0);
    }

    #[test]
    fn test_team_num_validation() {
        assert!(Style { team_num: 4, ..Default::default() }.validate().is_ok());
        assert_eq!(Style { team_num: 3, ..Default::default() }.validate(), Err(DrawError::InvalidTeamNum(3)));
    }
}
