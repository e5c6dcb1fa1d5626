use crate::action::{ActionError, ActionResult, Index, Position, Swap};
use crate::model::condition::{ConflictPenalty, Score};
use crate::model::entity::Id;


#[derive(Debug, Clone)]
struct CachedMember {
    pub id: Id,
    /// Conflict of this member with the rest of its group.
    pub score: Score,
}

impl CachedMember {
    fn from_ids(id: Id, ids: &[Id], penalty: &ConflictPenalty) -> CachedMember {
        let score = ids.iter()
            .filter(|other| **other != id)
            .map(|other| penalty.get_pair([id, *other]))
            .sum();
        CachedMember { id, score }
    }
}

#[derive(Debug, Clone)]
struct GroupCache {
    pub members: Vec<CachedMember>,
    pub penalty_score: Score,
}

impl GroupCache {
    fn create(ids: &[Id], penalty: &ConflictPenalty) -> GroupCache {
        let members = ids.iter().map(|id| CachedMember::from_ids(*id, ids, penalty)).collect();
        GroupCache { members, penalty_score: penalty.group_score(ids) }
    }

    fn get_ids(&self) -> Vec<Id> {
        self.members.iter().map(|member| member.id).collect()
    }

    /// Score change if the member at `index` is replaced by `id`.
    fn simulate_replace(&self, index: Index, id: Id, penalty: &ConflictPenalty) -> ActionResult {
        match self.members.get(index) {
            Some(removed) => {
                let added: Score = self.members.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, member)| penalty.get_pair([id, member.id]))
                    .sum();
                ActionResult::ScoreDiff(added - removed.score)
            }
            None => ActionResult::Failed(vec![ActionError::InvalidPosition]),
        }
    }

    fn replace(&mut self, index: Index, id: Id, penalty: &ConflictPenalty) -> Result<Id, ActionError> {
        if self.members.len() <= index {
            return Err(ActionError::InvalidPosition);
        }
        let removed = self.members[index].id;
        let mut ids = self.get_ids();
        ids[index] = id;
        *self = GroupCache::create(&ids, penalty);
        Ok(removed)
    }
}

/// Conflict scores of a whole round, kept up to date across swaps.
pub struct TableCache<'p> {
    groups: Vec<GroupCache>,
    penalty: &'p ConflictPenalty,
    pub penalty_score: Score,
}

impl<'p> TableCache<'p> {
    pub fn create(groups: &[Vec<Id>], penalty: &'p ConflictPenalty) -> TableCache<'p> {
        let groups: Vec<GroupCache> = groups.iter().map(|ids| GroupCache::create(ids, penalty)).collect();
        let penalty_score = groups.iter().map(|group| group.penalty_score).sum();
        TableCache { groups, penalty, penalty_score }
    }

    pub fn sizes(&self) -> Vec<Index> {
        self.groups.iter().map(|group| group.members.len()).collect()
    }

    pub fn get_member(&self, position: &Position) -> Option<Id> {
        self.groups.get(position.group_index)?.members.get(position.member_index).map(|member| member.id)
    }

    pub fn simulate(&self, swap: &Swap) -> ActionResult {
        if swap.upper.group_index == swap.lower.group_index {
            return ActionResult::Failed(vec![ActionError::SameGroup]);
        }
        match (self.get_member(&swap.upper), self.get_member(&swap.lower)) {
            (Some(upper), Some(lower)) => {
                self.groups[swap.upper.group_index].simulate_replace(swap.upper.member_index, lower, self.penalty)
                    + self.groups[swap.lower.group_index].simulate_replace(swap.lower.member_index, upper, self.penalty)
            }
            _ => ActionResult::Failed(vec![ActionError::InvalidPosition]),
        }
    }

    pub fn act(&mut self, swap: &Swap) -> Result<(), ActionError> {
        if swap.upper.group_index == swap.lower.group_index {
            return Err(ActionError::SameGroup);
        }
        let upper = self.get_member(&swap.upper).ok_or(ActionError::InvalidPosition)?;
        let lower = self.get_member(&swap.lower).ok_or(ActionError::InvalidPosition)?;
        let penalty = self.penalty;
        let mut score_diff = 0.0;
        for (position, incoming) in [(swap.upper, lower), (swap.lower, upper)] {
            let group = self.groups.get_mut(position.group_index).ok_or(ActionError::InvalidPosition)?;
            score_diff -= group.penalty_score;
            group.replace(position.member_index, incoming, penalty)?;
            score_diff += group.penalty_score;
        }
        self.penalty_score += score_diff;
        Ok(())
    }

    pub fn groups(&self) -> Vec<Vec<Id>> {
        self.groups.iter().map(|group| group.get_ids()).collect()
    }
}
