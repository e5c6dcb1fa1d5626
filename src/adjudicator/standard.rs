use std::collections::BTreeMap;

use tracing::debug;

use crate::config::StandardAdjudicatorOptions;
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::filter::{AdjudicatorRanker, Ranking, SquareRanker};
use crate::matching::gale_shapley;
use crate::model::draw::{Role, Square};
use crate::model::entity::Id;

/// Chairs, then panels, then trainees, each by deferred acceptance with
/// squares proposing. Every pass only sees adjudicators no earlier pass
/// placed.
pub fn allocate(ctx: &RoundContext, draw: &[Square], options: &StandardAdjudicatorOptions) -> Result<Vec<Square>, DrawError> {
    let square_ranker = SquareRanker::new(ctx);
    let square_ranking = Ranking::new(&square_ranker, &options.square_filters, &options.square_combination)?;
    let square_teams: BTreeMap<Id, Vec<Id>> = draw.iter().map(|square| (square.id, square.teams.clone())).collect();
    let adjudicator_ranker = AdjudicatorRanker::new(ctx, square_teams);
    let adjudicator_ranking = Ranking::new(&adjudicator_ranker, &options.adjudicator_filters, &options.adjudicator_combination)?;

    let square_ids: Vec<Id> = draw.iter().map(|square| square.id).collect();
    let mut squares: Vec<Square> = draw.iter().map(Square::unstaffed).collect();
    let mut remaining = ctx.adjudicator_ids();
    let roles = options.roles;

    for (role, capacity) in [(Role::Chair, roles.chairs), (Role::Panel, roles.panels), (Role::Trainee, roles.trainees)] {
        if capacity == 0 || remaining.is_empty() || square_ids.is_empty() {
            continue;
        }
        let proposers = square_ranking.preference_table(&square_ids, &remaining);
        let candidates = adjudicator_ranking.preference_table(&remaining, &square_ids);
        let matching = gale_shapley(&proposers, &candidates, capacity);

        let mut placed = 0;
        for square in squares.iter_mut() {
            if let Some(adjudicators) = matching.get(&square.id) {
                square.role_mut(role).extend(adjudicators.iter().copied());
                placed += adjudicators.len();
            }
        }
        let taken: Vec<Id> = matching.values().flatten().copied().collect();
        remaining.retain(|id| !taken.contains(id));
        debug!(?role, capacity, placed, remaining = remaining.len(), "role pass finished");
    }
    Ok(squares)
}
