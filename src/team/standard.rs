use tracing::debug;

use crate::config::StandardTeamOptions;
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::filter::{Ranking, TeamRanker};
use crate::matching::m_gale_shapley;
use crate::position::assign_sides;
use crate::team::TeamDraw;

/// Ranks every team against every other and groups them by deferred
/// acceptance, seeded in strength order.
pub fn allocate(ctx: &RoundContext, options: &StandardTeamOptions) -> Result<TeamDraw, DrawError> {
    let ranker = TeamRanker::new(ctx);
    let ranking = Ranking::new(&ranker, &options.filters, &options.combination)?;

    let mut order = ctx.team_ids();
    ctx.sort_by_strength(&mut order);
    let prefs = ranking.peer_table(&order);
    let groups = m_gale_shapley(&order, &prefs, ctx.team_num())?;
    debug!(teams = order.len(), groups = groups.len(), "grouped teams");

    Ok(TeamDraw::from_groups(assign_sides(ctx, groups, options.position, 0)))
}
