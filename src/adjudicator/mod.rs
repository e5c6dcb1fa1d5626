//! Adjudicator allocation over a finished team draw.
//!
//! Both strategies start from unstaffed copies of the squares and never
//! touch the team lists. Requesting more adjudicators than are available is
//! not an error: the rooms that could not be filled are logged and left
//! short.

mod standard;
mod traditional;

use tracing::{info, warn};

use crate::config::AdjudicatorAllocation;
use crate::context::RoundContext;
use crate::error::DrawError;
use crate::model::draw::{Role, Square};

pub fn allocate(ctx: &RoundContext, draw: &[Square], allocation: &AdjudicatorAllocation) -> Result<Vec<Square>, DrawError> {
    let (strategy, squares) = match allocation {
        AdjudicatorAllocation::Standard(options) => ("standard", standard::allocate(ctx, draw, options)?),
        AdjudicatorAllocation::Traditional(options) => ("traditional", traditional::allocate(ctx, draw, options)),
    };

    let roles = allocation.roles();
    for role in Role::ALL {
        let wanted = match role {
            Role::Chair => roles.chairs,
            Role::Panel => roles.panels,
            Role::Trainee => roles.trainees,
        };
        let short = squares.iter().filter(|square| square.role(role).len() < wanted).count();
        if short > 0 {
            warn!(?role, wanted, short, available = ctx.adjudicator_ids().len(), "rooms left short of adjudicators");
        }
    }
    info!(
        tournament = ctx.tournament,
        round = ctx.round,
        strategy,
        squares = squares.len(),
        assigned = squares.iter().map(|square| square.adjudicators().count()).sum::<usize>(),
        "adjudicator draw done"
    );
    Ok(squares)
}
