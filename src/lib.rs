//! Draw generation for debate tournaments.
//!
//! A round's draw is computed in two steps over a [`RoundContext`]: a team
//! allocation groups the available teams into squares, then an adjudicator
//! allocation staffs those squares with chairs, panels and trainees. Every
//! step is a pure function of its input; random choices are seeded from the
//! tournament name and round.
//!
//! ```no_run
//! use debate_draw::{compute_draw, DrawConfig, RoundInput, Style};
//!
//! let style = Style::default();
//! let input = RoundInput {
//!     tournament: "open",
//!     round: 1,
//!     style: &style,
//!     teams: &[],
//!     adjudicators: &[],
//!     venues: &[],
//!     team_results: &[],
//!     adjudicator_results: &[],
//! };
//! let config = DrawConfig::from_toml_str("[team]\nstrategy = \"powerpair\"\n").unwrap();
//! let draw = compute_draw(&input, &config);
//! ```

pub mod action;
pub mod adjudicator;
mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod local_search;
pub mod matching;
pub mod model;
pub mod position;
pub mod precheck;
pub mod seed;
pub mod style;
pub mod team;

#[cfg(test)]
mod fixtures;

use tracing::debug;

pub use config::{AdjudicatorAllocation, DrawConfig, TeamAllocation};
pub use context::{RoundContext, RoundInput};
pub use error::DrawError;
pub use model::draw::{Role, Square};
pub use model::entity::{Adjudicator, Entity, Id, Team, Venue};
pub use model::result::{AdjudicatorResult, TeamResult};
pub use style::Style;
pub use team::TeamDraw;

/// Prechecks the rosters, draws the teams and staffs the squares. The
/// returned draw carries the staffed squares and the team metadata.
pub fn compute_draw(input: &RoundInput, config: &DrawConfig) -> Result<TeamDraw, DrawError> {
    precheck::teams(input, &config.team)?;
    let ctx = RoundContext::new(input)?;
    let mut draw = team::allocate(&ctx, &config.team)?;
    debug!(squares = draw.squares.len(), "teams drawn, allocating adjudicators");

    precheck::adjudicators(input, &draw.squares, &config.adjudicator.roles())?;
    draw.squares = adjudicator::allocate(&ctx, &draw.squares, &config.adjudicator)?;
    Ok(draw)
}
