//! Bowler rotation.

use tracing::debug;

use super::config::MatchConfig;
use super::roll::RollSource;
use crate::error::{raise, EngineFault};
use crate::models::Team;

/// Pool members with overs left, excluding whoever bowled the last over.
pub fn eligible_bowlers(bowling: &Team, config: &MatchConfig, previous: Option<usize>) -> Vec<usize> {
    let cap = config.max_balls_per_bowler();
    config
        .bowler_pool()
        .filter(|idx| *idx < bowling.players.len())
        .filter(|idx| Some(*idx) != previous)
        .filter(|idx| bowling.players[*idx].bowling_balls < cap)
        .collect()
}

/// Pick the bowler for `over` uniformly from [`eligible_bowlers`].
///
/// A valid [`MatchConfig`] always leaves someone eligible, so an empty
/// list is an engine fault rather than a recoverable condition.
pub fn select_bowler<R: RollSource + ?Sized>(
    bowling: &Team,
    config: &MatchConfig,
    previous: Option<usize>,
    over: u32,
    rng: &mut R,
) -> Result<usize, EngineFault> {
    let eligible = eligible_bowlers(bowling, config, previous);
    if eligible.is_empty() {
        return Err(raise(EngineFault::NoEligibleBowler { over, previous }));
    }
    let chosen = eligible[rng.choose_index(eligible.len())];
    debug!(over, bowler = %bowling.players[chosen].short_name, eligible = eligible.len(), "bowler selected");
    Ok(chosen)
}
