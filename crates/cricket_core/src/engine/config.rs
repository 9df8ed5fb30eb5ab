//! Match rules that a front end may override.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::dismissal::DismissalWeights;
use crate::error::ConfigError;

pub const MAX_OVERS: u32 = 20;
pub const BALLS_PER_OVER: u32 = 6;
pub const MAX_OVERS_PER_BOWLER: u32 = 4;
pub const TEAM_SIZE: usize = 11;
pub const MAX_WICKETS: u32 = 10;
/// Specialist bowlers sit at roster positions 5..=10.
pub const BOWLER_POOL_START: usize = 5;
pub const BOWLER_POOL_END: usize = 10;
/// Keepers are drawn from the top order, positions 0..=5.
pub const KEEPER_POOL_END: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub max_overs: u32,
    pub balls_per_over: u32,
    pub max_overs_per_bowler: u32,
    pub team_size: usize,
    pub max_wickets: u32,
    /// Inclusive roster range eligible to bowl.
    pub bowler_pool_start: usize,
    pub bowler_pool_end: usize,
    /// Keeper drawn from roster positions `0..=keeper_pool_end`.
    pub keeper_pool_end: usize,
    pub dismissal_weights: DismissalWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_overs: MAX_OVERS,
            balls_per_over: BALLS_PER_OVER,
            max_overs_per_bowler: MAX_OVERS_PER_BOWLER,
            team_size: TEAM_SIZE,
            max_wickets: MAX_WICKETS,
            bowler_pool_start: BOWLER_POOL_START,
            bowler_pool_end: BOWLER_POOL_END,
            keeper_pool_end: KEEPER_POOL_END,
            dismissal_weights: DismissalWeights::default(),
        }
    }
}

impl MatchConfig {
    /// Same rules with a different innings length.
    pub fn with_overs(mut self, max_overs: u32) -> Self {
        self.max_overs = max_overs;
        self
    }

    pub fn max_legal_balls(&self) -> u32 {
        self.max_overs.saturating_mul(self.balls_per_over)
    }

    pub fn max_balls_per_bowler(&self) -> u32 {
        self.max_overs_per_bowler.saturating_mul(self.balls_per_over)
    }

    pub fn bowler_pool(&self) -> Range<usize> {
        self.bowler_pool_start..self.bowler_pool_end + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_size < 2 {
            return Err(ConfigError::TeamSizeTooSmall(self.team_size));
        }
        // Two batters are always at the crease, so at most team_size - 1 can fall
        if self.max_wickets == 0 || self.max_wickets as usize >= self.team_size {
            return Err(ConfigError::InvalidWicketLimit {
                max_wickets: self.max_wickets,
                team_size: self.team_size,
            });
        }
        if self.max_overs == 0 {
            return Err(ConfigError::InvalidOvers("innings must have at least one over".into()));
        }
        if self.balls_per_over == 0 {
            return Err(ConfigError::InvalidOvers("over must have at least one ball".into()));
        }
        if self.max_overs_per_bowler == 0 {
            return Err(ConfigError::InvalidOvers("bowlers must be allowed at least one over".into()));
        }
        // Ball counts are tracked as u32
        if self.max_overs.checked_mul(self.balls_per_over).is_none()
            || self.max_overs_per_bowler.checked_mul(self.balls_per_over).is_none()
        {
            return Err(ConfigError::InvalidOvers(format!(
                "{} overs of {} balls exceeds the largest countable innings",
                self.max_overs.max(self.max_overs_per_bowler),
                self.balls_per_over
            )));
        }
        if self.bowler_pool_start > self.bowler_pool_end || self.bowler_pool_end >= self.team_size {
            return Err(ConfigError::BowlerPoolOutOfRange {
                start: self.bowler_pool_start,
                end: self.bowler_pool_end,
                team_size: self.team_size,
            });
        }
        if self.keeper_pool_end >= self.team_size {
            return Err(ConfigError::KeeperPoolOutOfRange {
                end: self.keeper_pool_end,
                team_size: self.team_size,
            });
        }

        // A bowler just off can hold at most (cap - 1) overs of quota, so the
        // rest of the pool must always hold the remainder of the innings.
        let bowlers = self.bowler_pool().len();
        let spare = (bowlers as u64 - 1) * self.max_overs_per_bowler as u64;
        if spare < self.max_overs as u64 - 1 {
            return Err(ConfigError::BowlerPoolTooSmall {
                bowlers,
                overs_each: self.max_overs_per_bowler,
                overs: self.max_overs,
            });
        }

        self.dismissal_weights.validate()
    }
}

/// Render a legal-ball count as overs: `7` → `"1.1"`, `12` → `"2"`.
pub fn format_overs(legal_balls: u32) -> String {
    format_overs_with(legal_balls, BALLS_PER_OVER)
}

pub fn format_overs_with(legal_balls: u32, balls_per_over: u32) -> String {
    let balls_per_over = balls_per_over.max(1);
    let overs = legal_balls / balls_per_over;
    let balls = legal_balls % balls_per_over;
    if balls == 0 {
        overs.to_string()
    } else {
        format!("{overs}.{balls}")
    }
}
