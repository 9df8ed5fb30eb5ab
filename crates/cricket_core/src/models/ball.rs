use serde::{Deserialize, Serialize};

use crate::engine::dismissal::Dismissal;

/// What a single die face means.
///
/// | Roll | Outcome |
/// |------|---------|
/// | 0, 5, 7 | dot ball |
/// | 1, 2, 3 | runs off the bat (odd runs cross the batters) |
/// | 4 | boundary four |
/// | 6 | six |
/// | 8 | no-ball/wide: one extra, not a legal ball |
/// | 9 | wicket |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallOutcome {
    Dot,
    Runs(u8),
    Four,
    Six,
    Extra,
    Wicket,
}

impl BallOutcome {
    pub fn from_roll(roll: u8) -> Option<Self> {
        let outcome = match roll {
            0 | 5 | 7 => BallOutcome::Dot,
            1..=3 => BallOutcome::Runs(roll),
            4 => BallOutcome::Four,
            6 => BallOutcome::Six,
            8 => BallOutcome::Extra,
            9 => BallOutcome::Wicket,
            _ => return None,
        };
        Some(outcome)
    }

    pub fn runs(self) -> u32 {
        match self {
            BallOutcome::Dot | BallOutcome::Wicket => 0,
            BallOutcome::Runs(r) => r as u32,
            BallOutcome::Four => 4,
            BallOutcome::Six => 6,
            BallOutcome::Extra => 1,
        }
    }

    /// Counts toward the over and the batter's balls faced.
    pub fn is_legal(self) -> bool {
        !matches!(self, BallOutcome::Extra)
    }

    /// Batters cross on an odd number of runs off the bat.
    pub fn rotates_strike(self) -> bool {
        matches!(self, BallOutcome::Runs(r) if r % 2 == 1)
    }

    /// Commentary line. Wickets get their dismissal text appended by the
    /// resolver.
    pub fn description(self) -> String {
        match self {
            BallOutcome::Dot => "Dot ball".to_string(),
            BallOutcome::Runs(1) => "1 run".to_string(),
            BallOutcome::Runs(r) => format!("{r} runs"),
            BallOutcome::Four => "FOUR!".to_string(),
            BallOutcome::Six => "SIX!".to_string(),
            BallOutcome::Extra => "No-ball/Wide (+1 run)".to_string(),
            BallOutcome::Wicket => "OUT!".to_string(),
        }
    }
}

/// Outcome of one delivery. Built once by the resolver and handed up to
/// the innings controller and any front end; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallResult {
    pub roll: u8,
    pub outcome: BallOutcome,
    pub description: String,
    /// Runs added to the batting side by this delivery.
    pub runs: u32,
    pub is_wicket: bool,
    pub is_legal: bool,
    /// Short name of the batter who faced.
    pub striker: String,
    /// Short name of the bowler.
    pub bowler: String,
    pub dismissal: Option<Dismissal>,
    /// Short name of the incoming batter after a wicket.
    pub new_batter: Option<String>,
}

impl BallResult {
    /// Compact scoreboard symbol for an over summary.
    pub fn symbol(&self) -> String {
        if self.is_wicket {
            "W".to_string()
        } else if !self.is_legal {
            "NB".to_string()
        } else if self.runs == 0 {
            ".".to_string()
        } else {
            self.runs.to_string()
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.outcome, BallOutcome::Four | BallOutcome::Six)
    }
}
