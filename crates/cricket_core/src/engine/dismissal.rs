//! Dismissal kinds, the weighted table they are drawn from, and the
//! scorecard text for each.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::roll::RollSource;
use crate::error::ConfigError;
use crate::models::Team;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Caught,
    Bowled,
    #[strum(serialize = "LBW")]
    Lbw,
    #[strum(serialize = "Run Out")]
    RunOut,
    Stumped,
    #[strum(serialize = "Hit Wicket")]
    HitWicket,
}

/// Relative likelihood of each dismissal kind. Sampling is proportional:
/// one uniform draw over the cumulative total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalWeights {
    entries: Vec<(DismissalKind, u32)>,
}

impl Default for DismissalWeights {
    fn default() -> Self {
        Self {
            entries: vec![
                (DismissalKind::Caught, 57),
                (DismissalKind::Bowled, 20),
                (DismissalKind::Lbw, 15),
                (DismissalKind::RunOut, 4),
                (DismissalKind::Stumped, 3),
                (DismissalKind::HitWicket, 1),
            ],
        }
    }
}

impl DismissalWeights {
    pub fn new(entries: Vec<(DismissalKind, u32)>) -> Result<Self, ConfigError> {
        let weights = Self { entries };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self
            .entries
            .iter()
            .try_fold(0u32, |sum, (_, w)| sum.checked_add(*w))
            .ok_or(ConfigError::DismissalWeightsOverflow)?;
        if total == 0 {
            return Err(ConfigError::EmptyDismissalWeights);
        }
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().fold(0, |sum, (_, w)| sum.saturating_add(*w))
    }

    pub fn weight_of(&self, kind: DismissalKind) -> u32 {
        self.entries.iter().filter(|(k, _)| *k == kind).map(|(_, w)| *w).sum()
    }

    /// Map a draw in `0..total` onto the cumulative table.
    pub fn kind_for_draw(&self, draw: u32) -> DismissalKind {
        let mut cumulative = 0u32;
        for (kind, weight) in &self.entries {
            cumulative = cumulative.saturating_add(*weight);
            if draw < cumulative {
                return *kind;
            }
        }
        // Draws are taken modulo total, so only an out-of-range draw lands here
        self.entries
            .iter()
            .rev()
            .find(|(_, w)| *w > 0)
            .map(|(k, _)| *k)
            .unwrap_or(DismissalKind::Caught)
    }

    pub fn sample<R: RollSource + ?Sized>(&self, rng: &mut R) -> DismissalKind {
        let draw = rng.weight_draw(self.total());
        self.kind_for_draw(draw)
    }
}

/// A resolved dismissal: its kind plus the scorecard text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    pub how_out: String,
}

/// Build the scorecard text for `kind`.
///
/// A catch is credited to a fielder drawn uniformly from the whole bowling
/// roster, bowler included. Stumpings go to the bowling side's keeper.
pub fn describe_dismissal<R: RollSource + ?Sized>(
    kind: DismissalKind,
    bowler_idx: usize,
    bowling: &Team,
    rng: &mut R,
) -> String {
    let bowler = &bowling.players[bowler_idx].short_name;
    match kind {
        DismissalKind::Caught => {
            let fielder_idx = rng.choose_index(bowling.players.len());
            format!("c {} b {}", bowling.players[fielder_idx].short_name, bowler)
        }
        DismissalKind::Stumped => format!("st †{} b {}", bowling.keeper().short_name, bowler),
        DismissalKind::Bowled => format!("b {bowler}"),
        DismissalKind::Lbw => format!("lbw b {bowler}"),
        DismissalKind::RunOut => "Run Out".to_string(),
        DismissalKind::HitWicket => format!("Hit Wicket b {bowler}"),
    }
}
