//! Ball resolver: one die roll in, one [`BallResult`] out.
//!
//! All validation and random draws happen before any entity is touched, so
//! a delivery either applies completely or not at all.

use tracing::debug;

use super::dismissal::{describe_dismissal, Dismissal, DismissalWeights};
use super::roll::RollSource;
use crate::error::{raise, EngineFault};
use crate::models::{BallOutcome, BallResult, Team};

/// Resolve one delivery bowled by `bowling.players[bowler_idx]` to the
/// current striker of `batting`.
///
/// Side effects:
/// - team: `balls` always; `legal_balls` on legal deliveries; `runs`;
///   `extras` on roll 8; `outs` on a wicket
/// - striker: `runs`; `balls_faced` on legal deliveries; dismissal
/// - bowler: `bowling_balls` on legal deliveries; `runs_conceded` including
///   extras; `wickets_taken` on every wicket
/// - strike rotates on 1 and 3; after a wicket the next batter takes strike
pub fn resolve_ball<R: RollSource + ?Sized>(
    batting: &mut Team,
    bowling: &mut Team,
    bowler_idx: usize,
    roll: u8,
    weights: &DismissalWeights,
    rng: &mut R,
) -> Result<BallResult, EngineFault> {
    if batting.is_all_out() {
        return Err(raise(EngineFault::InningsComplete(batting.name.clone())));
    }
    batting.check_invariants()?;
    if bowler_idx >= bowling.players.len() {
        return Err(raise(EngineFault::BowlerOutOfRange {
            index: bowler_idx,
            roster: bowling.players.len(),
        }));
    }
    let Some(outcome) = BallOutcome::from_roll(roll) else {
        return Err(raise(EngineFault::RollOutOfRange(roll)));
    };

    let is_wicket = outcome == BallOutcome::Wicket;
    let ends_innings = is_wicket && batting.outs + 1 >= batting.wicket_limit;
    if is_wicket && !ends_innings && !batting.has_batter_waiting() {
        return Err(raise(EngineFault::BattingOrderExhausted {
            next_idx: batting.next_idx,
            outs: batting.outs,
        }));
    }

    let dismissal = is_wicket.then(|| {
        let kind = weights.sample(rng);
        let how_out = describe_dismissal(kind, bowler_idx, bowling, rng);
        Dismissal { kind, how_out }
    });

    // Mutation starts here
    let runs = outcome.runs();
    let legal = outcome.is_legal();
    let striker_name = batting.striker().short_name.clone();
    let bowler_name = bowling.players[bowler_idx].short_name.clone();

    batting.balls += 1;
    batting.runs += runs;
    if legal {
        batting.legal_balls += 1;
    } else {
        batting.extras += runs;
    }

    {
        let striker = batting.striker_mut();
        striker.runs += runs;
        if legal {
            striker.balls_faced += 1;
        }
    }

    {
        let bowler = &mut bowling.players[bowler_idx];
        bowler.runs_conceded += runs;
        if legal {
            bowler.bowling_balls += 1;
        }
        if is_wicket {
            bowler.wickets_taken += 1;
        }
    }

    let mut new_batter = None;
    let description = match &dismissal {
        Some(dismissal) => {
            batting.outs += 1;
            batting.striker_mut().dismiss(dismissal.how_out.clone());
            if !batting.is_all_out() {
                // A batter is waiting, checked before mutation
                let idx = batting.bring_in_next_batter()?;
                new_batter = Some(batting.players[idx].short_name.clone());
            }
            format!("{} {}", outcome.description(), dismissal.how_out)
        }
        None => {
            if outcome.rotates_strike() {
                batting.swap_strike();
            }
            outcome.description()
        }
    };

    debug!(
        roll,
        batter = %striker_name,
        bowler = %bowler_name,
        %description,
        score = %batting.score(),
        "delivery resolved"
    );

    Ok(BallResult {
        roll,
        outcome,
        description,
        runs,
        is_wicket,
        is_legal: legal,
        striker: striker_name,
        bowler: bowler_name,
        dismissal,
        new_batter,
    })
}
