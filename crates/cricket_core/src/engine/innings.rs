//! Innings controller.
//!
//! Drives the ball resolver one delivery at a time through
//! `OverStart -> BallLoop -> OverEnd -> (OverStart | Complete)`. The
//! controller owns no players: both sides are borrowed per call, so the
//! match controller stays the single owner of team state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bowling::select_bowler;
use super::config::{format_overs_with, MatchConfig};
use super::resolver::resolve_ball;
use super::roll::RollSource;
use crate::error::{raise, EngineFault};
use crate::models::{BallResult, InningsEnd, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsPhase {
    /// No bowler chosen for the current over yet.
    OverStart,
    BallLoop,
    /// Six legal balls bowled; strike swap and next bowler pending.
    OverEnd,
    Complete,
}

impl fmt::Display for InningsPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            InningsPhase::OverStart => "over start",
            InningsPhase::BallLoop => "in over",
            InningsPhase::OverEnd => "over end",
            InningsPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Individual landmark reached on a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    HalfCentury,
    Century,
}

impl Milestone {
    /// Landmark passed going from `before` to `after` runs, the larger one
    /// if a single hit crosses both.
    pub fn crossed(before: u32, after: u32) -> Option<Self> {
        if before < 100 && after >= 100 {
            Some(Milestone::Century)
        } else if before < 50 && after >= 50 {
            Some(Milestone::HalfCentury)
        } else {
            None
        }
    }

    pub fn runs(self) -> u32 {
        match self {
            Milestone::HalfCentury => 50,
            Milestone::Century => 100,
        }
    }
}

/// One over as it appears on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverSummary {
    /// 1-based.
    pub number: u32,
    pub bowler_idx: usize,
    pub bowler: String,
    pub symbols: Vec<String>,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    /// False when the innings ended mid-over.
    pub completed: bool,
}

impl OverSummary {
    fn from_balls(
        number: u32,
        bowler_idx: usize,
        balls: &[BallResult],
        balls_per_over: u32,
    ) -> Self {
        let legal_balls = balls.iter().filter(|b| b.is_legal).count() as u32;
        Self {
            number,
            bowler_idx,
            bowler: balls.first().map(|b| b.bowler.clone()).unwrap_or_default(),
            symbols: balls.iter().map(BallResult::symbol).collect(),
            runs: balls.iter().map(|b| b.runs).sum(),
            wickets: balls.iter().filter(|b| b.is_wicket).count() as u32,
            legal_balls,
            completed: legal_balls >= balls_per_over,
        }
    }

    pub fn is_maiden(&self) -> bool {
        self.completed && self.runs == 0
    }
}

impl fmt::Display for OverSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Over {} ({}): {} | {} run{}, {} wkt{}",
            self.number,
            self.bowler,
            self.symbols.join(" "),
            self.runs,
            if self.runs == 1 { "" } else { "s" },
            self.wickets,
            if self.wickets == 1 { "" } else { "s" },
        )?;
        if self.is_maiden() {
            write!(f, " (maiden)")?;
        }
        Ok(())
    }
}

/// Where a chase stands after the latest delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaseState {
    pub target: u32,
    pub runs_needed: u32,
    pub balls_remaining: u32,
}

impl ChaseState {
    /// Runs per over needed from here; `None` once no balls remain.
    pub fn required_rate(&self, balls_per_over: u32) -> Option<f64> {
        (self.balls_remaining > 0)
            .then(|| self.runs_needed as f64 * balls_per_over as f64 / self.balls_remaining as f64)
    }
}

impl fmt::Display for ChaseState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Need {} run{} from {} ball{}",
            self.runs_needed,
            if self.runs_needed == 1 { "" } else { "s" },
            self.balls_remaining,
            if self.balls_remaining == 1 { "" } else { "s" },
        )
    }
}

/// Everything produced by one call to [`Innings::bowl`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// Over the ball belonged to, 1-based.
    pub over: u32,
    pub ball: BallResult,
    pub milestone: Option<Milestone>,
    /// Set when this ball finished an over, or the innings mid-over.
    pub over_completed: Option<OverSummary>,
    pub end: Option<InningsEnd>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    /// 1 or 2.
    pub number: u8,
    /// Runs the batting side must reach; only set for the chase.
    pub target: Option<u32>,
    phase: InningsPhase,
    over_number: u32,
    balls_this_over: u32,
    current_bowler: Option<usize>,
    last_bowler: Option<usize>,
    /// Bowlers by first appearance.
    bowler_order: Vec<usize>,
    deliveries: Vec<BallResult>,
    over_start: usize,
    overs: Vec<OverSummary>,
    end: Option<InningsEnd>,
}

impl Innings {
    pub fn new(number: u8, target: Option<u32>) -> Self {
        Self {
            number,
            target,
            phase: InningsPhase::OverStart,
            over_number: 1,
            balls_this_over: 0,
            current_bowler: None,
            last_bowler: None,
            bowler_order: Vec::new(),
            deliveries: Vec::new(),
            over_start: 0,
            overs: Vec::new(),
            end: None,
        }
    }

    pub fn phase(&self) -> InningsPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == InningsPhase::Complete
    }

    pub fn end(&self) -> Option<InningsEnd> {
        self.end
    }

    /// Current over, 1-based.
    pub fn over_number(&self) -> u32 {
        self.over_number
    }

    pub fn balls_this_over(&self) -> u32 {
        self.balls_this_over
    }

    pub fn current_bowler(&self) -> Option<usize> {
        self.current_bowler
    }

    pub fn bowler_order(&self) -> &[usize] {
        &self.bowler_order
    }

    pub fn deliveries(&self) -> &[BallResult] {
        &self.deliveries
    }

    pub fn overs(&self) -> &[OverSummary] {
        &self.overs
    }

    pub fn chase(&self, batting: &Team, config: &MatchConfig) -> Option<ChaseState> {
        self.target.map(|target| ChaseState {
            target,
            runs_needed: target.saturating_sub(batting.runs),
            balls_remaining: config.max_legal_balls().saturating_sub(batting.legal_balls),
        })
    }

    /// Pick the bowler for the over about to start. Called lazily by
    /// [`Innings::bowl`]; front ends may call it early to show who is on.
    pub fn start_over<R: RollSource + ?Sized>(
        &mut self,
        bowling: &Team,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<usize, EngineFault> {
        if self.phase != InningsPhase::OverStart {
            return Err(raise(EngineFault::WrongPhase {
                operation: "start_over",
                phase: self.phase.to_string(),
            }));
        }
        let bowler =
            select_bowler(bowling, config, self.last_bowler, self.over_number, rng)?;
        if !self.bowler_order.contains(&bowler) {
            self.bowler_order.push(bowler);
        }
        self.current_bowler = Some(bowler);
        self.phase = InningsPhase::BallLoop;
        Ok(bowler)
    }

    /// Bowl one delivery: roll the die, resolve it, then apply over and
    /// innings bookkeeping.
    pub fn bowl<R: RollSource + ?Sized>(
        &mut self,
        batting: &mut Team,
        bowling: &mut Team,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<Delivery, EngineFault> {
        let bowler_idx = match (self.phase, self.current_bowler) {
            (InningsPhase::Complete, _) => {
                return Err(raise(EngineFault::InningsComplete(batting.name.clone())));
            }
            (InningsPhase::BallLoop, Some(idx)) => idx,
            _ => {
                self.phase = InningsPhase::OverStart;
                self.start_over(bowling, config, rng)?
            }
        };

        let facing = batting.striker_idx;
        let runs_before = batting.players[facing].runs;
        let roll = rng.roll_die();
        let ball = resolve_ball(batting, bowling, bowler_idx, roll, &config.dismissal_weights, rng)?;
        let milestone = Milestone::crossed(runs_before, batting.players[facing].runs);

        let over = self.over_number;
        self.deliveries.push(ball.clone());
        if ball.is_legal {
            self.balls_this_over += 1;
        }

        let mut over_completed = None;
        let end = self.check_end(batting, config);
        if let Some(end) = end {
            if self.deliveries.len() > self.over_start {
                over_completed = Some(self.close_over(bowler_idx, config));
            }
            self.finish(end, batting, config);
        } else if self.balls_this_over >= config.balls_per_over {
            self.phase = InningsPhase::OverEnd;
            let summary = self.close_over(bowler_idx, config);
            self.end_over(batting, bowling, config, rng)?;
            over_completed = Some(summary);
        }

        Ok(Delivery { over, ball, milestone, over_completed, end })
    }

    /// Bowl until the innings closes.
    pub fn play_out<R: RollSource + ?Sized>(
        &mut self,
        batting: &mut Team,
        bowling: &mut Team,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<InningsEnd, EngineFault> {
        loop {
            if let Some(end) = self.bowl(batting, bowling, config, rng)?.end {
                return Ok(end);
            }
        }
    }

    /// All out outranks the other two; a chase won on the last ball counts
    /// as reached rather than overs complete.
    pub fn check_end(&self, batting: &Team, config: &MatchConfig) -> Option<InningsEnd> {
        if batting.is_all_out() {
            Some(InningsEnd::AllOut)
        } else if self.target.is_some_and(|target| batting.runs >= target) {
            Some(InningsEnd::TargetReached)
        } else if batting.legal_balls >= config.max_legal_balls() {
            Some(InningsEnd::OversComplete)
        } else {
            None
        }
    }

    fn close_over(&mut self, bowler_idx: usize, config: &MatchConfig) -> OverSummary {
        let summary = OverSummary::from_balls(
            self.over_number,
            bowler_idx,
            &self.deliveries[self.over_start..],
            config.balls_per_over,
        );
        self.over_start = self.deliveries.len();
        self.overs.push(summary.clone());
        summary
    }

    fn end_over<R: RollSource + ?Sized>(
        &mut self,
        batting: &mut Team,
        bowling: &Team,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<(), EngineFault> {
        batting.swap_strike();
        debug!(
            innings = self.number,
            over = self.over_number,
            score = %batting.score(),
            "over complete"
        );
        self.last_bowler = self.current_bowler.take();
        self.over_number += 1;
        self.balls_this_over = 0;
        self.phase = InningsPhase::OverStart;
        self.start_over(bowling, config, rng)?;
        Ok(())
    }

    fn finish(&mut self, end: InningsEnd, batting: &Team, config: &MatchConfig) {
        self.last_bowler = self.current_bowler.take();
        self.end = Some(end);
        self.phase = InningsPhase::Complete;
        info!(
            innings = self.number,
            team = %batting.name,
            score = %batting.score(),
            overs = %format_overs_with(batting.legal_balls, config.balls_per_over),
            reason = %end,
            "innings complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::roll::{ScriptedRolls, SeededRolls};
    use crate::models::test_support::sample_team;

    fn sides() -> (Team, Team) {
        (sample_team("Batting XI"), sample_team("Bowling XI"))
    }

    #[test]
    fn test_milestones() {
        assert_eq!(Milestone::crossed(48, 52), Some(Milestone::HalfCentury));
        assert_eq!(Milestone::crossed(50, 54), None);
        assert_eq!(Milestone::crossed(96, 100), Some(Milestone::Century));
        assert_eq!(Milestone::crossed(10, 16), None);
    }

    #[test]
    fn test_full_over_swaps_strike_and_changes_bowler() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        let mut rng = ScriptedRolls::new([0, 0, 0, 0, 0, 0, 0]);
        let mut innings = Innings::new(1, None);

        let mut deliveries = Vec::new();
        for _ in 0..6 {
            deliveries.push(innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap());
        }
        let first_bowler = innings.bowler_order()[0];
        let summary = deliveries[5].over_completed.clone().unwrap();
        assert!(deliveries[..5].iter().all(|d| d.over_completed.is_none()));
        assert!(summary.is_maiden());
        assert_eq!(summary.number, 1);
        assert_eq!(summary.bowler_idx, first_bowler);

        assert_eq!((batting.striker_idx, batting.non_striker_idx), (1, 0));
        assert_eq!(innings.over_number(), 2);
        assert_eq!(innings.phase(), InningsPhase::BallLoop);
        assert_ne!(innings.current_bowler(), Some(first_bowler));
        assert_eq!(bowling.players[first_bowler].bowling_balls, 6);
    }

    #[test]
    fn test_no_ball_does_not_count_toward_over() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        let mut rng = ScriptedRolls::new([8, 0, 0, 0, 0, 0, 8, 0]);
        let mut innings = Innings::new(1, None);

        for _ in 0..7 {
            let d = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
            assert!(d.over_completed.is_none());
        }
        assert_eq!(innings.balls_this_over(), 5);
        let d = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        let summary = d.over_completed.unwrap();
        assert_eq!(summary.symbols, vec!["NB", ".", ".", ".", ".", ".", "NB", "."]);
        assert_eq!(summary.runs, 2);
        assert!(!summary.is_maiden());
        assert_eq!(batting.legal_balls, 6);
        assert_eq!(batting.balls, 8);
    }

    #[test]
    fn test_over_summary_text() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        // First pick is the bowler (index 0 of the pool), then a fielder for the catch
        let mut rng = ScriptedRolls::new([1, 4, 9, 0, 6, 2])
            .with_picks([0, 3])
            .with_weight_draws([0]);
        let mut innings = Innings::new(1, None);
        let summary = (0..6)
            .map(|_| innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap())
            .last()
            .and_then(|d| d.over_completed)
            .unwrap();
        insta::assert_snapshot!(summary.to_string(), @"Over 1 (F. BowlingXI): 1 4 W . 6 2 | 13 runs, 1 wkt");
    }

    #[test]
    fn test_all_out_ends_innings() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        let rolls: Vec<u8> = (0..10).flat_map(|_| [5, 5, 5, 5, 5, 9]).collect();
        let mut rng = ScriptedRolls::new(rolls);
        let mut innings = Innings::new(1, None);

        let end = innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(end, InningsEnd::AllOut);
        assert!(batting.is_all_out());
        assert_eq!(batting.outs, 10);
        assert_eq!(batting.legal_balls, 60);
        assert_eq!(rng.remaining_rolls(), 0);
        assert!(innings.is_complete());
        assert_eq!(innings.overs().len(), 10);
    }

    #[test]
    fn test_chase_stops_at_target() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        let mut rng = ScriptedRolls::new([4; 20]);
        let mut innings = Innings::new(2, Some(10));

        let first = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert!(first.end.is_none());
        assert_eq!(
            innings.chase(&batting, &config),
            Some(ChaseState { target: 10, runs_needed: 6, balls_remaining: 119 })
        );

        let end = innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(end, InningsEnd::TargetReached);
        assert_eq!(batting.runs, 12);
        assert_eq!(innings.deliveries().len(), 3);
        assert_eq!(rng.remaining_rolls(), 17);
        let partial = innings.overs().last().unwrap();
        assert!(!partial.completed);
        assert_eq!(partial.legal_balls, 3);
    }

    #[test]
    fn test_overs_complete() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default().with_overs(2);
        let mut rng = ScriptedRolls::new([2; 12]);
        let mut innings = Innings::new(1, None);

        let end = innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(end, InningsEnd::OversComplete);
        assert_eq!(batting.runs, 24);
        assert_eq!(innings.overs().len(), 2);
        assert_ne!(innings.overs()[0].bowler_idx, innings.overs()[1].bowler_idx);
    }

    #[test]
    fn test_chase_won_on_last_ball_is_target_reached() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default().with_overs(1);
        let mut rng = ScriptedRolls::new([0, 0, 0, 0, 0, 4, 4, 4]);
        let mut innings = Innings::new(2, Some(4));

        let end = innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(end, InningsEnd::TargetReached);
        assert_eq!(batting.legal_balls, config.max_legal_balls());
        assert_eq!(batting.runs, 4);
        assert_eq!(rng.remaining_rolls(), 2);

        let last = innings.overs().last().unwrap();
        assert!(last.completed);
        assert_eq!(innings.deliveries().len(), 6);
    }

    #[test]
    fn test_last_wicket_on_last_ball_is_all_out() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig { max_wickets: 1, ..MatchConfig::default() }.with_overs(1);
        batting.wicket_limit = config.max_wickets;
        let mut rng = ScriptedRolls::new([0, 0, 0, 0, 0, 9, 4]);
        let mut innings = Innings::new(2, Some(30));

        let mut last = None;
        while !innings.is_complete() {
            last = Some(innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap());
        }
        let last = last.unwrap();
        assert!(last.ball.is_wicket);
        assert_eq!(last.end, Some(InningsEnd::AllOut));
        assert_eq!(innings.end(), Some(InningsEnd::AllOut));
        assert_eq!(batting.legal_balls, 6);
        assert_eq!(rng.remaining_rolls(), 1);
    }

    #[test]
    fn test_delivery_reports_milestones() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default();
        let mut rng = ScriptedRolls::new([6, 8, 4]);
        let mut innings = Innings::new(1, None);

        batting.players[0].runs = 48;
        let six = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(six.milestone, Some(Milestone::HalfCentury));
        assert_eq!(batting.players[0].runs, 54);

        // An extra still credits the striker
        batting.players[0].runs = 49;
        let extra = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert!(!extra.ball.is_legal);
        assert_eq!(extra.milestone, Some(Milestone::HalfCentury));

        batting.players[0].runs = 96;
        let four = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap();
        assert_eq!(four.milestone, Some(Milestone::Century));
    }

    #[test]
    fn test_required_rate() {
        let chase = ChaseState { target: 61, runs_needed: 30, balls_remaining: 24 };
        assert_eq!(chase.required_rate(6), Some(7.5));
        assert_eq!(chase.to_string(), "Need 30 runs from 24 balls");

        let done = ChaseState { balls_remaining: 0, ..chase };
        assert_eq!(done.required_rate(6), None);
    }

    #[test]
    fn test_seeded_innings_respects_bowling_limits() {
        let config = MatchConfig::default();
        for seed in 0..20 {
            let (mut batting, mut bowling) = sides();
            let mut rng = SeededRolls::new(seed);
            let mut innings = Innings::new(1, None);
            innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();

            assert!(batting.legal_balls <= config.max_legal_balls());
            assert!(bowling.players.iter().all(|p| p.bowling_balls <= 24));
            for pair in innings.overs().windows(2) {
                assert_ne!(pair[0].bowler_idx, pair[1].bowler_idx);
            }
            let credited: u32 = innings.deliveries().iter().map(|b| b.runs).sum();
            assert_eq!(credited, batting.runs);
        }
    }

    #[cfg(not(feature = "strict_contracts"))]
    #[test]
    fn test_bowl_after_completion_is_a_fault() {
        let (mut batting, mut bowling) = sides();
        let config = MatchConfig::default().with_overs(1);
        let mut rng = ScriptedRolls::new([0; 7]);
        let mut innings = Innings::new(1, None);
        innings.play_out(&mut batting, &mut bowling, &config, &mut rng).unwrap();

        let before = batting.clone();
        let err = innings.bowl(&mut batting, &mut bowling, &config, &mut rng).unwrap_err();
        assert!(matches!(err, EngineFault::InningsComplete(_)));
        assert_eq!(batting, before);
    }
}
