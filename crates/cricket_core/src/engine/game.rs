//! Match controller: toss, two innings, result.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::MatchConfig;
use super::innings::{Delivery, Innings};
use super::roll::RollSource;
use crate::data::NamePools;
use crate::error::{raise, ConfigError, EngineFault};
use crate::models::{
    CoinFace, MatchOutcome, MatchReport, Team, TeamSlot, TossDecision, TossResult,
};
use crate::scorecard::InningsSummary;
use crate::SCHEMA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Toss,
    FirstInnings,
    SecondInnings,
    Complete,
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            MatchPhase::Toss => "awaiting toss",
            MatchPhase::FirstInnings => "in first innings",
            MatchPhase::SecondInnings => "in second innings",
            MatchPhase::Complete => "complete",
        })
    }
}

/// A full match between two sides. Created once; after the second innings
/// closes nothing changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    config: MatchConfig,
    team1: Team,
    team2: Team,
    phase: MatchPhase,
    toss: Option<TossResult>,
    batting_first: Option<TeamSlot>,
    innings: Vec<Innings>,
    outcome: Option<MatchOutcome>,
}

/// Borrow `(batting, bowling)` mutably out of the two sides.
fn split_sides<'a>(
    team1: &'a mut Team,
    team2: &'a mut Team,
    batting: TeamSlot,
) -> (&'a mut Team, &'a mut Team) {
    match batting {
        TeamSlot::Team1 => (team1, team2),
        TeamSlot::Team2 => (team2, team1),
    }
}

impl Game {
    /// Generate both rosters from `pools`.
    pub fn new<R: RollSource + ?Sized>(
        team1: impl Into<String>,
        team2: impl Into<String>,
        config: MatchConfig,
        pools: &NamePools,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let team1 = Team::generate(team1, pools, &config, rng)?;
        let team2 = Team::generate(team2, pools, &config, rng)?;
        Self::from_teams(team1, team2, config)
    }

    pub fn from_teams(team1: Team, team2: Team, config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for team in [&team1, &team2] {
            if team.players.len() != config.team_size {
                return Err(ConfigError::RosterSize {
                    team: team.name.clone(),
                    expected: config.team_size,
                    found: team.players.len(),
                });
            }
        }
        let mut team1 = team1;
        let mut team2 = team2;
        team1.wicket_limit = config.max_wickets;
        team2.wicket_limit = config.max_wickets;

        Ok(Self {
            config,
            team1,
            team2,
            phase: MatchPhase::Toss,
            toss: None,
            batting_first: None,
            innings: Vec::new(),
            outcome: None,
        })
    }

    /// Team 1 calls. A winning caller uses `caller_decision` (random when
    /// `None`); otherwise team 2 chooses at random.
    pub fn toss<R: RollSource + ?Sized>(
        &mut self,
        call: CoinFace,
        caller_decision: Option<TossDecision>,
        rng: &mut R,
    ) -> Result<TossResult, EngineFault> {
        self.expect_phase(MatchPhase::Toss, "toss")?;
        let flip = CoinFace::from_flip(rng.coin_flip());
        let winner = if call == flip { TeamSlot::Team1 } else { TeamSlot::Team2 };
        let random_choice = |rng: &mut R| {
            if rng.coin_flip() {
                TossDecision::Bat
            } else {
                TossDecision::Bowl
            }
        };
        let decision = match (winner, caller_decision) {
            (TeamSlot::Team1, Some(decision)) => decision,
            _ => random_choice(rng),
        };
        let batting_first = match decision {
            TossDecision::Bat => winner,
            TossDecision::Bowl => winner.other(),
        };

        let result = TossResult { call, flip, winner, decision, batting_first };
        info!(
            %call,
            %flip,
            winner = %self.team(winner).name,
            %decision,
            "toss decided"
        );
        self.toss = Some(result.clone());
        self.set_batting_order(batting_first)?;
        Ok(result)
    }

    /// Skip the toss and fix who bats first.
    pub fn set_batting_order(&mut self, batting_first: TeamSlot) -> Result<(), EngineFault> {
        self.expect_phase(MatchPhase::Toss, "set_batting_order")?;
        self.batting_first = Some(batting_first);
        self.innings.push(Innings::new(1, None));
        self.phase = MatchPhase::FirstInnings;
        Ok(())
    }

    /// Advance the match by exactly one delivery.
    pub fn bowl_next<R: RollSource + ?Sized>(&mut self, rng: &mut R) -> Result<Delivery, EngineFault> {
        let batting_slot = self.batting_slot("bowl_next")?;
        let Some(innings) = self.innings.last_mut() else {
            return Err(self.wrong_phase("bowl_next"));
        };
        let (batting, bowling) = split_sides(&mut self.team1, &mut self.team2, batting_slot);
        let delivery = innings.bowl(batting, bowling, &self.config, rng)?;
        if delivery.end.is_some() {
            self.close_innings();
        }
        Ok(delivery)
    }

    /// Play every remaining delivery.
    pub fn play<R: RollSource + ?Sized>(&mut self, rng: &mut R) -> Result<MatchOutcome, EngineFault> {
        while self.phase != MatchPhase::Complete {
            self.bowl_next(rng)?;
        }
        self.outcome.clone().ok_or_else(|| self.wrong_phase("play"))
    }

    fn close_innings(&mut self) {
        match self.phase {
            MatchPhase::FirstInnings => {
                let target = self.batting_team().map(|t| t.runs + 1).unwrap_or(1);
                info!(target, "innings break");
                self.innings.push(Innings::new(2, Some(target)));
                self.phase = MatchPhase::SecondInnings;
            }
            MatchPhase::SecondInnings => {
                if let (Some(first), Some(second)) = (self.first_batting(), self.second_batting()) {
                    let outcome = MatchOutcome::from_teams(first, second);
                    info!(result = %outcome, "match complete");
                    self.outcome = Some(outcome);
                }
                self.phase = MatchPhase::Complete;
            }
            MatchPhase::Toss | MatchPhase::Complete => {}
        }
    }

    pub fn result(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn toss_result(&self) -> Option<&TossResult> {
        self.toss.as_ref()
    }

    pub fn team(&self, slot: TeamSlot) -> &Team {
        match slot {
            TeamSlot::Team1 => &self.team1,
            TeamSlot::Team2 => &self.team2,
        }
    }

    pub fn batting_first(&self) -> Option<TeamSlot> {
        self.batting_first
    }

    pub fn first_batting(&self) -> Option<&Team> {
        self.batting_first.map(|slot| self.team(slot))
    }

    pub fn second_batting(&self) -> Option<&Team> {
        self.batting_first.map(|slot| self.team(slot.other()))
    }

    /// Side at the crease in the innings in progress (or the last one).
    pub fn batting_team(&self) -> Option<&Team> {
        match self.innings.len() {
            0 => None,
            1 => self.first_batting(),
            _ => self.second_batting(),
        }
    }

    pub fn bowling_team(&self) -> Option<&Team> {
        match self.innings.len() {
            0 => None,
            1 => self.second_batting(),
            _ => self.first_batting(),
        }
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.last()
    }

    /// Innings `number`, 1 or 2.
    pub fn innings(&self, number: u8) -> Option<&Innings> {
        self.innings.get(usize::from(number).checked_sub(1)?)
    }

    pub fn target(&self) -> Option<u32> {
        self.innings.get(1).and_then(|innings| innings.target)
    }

    /// Scorecards and result of a finished match.
    pub fn report(&self, seed: Option<u64>) -> Result<MatchReport, EngineFault> {
        self.expect_phase(MatchPhase::Complete, "report")?;
        let (Some(first_team), Some(second_team), Some(first), Some(second), Some(outcome)) = (
            self.first_batting(),
            self.second_batting(),
            self.innings(1),
            self.innings(2),
            self.outcome.clone(),
        ) else {
            return Err(self.wrong_phase("report"));
        };

        Ok(MatchReport {
            schema_version: SCHEMA_VERSION,
            seed,
            team1: self.team1.name.clone(),
            team2: self.team2.name.clone(),
            toss: self.toss.clone(),
            first_innings: InningsSummary::build(first, first_team, second_team, &self.config),
            second_innings: InningsSummary::build(second, second_team, first_team, &self.config),
            result_text: outcome.to_string(),
            outcome,
        })
    }

    fn batting_slot(&self, operation: &'static str) -> Result<TeamSlot, EngineFault> {
        let first = self.batting_first.ok_or_else(|| self.wrong_phase(operation))?;
        match self.phase {
            MatchPhase::FirstInnings => Ok(first),
            MatchPhase::SecondInnings => Ok(first.other()),
            MatchPhase::Toss | MatchPhase::Complete => Err(self.wrong_phase(operation)),
        }
    }

    fn expect_phase(&self, phase: MatchPhase, operation: &'static str) -> Result<(), EngineFault> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.wrong_phase(operation))
        }
    }

    fn wrong_phase(&self, operation: &'static str) -> EngineFault {
        raise(EngineFault::WrongPhase { operation, phase: self.phase.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::roll::{ScriptedRolls, SeededRolls};
    use crate::models::test_support::sample_team;
    use crate::models::InningsEnd;

    fn game() -> Game {
        Game::from_teams(sample_team("Team A"), sample_team("Team B"), MatchConfig::default())
            .unwrap()
    }

    #[test]
    fn test_toss_winning_caller_chooses() {
        let mut game = game();
        // Coin picks index 0 (heads)
        let mut rng = ScriptedRolls::new([]).with_picks([0]);
        let toss = game.toss(CoinFace::Heads, Some(TossDecision::Bowl), &mut rng).unwrap();
        assert!(toss.caller_won());
        assert_eq!(toss.winner, TeamSlot::Team1);
        assert_eq!(toss.decision, TossDecision::Bowl);
        assert_eq!(toss.batting_first, TeamSlot::Team2);
        assert_eq!(game.phase(), MatchPhase::FirstInnings);
        assert_eq!(game.batting_team().unwrap().name, "Team B");
        assert_eq!(game.bowling_team().unwrap().name, "Team A");
    }

    #[test]
    fn test_toss_losing_caller_defers_to_opposition() {
        let mut game = game();
        // Tails comes up, then the opposition's random pick is bat
        let mut rng = ScriptedRolls::new([]).with_picks([1, 0]);
        let toss = game.toss(CoinFace::Heads, Some(TossDecision::Bowl), &mut rng).unwrap();
        assert_eq!(toss.flip, CoinFace::Tails);
        assert_eq!(toss.winner, TeamSlot::Team2);
        assert_eq!(toss.decision, TossDecision::Bat);
        assert_eq!(toss.batting_first, TeamSlot::Team2);
    }

    #[test]
    fn test_second_innings_target() {
        let mut game = game();
        game.set_batting_order(TeamSlot::Team1).unwrap();
        let config = MatchConfig::default();
        let rolls: Vec<u8> = (0..10).flat_map(|_| [6, 5, 5, 5, 5, 9]).collect();
        let mut rng = ScriptedRolls::new(rolls);

        while game.phase() == MatchPhase::FirstInnings {
            game.bowl_next(&mut rng).unwrap();
        }
        assert_eq!(game.innings(1).unwrap().end(), Some(InningsEnd::AllOut));
        assert_eq!(game.team(TeamSlot::Team1).runs, 60);
        assert_eq!(game.target(), Some(61));
        assert_eq!(game.batting_team().unwrap().name, "Team B");
        let chase = game.current_innings().unwrap().chase(game.batting_team().unwrap(), &config);
        assert_eq!(chase.unwrap().runs_needed, 61);
    }

    #[test]
    fn test_play_to_completion() {
        let mut game = game();
        let mut rng = SeededRolls::new(2024);
        game.toss(CoinFace::Tails, None, &mut rng).unwrap();
        let outcome = game.play(&mut rng).unwrap();

        assert_eq!(game.phase(), MatchPhase::Complete);
        assert_eq!(game.result(), Some(&outcome));
        let first = game.first_batting().unwrap();
        let second = game.second_batting().unwrap();
        assert_eq!(outcome, MatchOutcome::from_teams(first, second));
        if second.runs > first.runs {
            assert_eq!(game.innings(2).unwrap().end(), Some(InningsEnd::TargetReached));
        }

        let report = game.report(Some(2024)).unwrap();
        assert_eq!(report.result_text, outcome.to_string());
        assert_eq!(report.first_innings.runs, first.runs);
    }

    #[test]
    fn test_same_seed_same_match() {
        let play = |seed| {
            let mut rng = SeededRolls::new(seed);
            let mut game =
                Game::new("Team A", "Team B", MatchConfig::default(), &NamePools::default(), &mut rng)
                    .unwrap();
            game.toss(CoinFace::Heads, Some(TossDecision::Bat), &mut rng).unwrap();
            game.play(&mut rng).unwrap();
            game.report(Some(seed)).unwrap()
        };
        assert_eq!(play(99), play(99));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MatchConfig { bowler_pool_start: 9, ..MatchConfig::default() };
        let err = Game::from_teams(sample_team("Team A"), sample_team("Team B"), config).unwrap_err();
        assert!(matches!(err, ConfigError::BowlerPoolTooSmall { .. }));
    }

    #[cfg(not(feature = "strict_contracts"))]
    #[test]
    fn test_out_of_order_calls_are_faults() {
        let mut game = game();
        let mut rng = SeededRolls::new(1);
        assert!(matches!(game.bowl_next(&mut rng), Err(EngineFault::WrongPhase { .. })));
        assert!(matches!(game.report(None), Err(EngineFault::WrongPhase { .. })));

        game.set_batting_order(TeamSlot::Team1).unwrap();
        assert!(matches!(
            game.toss(CoinFace::Heads, None, &mut rng),
            Err(EngineFault::WrongPhase { .. })
        ));
    }
}
