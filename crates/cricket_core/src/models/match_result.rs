//! Match output records: how innings end, toss, outcome, and the full
//! serializable report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Team;
use crate::error::ParseChoiceError;
use crate::scorecard::InningsSummary;

/// Why an innings closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsEnd {
    AllOut,
    OversComplete,
    TargetReached,
}

impl fmt::Display for InningsEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InningsEnd::AllOut => write!(f, "all out"),
            InningsEnd::OversComplete => write!(f, "overs complete"),
            InningsEnd::TargetReached => write!(f, "target reached"),
        }
    }
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Side batting first defended its total.
    WonByRuns { winner: String, margin: u32 },
    /// Side batting second chased the target down.
    WonByWickets { winner: String, margin: u32 },
    Tie,
}

impl MatchOutcome {
    /// Compare final totals. The chasing side can only finish ahead by
    /// reaching the target, so its margin is wickets in hand.
    pub fn decide(
        first_name: &str,
        first_runs: u32,
        second_name: &str,
        second_runs: u32,
        second_outs: u32,
        max_wickets: u32,
    ) -> Self {
        if first_runs > second_runs {
            MatchOutcome::WonByRuns { winner: first_name.to_string(), margin: first_runs - second_runs }
        } else if second_runs > first_runs {
            MatchOutcome::WonByWickets {
                winner: second_name.to_string(),
                margin: max_wickets.saturating_sub(second_outs),
            }
        } else {
            MatchOutcome::Tie
        }
    }

    /// Outcome from both sides' final state, `first` having batted first.
    pub fn from_teams(first: &Team, second: &Team) -> Self {
        Self::decide(
            &first.name,
            first.runs,
            &second.name,
            second.runs,
            second.outs,
            second.wicket_limit,
        )
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchOutcome::WonByRuns { winner, .. } | MatchOutcome::WonByWickets { winner, .. } => {
                Some(winner)
            }
            MatchOutcome::Tie => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchOutcome::WonByRuns { winner, margin } => {
                write!(f, "{winner} wins by {margin} run{}", if *margin == 1 { "" } else { "s" })
            }
            MatchOutcome::WonByWickets { winner, margin } => {
                write!(f, "{winner} wins by {margin} wicket{}", if *margin == 1 { "" } else { "s" })
            }
            MatchOutcome::Tie => write!(f, "Match tied"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn from_flip(heads: bool) -> Self {
        if heads {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }
}

impl FromStr for CoinFace {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "heads" => Ok(CoinFace::Heads),
            "t" | "tails" => Ok(CoinFace::Tails),
            _ => Err(ParseChoiceError {
                input: s.trim().to_string(),
                expected: "toss call (heads/tails)",
            }),
        }
    }
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            CoinFace::Heads => "heads",
            CoinFace::Tails => "tails",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

impl FromStr for TossDecision {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bat" => Ok(TossDecision::Bat),
            "bowl" => Ok(TossDecision::Bowl),
            _ => Err(ParseChoiceError { input: s.trim().to_string(), expected: "choice (bat/bowl)" }),
        }
    }
}

impl fmt::Display for TossDecision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TossDecision::Bat => "bat",
            TossDecision::Bowl => "bowl",
        })
    }
}

/// Which of the two sides constructed into the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSlot {
    Team1,
    Team2,
}

impl TeamSlot {
    pub fn other(self) -> Self {
        match self {
            TeamSlot::Team1 => TeamSlot::Team2,
            TeamSlot::Team2 => TeamSlot::Team1,
        }
    }
}

/// Toss record. Team 1 always makes the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossResult {
    pub call: CoinFace,
    pub flip: CoinFace,
    pub winner: TeamSlot,
    pub decision: TossDecision,
    pub batting_first: TeamSlot,
}

impl TossResult {
    pub fn caller_won(&self) -> bool {
        self.call == self.flip
    }
}

/// Everything a front end needs once a match is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub schema_version: u8,
    pub seed: Option<u64>,
    pub team1: String,
    pub team2: String,
    pub toss: Option<TossResult>,
    pub first_innings: InningsSummary,
    pub second_innings: InningsSummary,
    pub outcome: MatchOutcome,
    pub result_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batting_first_wins() {
        let outcome = MatchOutcome::decide("Team A", 150, "Team B", 120, 10, 10);
        assert_eq!(outcome.to_string(), "Team A wins by 30 runs");
        assert_eq!(outcome.winner(), Some("Team A"));
    }

    #[test]
    fn test_batting_second_wins() {
        let outcome = MatchOutcome::decide("Team A", 100, "Team B", 101, 3, 10);
        assert_eq!(outcome, MatchOutcome::WonByWickets { winner: "Team B".into(), margin: 7 });
        assert_eq!(outcome.to_string(), "Team B wins by 7 wickets");
    }

    #[test]
    fn test_tie() {
        let outcome = MatchOutcome::decide("Team A", 130, "Team B", 130, 10, 10);
        assert_eq!(outcome, MatchOutcome::Tie);
        assert!(outcome.winner().is_none());
        assert_eq!(outcome.to_string(), "Match tied");
    }

    #[test]
    fn test_singular_margins() {
        assert_eq!(
            MatchOutcome::decide("A", 101, "B", 100, 10, 10).to_string(),
            "A wins by 1 run"
        );
        assert_eq!(MatchOutcome::decide("A", 50, "B", 51, 9, 10).to_string(), "B wins by 1 wicket");
    }

    #[test]
    fn test_outcome_from_final_teams() {
        use crate::models::test_support::sample_team;

        let mut first = sample_team("Team A");
        let mut second = sample_team("Team B");
        first.runs = 100;
        first.outs = 10;
        second.runs = 101;
        second.outs = 3;
        assert_eq!(MatchOutcome::from_teams(&first, &second).to_string(), "Team B wins by 7 wickets");
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("Heads".parse::<CoinFace>(), Ok(CoinFace::Heads));
        assert_eq!(" t ".parse::<CoinFace>(), Ok(CoinFace::Tails));
        assert_eq!("BOWL".parse::<TossDecision>(), Ok(TossDecision::Bowl));

        let err = "edge".parse::<CoinFace>().unwrap_err();
        assert_eq!(err.to_string(), "'edge' is not a valid toss call (heads/tails)");
        assert!("b".parse::<TossDecision>().is_err());
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = MatchOutcome::decide("Team A", 150, "Team B", 120, 10, 10);
        insta::assert_json_snapshot!(outcome, @r###"
        {
          "result": "won_by_runs",
          "winner": "Team A",
          "margin": 30
        }
        "###);
    }
}
