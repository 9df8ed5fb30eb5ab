use serde::{Deserialize, Serialize};

use super::Player;
use crate::data::NamePools;
use crate::engine::config::MatchConfig;
use crate::engine::roll::RollSource;
use crate::error::{raise, ConfigError, EngineFault};

/// A batting/bowling side. Captain and keeper are indices into `players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,

    pub runs: u32,
    pub outs: u32,
    /// Every delivery faced, extras included.
    pub balls: u32,
    /// Deliveries that count toward the over limit.
    pub legal_balls: u32,
    /// Runs from no-balls and wides.
    pub extras: u32,

    pub striker_idx: usize,
    pub non_striker_idx: usize,
    /// Next unused batting slot.
    pub next_idx: usize,

    pub captain_idx: usize,
    pub keeper_idx: usize,

    /// Wickets that close the innings.
    pub wicket_limit: u32,
}

impl Team {
    /// Sample a roster from `pools`, then pick captain (anyone) and keeper
    /// (top order) at random.
    pub fn generate<R: RollSource + ?Sized>(
        name: impl Into<String>,
        pools: &NamePools,
        config: &MatchConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let names = pools.generate_roster(config.team_size, rng)?;
        let captain_idx = rng.choose_index(config.team_size);
        let keeper_idx = rng.choose_index(config.keeper_pool_end + 1);
        Self::from_names(name, names, captain_idx, keeper_idx, config)
    }

    /// Build a side from an explicit batting order.
    pub fn from_names(
        name: impl Into<String>,
        names: Vec<String>,
        captain_idx: usize,
        keeper_idx: usize,
        config: &MatchConfig,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if names.len() != config.team_size {
            return Err(ConfigError::RosterSize {
                team: name,
                expected: config.team_size,
                found: names.len(),
            });
        }
        for (i, player) in names.iter().enumerate() {
            if names[..i].contains(player) {
                return Err(ConfigError::DuplicatePlayer { team: name, name: player.clone() });
            }
        }
        if captain_idx >= config.team_size {
            return Err(ConfigError::InvalidRole { team: name, role: "captain", index: captain_idx });
        }
        if keeper_idx > config.keeper_pool_end || keeper_idx >= config.team_size {
            return Err(ConfigError::InvalidRole { team: name, role: "keeper", index: keeper_idx });
        }

        Ok(Self {
            name,
            players: names.into_iter().map(Player::new).collect(),
            runs: 0,
            outs: 0,
            balls: 0,
            legal_balls: 0,
            extras: 0,
            striker_idx: 0,
            non_striker_idx: 1,
            next_idx: 2,
            captain_idx,
            keeper_idx,
            wicket_limit: config.max_wickets,
        })
    }

    pub fn is_all_out(&self) -> bool {
        self.outs >= self.wicket_limit
    }

    pub fn striker(&self) -> &Player {
        &self.players[self.striker_idx]
    }

    pub fn striker_mut(&mut self) -> &mut Player {
        &mut self.players[self.striker_idx]
    }

    pub fn captain(&self) -> &Player {
        &self.players[self.captain_idx]
    }

    pub fn keeper(&self) -> &Player {
        &self.players[self.keeper_idx]
    }

    pub fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker_idx, &mut self.non_striker_idx);
    }

    /// Replace the striker with the next unused batter. Returns the new
    /// striker's index.
    pub fn bring_in_next_batter(&mut self) -> Result<usize, EngineFault> {
        if self.next_idx >= self.players.len() {
            return Err(raise(EngineFault::BattingOrderExhausted {
                next_idx: self.next_idx,
                outs: self.outs,
            }));
        }
        self.striker_idx = self.next_idx;
        self.next_idx += 1;
        Ok(self.striker_idx)
    }

    /// Whether another batter can walk in after a wicket that leaves the
    /// side short of all out.
    pub fn has_batter_waiting(&self) -> bool {
        self.next_idx < self.players.len()
    }

    pub fn check_invariants(&self) -> Result<(), EngineFault> {
        if self.striker_idx == self.non_striker_idx {
            return Err(raise(EngineFault::StrikeCollision(self.striker_idx)));
        }
        if self.next_idx > self.players.len() {
            return Err(raise(EngineFault::BattingOrderExhausted {
                next_idx: self.next_idx,
                outs: self.outs,
            }));
        }
        Ok(())
    }

    /// Whether the batter at `idx` has come to the crease.
    pub fn has_batted(&self, idx: usize) -> bool {
        idx < self.next_idx
    }

    /// `runs/outs` as shown on a scoreboard.
    pub fn score(&self) -> String {
        format!("{}/{}", self.runs, self.outs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::roll::SeededRolls;
    use crate::models::test_support::{roster_names, sample_team};
    use std::collections::HashSet;

    #[test]
    fn test_is_all_out() {
        let mut team = sample_team("Test");
        team.outs = 9;
        assert!(!team.is_all_out());
        team.outs = 10;
        assert!(team.is_all_out());
    }

    #[test]
    fn test_team_generation() {
        let config = MatchConfig::default();
        let mut rng = SeededRolls::new(42);
        let team = Team::generate("Test", &NamePools::default(), &config, &mut rng).unwrap();
        assert_eq!(team.players.len(), 11);
        let names: HashSet<_> = team.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 11);
        assert!(team.captain_idx < 11);
        assert!(team.keeper_idx <= 5);
        assert_eq!((team.striker_idx, team.non_striker_idx, team.next_idx), (0, 1, 2));
    }

    #[test]
    fn test_keeper_always_top_order() {
        let config = MatchConfig::default();
        for seed in 0..200 {
            let mut rng = SeededRolls::new(seed);
            let team = Team::generate("T", &NamePools::default(), &config, &mut rng).unwrap();
            assert!(team.keeper_idx <= config.keeper_pool_end);
        }
    }

    #[test]
    fn test_roster_validation() {
        let config = MatchConfig::default();
        let short = roster_names("X")[..10].to_vec();
        assert!(matches!(
            Team::from_names("X", short, 0, 0, &config),
            Err(ConfigError::RosterSize { expected: 11, found: 10, .. })
        ));

        let mut dup = roster_names("X");
        dup[10] = dup[3].clone();
        assert!(matches!(
            Team::from_names("X", dup, 0, 0, &config),
            Err(ConfigError::DuplicatePlayer { .. })
        ));

        assert!(matches!(
            Team::from_names("X", roster_names("X"), 0, 6, &config),
            Err(ConfigError::InvalidRole { role: "keeper", index: 6, .. })
        ));
        assert!(matches!(
            Team::from_names("X", roster_names("X"), 11, 0, &config),
            Err(ConfigError::InvalidRole { role: "captain", .. })
        ));
    }

    #[test]
    fn test_next_batter_progression() {
        let mut team = sample_team("Test");
        assert_eq!(team.bring_in_next_batter().unwrap(), 2);
        assert_eq!(team.striker_idx, 2);
        assert_eq!(team.next_idx, 3);

        team.next_idx = 11;
        assert!(!team.has_batter_waiting());
    }

    #[cfg(not(feature = "strict_contracts"))]
    #[test]
    fn test_invariant_violations_detected() {
        let mut team = sample_team("Test");
        team.next_idx = 11;
        assert!(matches!(
            team.bring_in_next_batter(),
            Err(EngineFault::BattingOrderExhausted { next_idx: 11, .. })
        ));

        team.non_striker_idx = team.striker_idx;
        assert_eq!(team.check_invariants(), Err(EngineFault::StrikeCollision(0)));
    }

    #[test]
    fn test_swap_strike() {
        let mut team = sample_team("Test");
        team.swap_strike();
        assert_eq!((team.striker_idx, team.non_striker_idx), (1, 0));
        assert_eq!(team.striker().name, team.players[1].name);
    }
}
