//! Random sources for the match engine.
//!
//! Every random decision in a match (die rolls, dismissal kinds, fielders,
//! bowler selection, toss, roster sampling) is drawn from a [`RollSource`]
//! passed down the controller call chain. There is no global RNG: the same
//! seed always replays the same match.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Highest face on the ten-sided delivery die.
pub const DIE_MAX: u8 = 9;

pub trait RollSource {
    /// Die roll for the next delivery, in `0..=DIE_MAX`.
    fn roll_die(&mut self) -> u8;

    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Uniform draw in `0..total` for cumulative-weight sampling.
    fn weight_draw(&mut self, total: u32) -> u32;

    /// Fair coin. `true` is heads.
    fn coin_flip(&mut self) -> bool {
        self.choose_index(2) == 0
    }
}

impl<R: RollSource + ?Sized> RollSource for &mut R {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }

    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }

    fn weight_draw(&mut self, total: u32) -> u32 {
        (**self).weight_draw(total)
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// Production source: ChaCha8 stream, reproducible from a `u64` seed.
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: ChaCha8Rng,
}

impl SeededRolls {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RollSource for SeededRolls {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(0..=DIE_MAX)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choose_index called with empty range");
        self.rng.gen_range(0..len.max(1))
    }

    fn weight_draw(&mut self, total: u32) -> u32 {
        debug_assert!(total > 0, "weight_draw called with zero total");
        self.rng.gen_range(0..total.max(1))
    }
}

/// Test source: replays fixed die rolls, weight draws and index picks in
/// order. Anything not scripted (or once a queue runs dry) comes from a
/// seeded fallback stream, so scripts only need to pin what a test checks.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<u8>,
    weight_draws: VecDeque<u32>,
    picks: VecDeque<usize>,
    fallback: SeededRolls,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            weight_draws: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: SeededRolls::new(0),
        }
    }

    pub fn with_weight_draws(mut self, draws: impl IntoIterator<Item = u32>) -> Self {
        self.weight_draws = draws.into_iter().collect();
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks = picks.into_iter().collect();
        self
    }

    pub fn remaining_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_die(&mut self) -> u8 {
        match self.rolls.pop_front() {
            Some(roll) => roll,
            None => self.fallback.roll_die(),
        }
    }

    fn choose_index(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(pick) => pick % len.max(1),
            None => self.fallback.choose_index(len),
        }
    }

    fn weight_draw(&mut self, total: u32) -> u32 {
        match self.weight_draws.pop_front() {
            Some(draw) => draw % total.max(1),
            None => self.fallback.weight_draw(total),
        }
    }
}
