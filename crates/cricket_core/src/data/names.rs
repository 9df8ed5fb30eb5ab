//! Identity generator: random player names from first-name and surname pools.

use serde::{Deserialize, Serialize};

use crate::engine::roll::RollSource;
use crate::error::ConfigError;

const DEFAULT_FIRST_NAMES: &[&str] = &[
    "James", "Oliver", "Harry", "Jack", "Thomas", "Rahul", "Arjun", "Rohan", "Imran", "Shane",
    "Glenn", "Brendon", "Kane", "Joe", "Ben", "Stuart", "Jasprit", "Mitchell", "Pat", "Quinton",
    "Kagiso", "Babar", "Shaheen", "Trent", "Tim", "Dale", "Hashim", "Kumar", "Angelo", "Wanindu",
];

const DEFAULT_SURNAMES: &[&str] = &[
    "Smith", "Root", "Stokes", "Broad", "Anderson", "Sharma", "Patel", "Kohli", "Dravid", "Khan",
    "Warner", "Cummins", "Starc", "Hazlewood", "Williamson", "Boult", "Southee", "de Kock",
    "Rabada", "Steyn", "Amla", "Azam", "Afridi", "Mathews", "Hasaranga", "Taylor", "Jadeja",
    "Bairstow", "Buttler", "Labuschagne",
];

/// First-name and surname pools that rosters are sampled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePools {
    pub first_names: Vec<String>,
    pub surnames: Vec<String>,
}

impl Default for NamePools {
    fn default() -> Self {
        Self {
            first_names: DEFAULT_FIRST_NAMES.iter().map(|s| s.to_string()).collect(),
            surnames: DEFAULT_SURNAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NamePools {
    pub fn new(first_names: Vec<String>, surnames: Vec<String>) -> Self {
        Self { first_names, surnames }
    }

    /// Draw `count` distinct first names and `count` distinct surnames
    /// without replacement and pair them positionally.
    pub fn generate_roster<R: RollSource + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, ConfigError> {
        let first = distinct_pool("first_names", &self.first_names, count)?;
        let last = distinct_pool("surnames", &self.surnames, count)?;

        let first = sample_without_replacement(first, count, rng);
        let last = sample_without_replacement(last, count, rng);

        Ok(first.into_iter().zip(last).map(|(f, s)| format!("{f} {s}")).collect())
    }
}

fn distinct_pool<'a>(
    pool: &'static str,
    entries: &'a [String],
    required: usize,
) -> Result<Vec<&'a str>, ConfigError> {
    let mut distinct: Vec<&str> = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.trim();
        if !entry.is_empty() && !distinct.contains(&entry) {
            distinct.push(entry);
        }
    }
    if distinct.len() < required {
        return Err(ConfigError::NamePoolTooSmall { pool, required, found: distinct.len() });
    }
    Ok(distinct)
}

/// Partial Fisher-Yates: the first `count` slots end up a uniform sample.
fn sample_without_replacement<'a, R: RollSource + ?Sized>(
    mut pool: Vec<&'a str>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    for i in 0..count {
        let j = i + rng.choose_index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
