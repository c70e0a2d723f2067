//! Draw configuration, skill weighting and seed handling.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    error::DrawError,
    profile::{RATING_MAX, RATING_MIN, Skill, SkillProfile},
};

pub const DEFAULT_TEAMS: usize = 2;
pub const DEFAULT_MIN_GOALKEEPERS_PER_TEAM: usize = 1;
pub const DEFAULT_GOALKEEPER_THRESHOLD: f64 = 6.0;

/// Weight applied to each rating when computing an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingWeights {
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defense: f64,
    pub physical: f64,
    pub goalkeeping: f64,
}

impl RatingWeights {
    /// Outfield default: every field skill counts once, goalkeeping not at all.
    pub const OUTFIELD: Self = Self {
        shooting: 1.0,
        passing: 1.0,
        dribbling: 1.0,
        defense: 1.0,
        physical: 1.0,
        goalkeeping: 0.0,
    };

    /// Goalkeeper default, on the same 0..=50 scale as [`RatingWeights::OUTFIELD`].
    pub const GOALKEEPER: Self = Self {
        shooting: 0.0,
        passing: 0.0,
        dribbling: 0.0,
        defense: 1.0,
        physical: 1.0,
        goalkeeping: 3.0,
    };

    fn as_array(&self) -> [f64; 6] {
        [
            self.shooting,
            self.passing,
            self.dribbling,
            self.defense,
            self.physical,
            self.goalkeeping,
        ]
    }

    /// Weighted sum of the profile's ratings.
    pub fn score(&self, profile: &SkillProfile) -> f64 {
        self.as_array()
            .iter()
            .zip(profile.ratings())
            .map(|(weight, rating)| weight * rating)
            .sum()
    }

    fn validate(&self, label: &str) -> Result<(), DrawError> {
        for (skill, weight) in Skill::ALL.into_iter().zip(self.as_array()) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DrawError::invalid_config(format!(
                    "{label} weight for {skill} must be a finite non-negative number (got {weight})"
                )));
            }
        }
        Ok(())
    }
}

/// Pair of weightings, one per role an attendee can be drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkillWeights {
    #[serde(default = "outfield_weights")]
    pub outfield: RatingWeights,
    #[serde(default = "goalkeeper_weights")]
    pub goalkeeper: RatingWeights,
}

fn outfield_weights() -> RatingWeights {
    RatingWeights::OUTFIELD
}

fn goalkeeper_weights() -> RatingWeights {
    RatingWeights::GOALKEEPER
}

impl Default for SkillWeights {
    fn default() -> Self {
        Self {
            outfield: RatingWeights::OUTFIELD,
            goalkeeper: RatingWeights::GOALKEEPER,
        }
    }
}

impl SkillWeights {
    pub fn validate(&self) -> Result<(), DrawError> {
        self.outfield.validate("outfield")?;
        self.goalkeeper.validate("goalkeeper")
    }
}

/// Explicit seed for tie-break randomness. Clients may send an integer of either sign or any
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DrawSeed {
    Number(u64),
    /// Only reached by negative integers; non-negative ones deserialize as [`DrawSeed::Number`].
    Signed(i64),
    Text(String),
}

impl DrawSeed {
    /// Build the generator for this seed. Text seeds are hashed so any string maps to a stable
    /// 256-bit seed.
    pub fn rng(&self) -> ChaCha8Rng {
        match self {
            DrawSeed::Number(value) => ChaCha8Rng::seed_from_u64(*value),
            // Bit reinterpretation; stable across platforms.
            DrawSeed::Signed(value) => ChaCha8Rng::seed_from_u64(*value as u64),
            DrawSeed::Text(text) => {
                ChaCha8Rng::from_seed(*blake3::hash(text.as_bytes()).as_bytes())
            }
        }
    }
}

/// Everything the balancer needs besides the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfig {
    pub teams: usize,
    pub min_goalkeepers_per_team: usize,
    pub goalkeeper_threshold: f64,
    pub hard_goalkeeper_constraint: bool,
    pub seed: Option<DrawSeed>,
    pub weights: SkillWeights,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            teams: DEFAULT_TEAMS,
            min_goalkeepers_per_team: DEFAULT_MIN_GOALKEEPERS_PER_TEAM,
            goalkeeper_threshold: DEFAULT_GOALKEEPER_THRESHOLD,
            hard_goalkeeper_constraint: false,
            seed: None,
            weights: SkillWeights::default(),
        }
    }
}

impl DrawConfig {
    pub fn with_seed(mut self, seed: impl Into<Option<DrawSeed>>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.teams == 0 {
            return Err(DrawError::invalid_config("team count must be positive"));
        }

        let threshold = self.goalkeeper_threshold;
        if !threshold.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&threshold) {
            return Err(DrawError::invalid_config(format!(
                "goalkeeper threshold must be within {RATING_MIN}..={RATING_MAX} (got {threshold})"
            )));
        }

        self.weights.validate()
    }

    /// Number of keeper slots the pool should fill across all teams.
    pub fn goalkeepers_required(&self) -> usize {
        self.teams.saturating_mul(self.min_goalkeepers_per_team)
    }

    pub(crate) fn is_goalkeeper_capable(&self, profile: &SkillProfile) -> bool {
        profile.goalkeeping() >= self.goalkeeper_threshold
    }
}
