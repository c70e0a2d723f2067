//! Attendee skill profiles and the deduplicated pool handed to the balancer.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::PoolError;

/// Lowest accepted value for any rating.
pub const RATING_MIN: f64 = 0.0;
/// Highest accepted value for any rating.
pub const RATING_MAX: f64 = 10.0;

/// Named rating categories carried by every [`SkillProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Shooting,
    Passing,
    Dribbling,
    Defense,
    Physical,
    Goalkeeping,
}

impl Skill {
    /// Every skill, in profile declaration order.
    pub const ALL: [Skill; 6] = [
        Skill::Shooting,
        Skill::Passing,
        Skill::Dribbling,
        Skill::Defense,
        Skill::Physical,
        Skill::Goalkeeping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Shooting => "shooting",
            Skill::Passing => "passing",
            Skill::Dribbling => "dribbling",
            Skill::Defense => "defense",
            Skill::Physical => "physical",
            Skill::Goalkeeping => "goalkeeping",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated ratings of a single player. Values are immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillProfile {
    ratings: [f64; 6],
}

impl SkillProfile {
    /// Build a profile from its six ratings, rejecting non-finite or out-of-range values.
    pub fn new(
        attendee: &AttendeeId,
        shooting: f64,
        passing: f64,
        dribbling: f64,
        defense: f64,
        physical: f64,
        goalkeeping: f64,
    ) -> Result<Self, PoolError> {
        let ratings = [shooting, passing, dribbling, defense, physical, goalkeeping];
        for (skill, value) in Skill::ALL.into_iter().zip(ratings) {
            if !value.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&value) {
                return Err(PoolError::InvalidRating {
                    attendee: attendee.clone(),
                    skill,
                    value,
                });
            }
        }
        Ok(Self { ratings })
    }

    /// Rating for the given skill.
    pub fn rating(&self, skill: Skill) -> f64 {
        self.ratings[skill as usize]
    }

    pub fn goalkeeping(&self) -> f64 {
        self.rating(Skill::Goalkeeping)
    }

    pub(crate) fn ratings(&self) -> &[f64; 6] {
        &self.ratings
    }
}

/// Position a player declared as preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[serde(alias = "goleiro")]
    Goalkeeper,
    #[serde(alias = "zagueiro", alias = "defensor")]
    Defender,
    #[serde(alias = "meio-campo", alias = "meia")]
    Midfielder,
    #[serde(alias = "atacante")]
    Forward,
}

/// Opaque identifier of a club member taking part in a match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AttendeeId(String);

impl AttendeeId {
    /// Wrap a raw identifier. Surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, PoolError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PoolError::EmptyId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttendeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confirmed participant of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    pub id: AttendeeId,
    pub profile: SkillProfile,
    pub preferred_position: Option<Position>,
}

impl Attendee {
    pub fn new(id: AttendeeId, profile: SkillProfile, preferred_position: Option<Position>) -> Self {
        Self {
            id,
            profile,
            preferred_position,
        }
    }

    pub(crate) fn prefers_goal(&self) -> bool {
        self.preferred_position == Some(Position::Goalkeeper)
    }
}

/// Set of attendees for one draw, keyed and ordered by id.
///
/// Ordering by id makes the draw independent of the order the caller listed attendees in.
#[derive(Debug, Clone, Default)]
pub struct AttendeePool {
    attendees: BTreeMap<AttendeeId, Attendee>,
}

impl AttendeePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attendee, failing if the id is already present.
    pub fn insert(&mut self, attendee: Attendee) -> Result<(), PoolError> {
        if self.attendees.contains_key(&attendee.id) {
            return Err(PoolError::DuplicateAttendee(attendee.id));
        }
        self.attendees.insert(attendee.id.clone(), attendee);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    /// Iterate attendees in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Attendee> {
        self.attendees.values()
    }
}

impl TryFrom<Vec<Attendee>> for AttendeePool {
    type Error = PoolError;

    fn try_from(attendees: Vec<Attendee>) -> Result<Self, Self::Error> {
        let mut pool = Self::new();
        for attendee in attendees {
            pool.insert(attendee)?;
        }
        Ok(pool)
    }
}
