use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    balancer::{
        Attendee, AttendeeId, AttendeePool, DrawConfig, DrawSeed, PoolError, Position, Role,
        SkillProfile, SkillWeights,
    },
    dao::models::{MatchTeamsEntity, TeamEntity, TeamMemberEntity},
    dto::{format_system_time, validation::validate_attendee_id},
};

/// Confirmed attendees of a match and optional overrides of the club draw settings.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DrawRequest {
    #[validate(nested)]
    pub attendees: Vec<AttendeeInput>,
    #[serde(default)]
    #[validate(nested)]
    pub config: Option<DrawConfigInput>,
}

/// One confirmed attendee with the skill profile stored for them.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AttendeeInput {
    #[validate(custom(function = validate_attendee_id))]
    pub id: String,
    /// Display name echoed back in the drawn teams.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_position: Option<Position>,
    #[validate(nested)]
    pub skills: SkillsInput,
}

/// Ratings on the `0..=10` scale.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, Validate)]
pub struct SkillsInput {
    #[validate(range(min = 0.0, max = 10.0))]
    pub shooting: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub passing: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub dribbling: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub defense: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub physical: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub goalkeeping: f64,
}

/// Per-request overrides. Omitted fields keep the configured club defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct DrawConfigInput {
    #[validate(range(min = 1))]
    pub teams: Option<usize>,
    pub min_goalkeepers_per_team: Option<usize>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub goalkeeper_threshold: Option<f64>,
    pub hard_goalkeeper_constraint: Option<bool>,
    /// Integer or string; the same seed with the same attendees reproduces the same teams.
    #[schema(value_type = Option<Object>)]
    pub seed: Option<DrawSeed>,
    pub weights: Option<SkillWeights>,
}

impl DrawConfigInput {
    /// Layer these overrides on top of `defaults`.
    pub fn apply(&self, defaults: &DrawConfig) -> DrawConfig {
        let mut config = defaults.clone();
        if let Some(teams) = self.teams {
            config.teams = teams;
        }
        if let Some(min) = self.min_goalkeepers_per_team {
            config.min_goalkeepers_per_team = min;
        }
        if let Some(threshold) = self.goalkeeper_threshold {
            config.goalkeeper_threshold = threshold;
        }
        if let Some(hard) = self.hard_goalkeeper_constraint {
            config.hard_goalkeeper_constraint = hard;
        }
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        config.with_seed(self.seed.clone())
    }
}

impl AttendeeInput {
    fn to_attendee(&self) -> Result<Attendee, PoolError> {
        let id = AttendeeId::new(self.id.as_str())?;
        let skills = self.skills;
        let profile = SkillProfile::new(
            &id,
            skills.shooting,
            skills.passing,
            skills.dribbling,
            skills.defense,
            skills.physical,
            skills.goalkeeping,
        )?;
        Ok(Attendee::new(id, profile, self.preferred_position))
    }
}

impl DrawRequest {
    /// Build the deduplicated pool, rejecting blank ids, bad ratings and repeated attendees.
    pub fn pool(&self) -> Result<AttendeePool, PoolError> {
        let attendees = self
            .attendees
            .iter()
            .map(AttendeeInput::to_attendee)
            .collect::<Result<Vec<_>, _>>()?;
        AttendeePool::try_from(attendees)
    }

    /// Display names keyed by attendee id, for attendees that sent one.
    pub fn names(&self) -> BTreeMap<AttendeeId, String> {
        self.attendees
            .iter()
            .filter_map(|attendee| {
                let name = attendee.name.as_ref()?.trim();
                if name.is_empty() {
                    return None;
                }
                let id = AttendeeId::new(attendee.id.as_str()).ok()?;
                Some((id, name.to_string()))
            })
            .collect()
    }

    /// Effective configuration for this request.
    pub fn draw_config(&self, defaults: &DrawConfig) -> DrawConfig {
        match &self.config {
            Some(overrides) => overrides.apply(defaults),
            None => defaults.clone(),
        }
    }
}

/// Drawn teams of a match, as persisted and broadcast.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamAssignmentResponse {
    pub match_id: Uuid,
    /// Identifier of this particular draw; a redraw yields a new one.
    pub draw_id: Uuid,
    /// RFC 3339 timestamp of the draw.
    pub drawn_at: String,
    pub teams: Vec<TeamResponse>,
    pub goalkeeper_constraint_relaxed: bool,
    pub goalkeepers_required: usize,
    pub goalkeepers_available: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamResponse {
    /// Position of the team in the draw, starting at 0.
    pub index: usize,
    pub size: usize,
    pub aggregate_score: f64,
    pub members: Vec<TeamMemberResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamMemberResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    pub score: f64,
}

impl From<MatchTeamsEntity> for TeamAssignmentResponse {
    fn from(entity: MatchTeamsEntity) -> Self {
        Self {
            match_id: entity.match_id,
            draw_id: entity.draw_id,
            drawn_at: format_system_time(entity.drawn_at),
            teams: entity
                .teams
                .into_iter()
                .enumerate()
                .map(TeamResponse::from)
                .collect(),
            goalkeeper_constraint_relaxed: entity.goalkeeper_constraint_relaxed,
            goalkeepers_required: entity.goalkeepers_required,
            goalkeepers_available: entity.goalkeepers_available,
        }
    }
}

impl From<(usize, TeamEntity)> for TeamResponse {
    fn from((index, team): (usize, TeamEntity)) -> Self {
        Self {
            index,
            size: team.members.len(),
            aggregate_score: team.aggregate_score,
            members: team.members.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TeamMemberEntity> for TeamMemberResponse {
    fn from(member: TeamMemberEntity) -> Self {
        Self {
            id: member.attendee_id,
            name: member.name,
            role: member.role,
            score: member.score,
        }
    }
}
