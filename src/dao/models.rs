use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::SystemTime};
use uuid::Uuid;

use crate::balancer::{AttendeeId, Role, Team, TeamAssignment};

/// Drawn composition of a match persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchTeamsEntity {
    /// Identifier of the match the teams were drawn for.
    pub match_id: Uuid,
    /// Identifier of this draw, shared with the broadcast event.
    pub draw_id: Uuid,
    /// When the draw was computed.
    pub drawn_at: SystemTime,
    /// Teams in configuration order.
    pub teams: Vec<TeamEntity>,
    /// Whether keeper slots were left empty because the pool lacked goalkeepers.
    pub goalkeeper_constraint_relaxed: bool,
    pub goalkeepers_required: usize,
    pub goalkeepers_available: usize,
}

/// Single drawn team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamEntity {
    /// Members in assignment order.
    pub members: Vec<TeamMemberEntity>,
    /// Sum of the members' scores.
    pub aggregate_score: f64,
}

/// Member of a drawn team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMemberEntity {
    pub attendee_id: String,
    /// Display name supplied with the draw request, if any.
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    pub score: f64,
}

impl MatchTeamsEntity {
    /// Snapshot a fresh assignment for persistence, attaching display names where known.
    pub fn from_assignment(
        match_id: Uuid,
        assignment: &TeamAssignment,
        names: &BTreeMap<AttendeeId, String>,
    ) -> Self {
        Self {
            match_id,
            draw_id: Uuid::new_v4(),
            drawn_at: SystemTime::now(),
            teams: assignment
                .teams
                .iter()
                .map(|team| TeamEntity::from_team(team, names))
                .collect(),
            goalkeeper_constraint_relaxed: assignment.goalkeeper_constraint_relaxed,
            goalkeepers_required: assignment.goalkeepers_required,
            goalkeepers_available: assignment.goalkeepers_available,
        }
    }
}

impl TeamEntity {
    fn from_team(team: &Team, names: &BTreeMap<AttendeeId, String>) -> Self {
        Self {
            members: team
                .members
                .iter()
                .map(|member| TeamMemberEntity {
                    attendee_id: member.id.to_string(),
                    name: names.get(&member.id).cloned(),
                    role: member.role,
                    score: member.score,
                })
                .collect(),
            aggregate_score: team.aggregate_score,
        }
    }
}
