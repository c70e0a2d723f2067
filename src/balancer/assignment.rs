//! Output of a draw.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::profile::AttendeeId;

/// Role an attendee was drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Goalkeeper,
    Outfield,
}

/// One drawn attendee with the score it contributed to its team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    pub id: AttendeeId,
    pub role: Role,
    pub score: f64,
}

/// A drawn team, members listed in the order they were assigned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Team {
    pub members: Vec<TeamMember>,
    pub aggregate_score: f64,
}

impl Team {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn goalkeepers(&self) -> impl Iterator<Item = &TeamMember> {
        self.members
            .iter()
            .filter(|member| member.role == Role::Goalkeeper)
    }

    pub(crate) fn push(&mut self, member: TeamMember) {
        self.aggregate_score += member.score;
        self.members.push(member);
    }
}

/// Partition of a pool into teams, with the data needed to audit it.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamAssignment {
    pub teams: Vec<Team>,
    /// Set when the keeper slots could not all be filled and the shortage was tolerated.
    pub goalkeeper_constraint_relaxed: bool,
    pub goalkeepers_required: usize,
    pub goalkeepers_available: usize,
}

impl TeamAssignment {
    /// Number of attendees across every team.
    pub fn total_members(&self) -> usize {
        self.teams.iter().map(Team::size).sum()
    }

    /// Largest difference between two team aggregate scores.
    pub fn score_spread(&self) -> f64 {
        let scores = self.teams.iter().map(|team| team.aggregate_score);
        let max = scores.clone().fold(f64::MIN, f64::max);
        let min = scores.fold(f64::MAX, f64::min);
        if self.teams.is_empty() { 0.0 } else { max - min }
    }
}
