//! Team draw: keeper slots first, then everyone else, placed one round at a time.

use std::cmp::Ordering;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{
    assignment::{Role, Team, TeamAssignment, TeamMember},
    config::{DrawConfig, DrawSeed, RatingWeights},
    error::DrawError,
    profile::{Attendee, AttendeePool},
};

/// Smallest team a draw may produce.
pub const MIN_TEAM_SIZE: usize = 1;

/// Partition `pool` into `config.teams` teams.
///
/// Attendees are queued keeper slots first, then outfield, each part strongest first. The
/// queue is dealt in rounds of one attendee per team: within a round the strongest goes to
/// the currently weakest team. Every team grows by one per round, so sizes stay within one,
/// and with two teams each round moves the score gap by at most the round's stronger score.
/// The result only depends on the pool contents, the configuration and the seed.
pub fn draw(pool: &AttendeePool, config: &DrawConfig) -> Result<TeamAssignment, DrawError> {
    config.validate()?;

    let required_players = config.teams.saturating_mul(MIN_TEAM_SIZE);
    if pool.len() < required_players {
        return Err(DrawError::InsufficientPlayers {
            available: pool.len(),
            required: required_players,
        });
    }

    let (mut keepers, mut outfield): (Vec<&Attendee>, Vec<&Attendee>) = pool
        .iter()
        .partition(|attendee| config.is_goalkeeper_capable(&attendee.profile));

    let goalkeepers_required = config.goalkeepers_required();
    let goalkeepers_available = keepers.len();
    let goalkeeper_constraint_relaxed = goalkeepers_available < goalkeepers_required;
    if goalkeeper_constraint_relaxed && config.hard_goalkeeper_constraint {
        return Err(DrawError::GoalkeeperShortage {
            available: goalkeepers_available,
            required: goalkeepers_required,
        });
    }

    keepers.sort_by(|a, b| compare_keepers(a, b));
    // Only the keeper slots are filled by rating; extra keepers play outfield.
    let surplus = keepers.split_off(goalkeepers_required.min(goalkeepers_available));
    outfield.extend(surplus);

    let mut queue = ranked(keepers, Role::Goalkeeper, &config.weights.goalkeeper);
    queue.extend(ranked(outfield, Role::Outfield, &config.weights.outfield));

    let mut board = Board::new(config.teams);
    let mut rng = config.seed.as_ref().map(DrawSeed::rng);
    for round in queue.chunks(config.teams) {
        board.deal(round, rng.as_mut());
    }

    Ok(TeamAssignment {
        teams: board.teams,
        goalkeeper_constraint_relaxed,
        goalkeepers_required,
        goalkeepers_available,
    })
}

/// Strongest keeper first, declared keepers ahead on equal rating, then id.
fn compare_keepers(a: &Attendee, b: &Attendee) -> Ordering {
    b.profile
        .goalkeeping()
        .total_cmp(&a.profile.goalkeeping())
        .then_with(|| b.prefers_goal().cmp(&a.prefers_goal()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Score every attendee for `role` and order them by that score, highest first.
///
/// The sort is stable, so equal scores keep the incoming order.
fn ranked(attendees: Vec<&Attendee>, role: Role, weights: &RatingWeights) -> Vec<TeamMember> {
    let mut members: Vec<TeamMember> = attendees
        .into_iter()
        .map(|attendee| member(attendee, role, weights))
        .collect();
    members.sort_by(|a, b| b.score.total_cmp(&a.score));
    members
}

fn member(attendee: &Attendee, role: Role, weights: &RatingWeights) -> TeamMember {
    TeamMember {
        id: attendee.id.clone(),
        role,
        score: weights.score(&attendee.profile),
    }
}

/// Teams under construction.
struct Board {
    teams: Vec<Team>,
}

impl Board {
    fn new(teams: usize) -> Self {
        Self {
            teams: vec![Team::default(); teams],
        }
    }

    /// Hand out one round, at most one member per team: strongest member to weakest team.
    fn deal(&mut self, round: &[TeamMember], rng: Option<&mut ChaCha8Rng>) {
        let mut round = round.to_vec();
        round.sort_by(|a, b| b.score.total_cmp(&a.score));

        let destinations = self.weakest_first(rng);
        for (member, team) in round.into_iter().zip(destinations) {
            self.teams[team].push(member);
        }
    }

    /// Team indices by (aggregate score, size). Exact ties go to the seeded generator when
    /// one is supplied, otherwise to the lowest team index.
    fn weakest_first(&self, rng: Option<&mut ChaCha8Rng>) -> Vec<usize> {
        let tie_breaks: Vec<u64> = match rng {
            Some(rng) => (0..self.teams.len()).map(|_| rng.random()).collect(),
            None => (0..self.teams.len() as u64).collect(),
        };

        let mut order: Vec<usize> = (0..self.teams.len()).collect();
        order.sort_by(|&a, &b| {
            let (ta, tb) = (&self.teams[a], &self.teams[b]);
            ta.aggregate_score
                .total_cmp(&tb.aggregate_score)
                .then_with(|| ta.size().cmp(&tb.size()))
                .then_with(|| tie_breaks[a].cmp(&tie_breaks[b]))
        });
        order
    }
}
