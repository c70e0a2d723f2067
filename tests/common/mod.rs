#![allow(dead_code)]

pub mod proptest_prelude;

use futebol_back::balancer::{Attendee, AttendeeId, AttendeePool, Position, SkillProfile};
use proptest::prelude::*;

/// Any rating on the accepted scale, in half-point steps like the club's rating sheet.
pub fn rating() -> impl Strategy<Value = f64> {
    (0u8..=20).prop_map(|steps| f64::from(steps) / 2.0)
}

pub fn position() -> impl Strategy<Value = Option<Position>> {
    prop_oneof![
        Just(None),
        Just(Some(Position::Goalkeeper)),
        Just(Some(Position::Defender)),
        Just(Some(Position::Midfielder)),
        Just(Some(Position::Forward)),
    ]
}

/// Ratings plus preferred position of one attendee; the id is assigned by [`pool`].
pub fn attendee_parts() -> impl Strategy<Value = ([f64; 6], Option<Position>)> {
    (prop::array::uniform6(rating()), position())
}

pub fn build_attendee(index: usize, ratings: [f64; 6], position: Option<Position>) -> Attendee {
    let id = AttendeeId::new(format!("p{index:02}")).unwrap();
    let [shooting, passing, dribbling, defense, physical, goalkeeping] = ratings;
    let profile = SkillProfile::new(
        &id,
        shooting,
        passing,
        dribbling,
        defense,
        physical,
        goalkeeping,
    )
    .unwrap();
    Attendee::new(id, profile, position)
}

/// Attendees with distinct ids `p00`, `p01`, ..
pub fn attendees(size: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<Attendee>> {
    prop::collection::vec(attendee_parts(), size).prop_map(|parts| {
        parts
            .into_iter()
            .enumerate()
            .map(|(index, (ratings, position))| build_attendee(index, ratings, position))
            .collect()
    })
}

pub fn pool_of(attendees: Vec<Attendee>) -> AttendeePool {
    AttendeePool::try_from(attendees).unwrap()
}
