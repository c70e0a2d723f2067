//! Match team balancing.
//!
//! A pure computation from an [`AttendeePool`] and a [`DrawConfig`] to a [`TeamAssignment`].
//! Nothing here touches storage, the network or process-wide randomness; callers own
//! persistence and broadcasting of the result.

pub mod assignment;
pub mod config;
pub mod draw;
pub mod error;
pub mod profile;

pub use self::assignment::{Role, Team, TeamAssignment};
pub use self::config::{DrawConfig, DrawSeed, RatingWeights, SkillWeights};
pub use self::draw::draw;
pub use self::error::{DrawError, PoolError};
pub use self::profile::{Attendee, AttendeeId, AttendeePool, Position, SkillProfile};
