mod memory;

pub use memory::InMemoryMatchStore;

use crate::dao::models::MatchTeamsEntity;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for drawn match compositions.
pub trait MatchStore: Send + Sync {
    /// Store the composition of a match, replacing any previous draw.
    fn save_teams(&self, teams: MatchTeamsEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_teams(&self, match_id: Uuid)
    -> BoxFuture<'static, StorageResult<Option<MatchTeamsEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
