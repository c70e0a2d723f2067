use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use super::MatchStore;
use crate::dao::{
    models::MatchTeamsEntity,
    storage::{StorageError, StorageResult},
};

/// Process-local store keeping the latest draw of every match.
///
/// At most `limit` matches are kept; redraws of a known match always succeed.
#[derive(Clone)]
pub struct InMemoryMatchStore {
    teams: Arc<DashMap<Uuid, MatchTeamsEntity>>,
    limit: usize,
}

impl Default for InMemoryMatchStore {
    fn default() -> Self {
        Self::with_capacity(usize::MAX)
    }
}

impl InMemoryMatchStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(limit: usize) -> Self {
        Self {
            teams: Arc::new(DashMap::new()),
            limit,
        }
    }
}

impl MatchStore for InMemoryMatchStore {
    fn save_teams(&self, teams: MatchTeamsEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.teams.clone();
        let limit = self.limit;
        Box::pin(async move {
            if !store.contains_key(&teams.match_id) && store.len() >= limit {
                return Err(StorageError::CapacityExceeded { limit });
            }
            store.insert(teams.match_id, teams);
            Ok(())
        })
    }

    fn find_teams(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<MatchTeamsEntity>>> {
        let store = self.teams.clone();
        Box::pin(async move { Ok(store.get(&match_id).map(|entry| entry.value().clone())) })
    }

    /// A full store is reported unhealthy: new matches can no longer be drawn.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.teams.clone();
        let limit = self.limit;
        Box::pin(async move {
            if store.len() >= limit {
                return Err(StorageError::CapacityExceeded { limit });
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::TeamAssignment;

    fn entity(match_id: Uuid) -> MatchTeamsEntity {
        let assignment = TeamAssignment {
            teams: Vec::new(),
            goalkeeper_constraint_relaxed: false,
            goalkeepers_required: 0,
            goalkeepers_available: 0,
        };
        MatchTeamsEntity::from_assignment(match_id, &assignment, &Default::default())
    }

    #[tokio::test]
    async fn latest_draw_replaces_previous_one() {
        let store = InMemoryMatchStore::new();
        let match_id = Uuid::new_v4();

        let first = entity(match_id);
        let second = entity(match_id);
        store.save_teams(first).await.unwrap();
        store.save_teams(second.clone()).await.unwrap();

        let found = store.find_teams(match_id).await.unwrap().unwrap();
        assert_eq!(found.draw_id, second.draw_id);
    }

    #[tokio::test]
    async fn full_store_refuses_new_matches_but_accepts_redraws() {
        let store = InMemoryMatchStore::with_capacity(1);
        let kept = Uuid::new_v4();
        store.save_teams(entity(kept)).await.unwrap();

        let err = store.save_teams(entity(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded { limit: 1 }));
        assert!(store.health_check().await.is_err());

        let redraw = entity(kept);
        store.save_teams(redraw.clone()).await.unwrap();
        let found = store.find_teams(kept).await.unwrap().unwrap();
        assert_eq!(found.draw_id, redraw.draw_id);
    }

    #[tokio::test]
    async fn unknown_match_has_no_teams() {
        let store = InMemoryMatchStore::new();
        assert!(store.find_teams(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.health_check().await.is_ok());
    }
}
