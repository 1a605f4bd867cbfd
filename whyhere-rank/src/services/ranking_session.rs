//! Ranking session: the current priorities, profile and ranked entities
//!
//! Every refresh takes a new generation number under the state lock.
//! Results (success or failure) are applied only while their generation is
//! still the latest, so the last request issued wins even when an older
//! request finishes after it. A failed fetch clears the entity list.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use whyhere_common::config::{DataSource, TomlConfig};
use whyhere_common::entity::{rank_entities, Entity};
use whyhere_common::feature::FeatureKey;
use whyhere_common::fixtures::atlanta_streets;
use whyhere_common::normalize::normalize;
use whyhere_common::priority::PriorityList;
use whyhere_common::profile::{PoiRequest, UserProfile};
use whyhere_common::selection::{Bookmarks, CompareSet};

use super::poi_client::{BackendRequestError, PoiClient};

/// Where a session gets its entities
#[derive(Debug, Clone)]
pub enum EntitySource {
    Mock,
    Backend(PoiClient),
}

impl EntitySource {
    /// Source selected by `data_source`, with a client for the backend
    pub fn from_config(config: &TomlConfig) -> Result<Self, BackendRequestError> {
        match config.data_source {
            DataSource::Mock => Ok(EntitySource::Mock),
            DataSource::Backend => Ok(EntitySource::Backend(PoiClient::new(
                &config.backend_url,
                config.request_timeout(),
            )?)),
        }
    }

    pub fn kind(&self) -> DataSource {
        match self {
            EntitySource::Mock => DataSource::Mock,
            EntitySource::Backend(_) => DataSource::Backend,
        }
    }
}

/// Progress of the latest refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What happened to a refresh's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh was issued before this one completed
    Stale,
}

#[derive(Debug)]
struct SessionState {
    priorities: PriorityList,
    profile: UserProfile,
    /// Sorted by descending fit score
    entities: Vec<Entity>,
    /// Order `entities` was scored under; lags `priorities` while a refresh runs
    ranked_priorities: PriorityList,
    status: FetchStatus,
    last_error: Option<String>,
    degenerate_columns: Vec<FeatureKey>,
    bookmarks: Bookmarks,
    compare: CompareSet,
    /// Incremented on every refresh
    generation: u64,
}

/// Read-only copy of the session for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub priorities: PriorityList,
    pub profile: UserProfile,
    pub source: DataSource,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub entity_count: usize,
    pub degenerate_columns: Vec<FeatureKey>,
    pub bookmarks: Bookmarks,
    pub compare: CompareSet,
    pub generation: u64,
}

/// Single-user ranking session
pub struct RankingSession {
    source: EntitySource,
    state: RwLock<SessionState>,
}

impl RankingSession {
    pub fn new(source: EntitySource, priorities: PriorityList, profile: UserProfile) -> Self {
        Self {
            source,
            state: RwLock::new(SessionState {
                ranked_priorities: priorities.clone(),
                priorities,
                profile,
                entities: Vec::new(),
                status: FetchStatus::Idle,
                last_error: None,
                degenerate_columns: Vec::new(),
                bookmarks: Bookmarks::new(),
                compare: CompareSet::default(),
                generation: 0,
            }),
        }
    }

    pub fn source(&self) -> DataSource {
        self.source.kind()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            priorities: state.priorities.clone(),
            profile: state.profile.clone(),
            source: self.source.kind(),
            status: state.status,
            error: state.last_error.clone(),
            entity_count: state.entities.len(),
            degenerate_columns: state.degenerate_columns.clone(),
            bookmarks: state.bookmarks.clone(),
            compare: state.compare.clone(),
            generation: state.generation,
        }
    }

    /// Ranked entities with the priorities they were ranked under
    ///
    /// While a refresh is in flight this is the last applied ranking and its
    /// own order, not the newly requested one.
    pub async fn ranked(&self) -> (Vec<Entity>, PriorityList) {
        let state = self.state.read().await;
        (state.entities.clone(), state.ranked_priorities.clone())
    }

    pub async fn priorities(&self) -> PriorityList {
        self.state.read().await.priorities.clone()
    }

    pub async fn bookmarks(&self) -> Bookmarks {
        self.state.read().await.bookmarks.clone()
    }

    /// Replace the priority order and refresh
    pub async fn set_priorities(&self, priorities: PriorityList) -> Result<RefreshOutcome, BackendRequestError> {
        let (generation, request) = {
            let mut state = self.state.write().await;
            state.priorities = priorities;
            Self::begin_refresh(&mut state)
        };
        self.complete_refresh(generation, request).await
    }

    /// Replace the user profile and refresh
    pub async fn set_profile(&self, profile: UserProfile) -> Result<RefreshOutcome, BackendRequestError> {
        let (generation, request) = {
            let mut state = self.state.write().await;
            state.profile = profile;
            Self::begin_refresh(&mut state)
        };
        self.complete_refresh(generation, request).await
    }

    /// Refresh with the current priorities and profile
    pub async fn refresh(&self) -> Result<RefreshOutcome, BackendRequestError> {
        let (generation, request) = {
            let mut state = self.state.write().await;
            Self::begin_refresh(&mut state)
        };
        self.complete_refresh(generation, request).await
    }

    /// Toggle a bookmark; returns whether `id` is now bookmarked
    pub async fn toggle_bookmark(&self, id: &str) -> bool {
        self.state.write().await.bookmarks.toggle(id)
    }

    /// Toggle compare membership; returns whether `id` is now compared
    pub async fn toggle_compare(&self, id: &str) -> bool {
        self.state.write().await.compare.toggle(id)
    }

    pub async fn contains_entity(&self, id: &str) -> bool {
        self.state.read().await.entities.iter().any(|e| e.id == id)
    }

    /// Take a new generation and capture the request inputs
    fn begin_refresh(state: &mut SessionState) -> (u64, RefreshRequest) {
        state.generation += 1;
        state.status = FetchStatus::Loading;
        state.last_error = None;
        (
            state.generation,
            RefreshRequest {
                priorities: state.priorities.clone(),
                poi_request: PoiRequest::from_profile(&state.profile, &state.priorities),
            },
        )
    }

    async fn complete_refresh(
        &self,
        generation: u64,
        request: RefreshRequest,
    ) -> Result<RefreshOutcome, BackendRequestError> {
        let fetched = match &self.source {
            EntitySource::Mock => Ok((rank_entities(&atlanta_streets(), &request.priorities), Vec::new())),
            EntitySource::Backend(client) => client.fetch_records(&request.poi_request).await.map(|records| {
                let normalized = normalize(&records, &request.priorities);
                (
                    rank_entities(&normalized.entities, &request.priorities),
                    normalized.degenerate_columns,
                )
            }),
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                generation,
                latest = state.generation,
                failed = fetched.is_err(),
                "Dropping stale refresh result"
            );
            return Ok(RefreshOutcome::Stale);
        }

        match fetched {
            Ok((entities, degenerate_columns)) => {
                info!(generation, entities = entities.len(), "Refresh applied");
                state.entities = entities;
                state.ranked_priorities = request.priorities;
                state.degenerate_columns = degenerate_columns;
                state.status = FetchStatus::Ready;
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                error!(generation, error = %e, "Failed to fetch POI records");
                state.entities.clear();
                state.degenerate_columns.clear();
                state.status = FetchStatus::Failed;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

struct RefreshRequest {
    priorities: PriorityList,
    poi_request: PoiRequest,
}
