//! Backend client and session state for the ranking service

pub mod poi_client;
pub mod ranking_session;

pub use poi_client::{BackendRequestError, PoiClient};
pub use ranking_session::{EntitySource, FetchStatus, RankingSession, RefreshOutcome, SessionSnapshot};
