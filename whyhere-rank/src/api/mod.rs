//! HTTP API handlers for whyhere-rank

pub mod export;
pub mod health;
pub mod session;
pub mod streets;

pub use export::export_csv_download;
pub use health::health_routes;
pub use session::{get_session, put_priorities, put_profile, toggle_bookmark, toggle_compare};
pub use streets::get_streets;
