//! Client-side core of the CoBox fleet dashboard.
//!
//! Sits between `cobox-api` and front ends (the `cobox` CLI):
//!
//! - **[`Dashboard`]**: facade owning the API client, the session, the
//!   query cache, and the audit dispatcher.
//! - **[`SessionManager`]**: restore / login / logout, with the bearer
//!   credential swapped before observers see a new state.
//! - **[`QueryCache`]**: per-key freshness windows, stale-while-refetch,
//!   prefix invalidation.
//! - **[`Mutation`]**: every write, with the cache keys it invalidates.
//! - **[`navigation`]**: views, the login guard, and the sidebar.

pub mod audit;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod incident;
pub mod navigation;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use audit::AuditDispatcher;
pub use command::{Mutation, MutationResult};
pub use config::{DEFAULT_API_BASE_URL, DashboardConfig};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use incident::{ReassignRequest, reassignment_message};
pub use navigation::{AuthState, Navigation, View};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionManager, SessionStore, SessionUser,
};
pub use store::{QueryCache, QueryKey, QueryOutcome};

pub use cobox_api::{FlexId, ValidationIssue, ValidationReport};
pub use cobox_api::models;
