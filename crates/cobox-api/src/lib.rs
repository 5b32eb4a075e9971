// cobox-api: Async Rust client for the CoBox fleet and logistics REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod schema;
pub mod transport;

mod drivers;
mod events;
mod iam;
mod incidents;
mod orders;
mod routes;
mod users;
mod vehicles;

pub use auth::BearerCredential;
pub use client::ApiClient;
pub use error::Error;
pub use events::INCIDENT_RESPONSIBLE_ASSIGNED;
pub use schema::{FlexId, ValidationIssue, ValidationReport};
pub use transport::TransportConfig;
