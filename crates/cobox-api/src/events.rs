// Audit event endpoint

use reqwest::Method;
use serde::Serialize;

use crate::ApiClient;
use crate::client::success_text;
use crate::error::Error;
use crate::models::IncidentEvent;
use crate::schema::check_request;

/// Event type tag the backend routes on.
pub const INCIDENT_RESPONSIBLE_ASSIGNED: &str = "IncidentResponsibleUserAssigned";

#[derive(Serialize)]
struct TaggedEvent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    event: &'a IncidentEvent,
}

impl ApiClient {
    /// Publish a responsible-user reassignment to the audit log.
    ///
    /// `POST api/events` with body `{"type": "IncidentResponsibleUserAssigned", ...event}`.
    /// The response body is ignored.
    pub async fn publish_incident_event(&self, event: &IncidentEvent) -> Result<(), Error> {
        check_request(event)?;
        let body = TaggedEvent {
            kind: INCIDENT_RESPONSIBLE_ASSIGNED,
            event,
        };
        let raw = self
            .send(Method::POST, "api/events", &[], Some(&body))
            .await?;
        success_text(raw).map(drop)
    }
}
