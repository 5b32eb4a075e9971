// ── Incident responsible reassignment ──
//
// Local prechecks run before any request; each failure carries the
// notice shown to the user. Backend rejections are mapped to notices by
// status.

use chrono::{DateTime, SecondsFormat, Utc};
use cobox_api::FlexId;
use cobox_api::models::IncidentEvent;

use crate::error::CoreError;

pub const NO_USER_SELECTED: &str = "Select a user from the list.";
pub const ALREADY_ASSIGNED: &str = "The incident is already assigned to this user.";
pub const REASON_REQUIRED: &str = "Please provide a reason for the reassignment.";
pub const DEFAULT_FAILURE: &str = "Could not assign responsible";

/// A reassignment as entered by the user.
#[derive(Debug, Clone)]
pub struct ReassignRequest {
    pub incident_id: FlexId,
    /// Responsible user before the change, as last seen by the client.
    pub current_responsible: Option<FlexId>,
    /// User picked from the search results.
    pub selected_user: Option<FlexId>,
    pub reason: String,
}

/// Check `req` locally. Returns the selected user on success.
pub fn precheck(req: &ReassignRequest) -> Result<FlexId, CoreError> {
    let Some(selected) = req.selected_user.clone() else {
        return Err(CoreError::domain(NO_USER_SELECTED));
    };
    if req.current_responsible.as_ref() == Some(&selected) {
        return Err(CoreError::domain(ALREADY_ASSIGNED));
    }
    if req.reason.trim().is_empty() {
        return Err(CoreError::domain(REASON_REQUIRED));
    }
    Ok(selected)
}

/// Notice for a failed reassignment.
pub fn reassignment_message(err: &CoreError) -> String {
    match err {
        CoreError::Domain { message } => message.clone(),
        CoreError::Api { status: 403, .. } => {
            "You do not have permission to reassign this incident.".into()
        }
        CoreError::Api { status: 409, .. } => {
            "Incident changed meanwhile. Please refresh and try again.".into()
        }
        CoreError::Api { status: 422, .. } => {
            "Provided data is invalid. Check the selected user.".into()
        }
        CoreError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
        _ => DEFAULT_FAILURE.into(),
    }
}

/// Audit record for a completed reassignment.
pub fn reassignment_event(
    req: &ReassignRequest,
    new_responsible: FlexId,
    changed_by: Option<i64>,
    at: DateTime<Utc>,
) -> IncidentEvent {
    IncidentEvent {
        incident_id: req.incident_id.clone(),
        old_responsible_user_id: req.current_responsible.clone(),
        new_responsible_user_id: new_responsible,
        changed_by: changed_by.map(FlexId::from),
        reason: Some(req.reason.trim().to_owned()),
        timestamp: Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}
