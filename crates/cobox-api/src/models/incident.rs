use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::{FlexId, non_null, nullable};

/// Incident as listed in `GET api/incidents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    pub id: FlexId,
    pub title: String,
    pub status: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<Option<FlexId>>,
}

impl IncidentSummary {
    pub fn responsible(&self) -> Option<&FlexId> {
        self.responsible_user_id.as_ref()?.as_ref()
    }
}

/// Full incident. Fields this client does not know about are kept in
/// `extra` so a detail survives a serialize/parse round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetail {
    pub id: FlexId,
    pub title: String,
    pub status: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<Option<FlexId>>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl IncidentDetail {
    pub fn responsible(&self) -> Option<&FlexId> {
        self.responsible_user_id.as_ref()?.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignResponsibleRequest {
    pub new_responsible_user_id: FlexId,
}

/// Audit record emitted after a responsible user is reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IncidentEvent {
    pub incident_id: FlexId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_responsible_user_id: Option<FlexId>,
    pub new_responsible_user_id: FlexId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<FlexId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detail_normalizes_ids_and_keeps_unknown_fields() {
        let raw = json!({
            "id": 12,
            "title": "Flat tyre",
            "status": "OPEN",
            "responsibleUserId": 4,
            "priority": "HIGH"
        });
        let detail: IncidentDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.id.as_str(), "12");
        assert_eq!(detail.responsible(), Some(&FlexId::from("4")));
        assert_eq!(detail.extra["priority"], "HIGH");

        let again: IncidentDetail =
            serde_json::from_value(serde_json::to_value(&detail).unwrap()).unwrap();
        assert_eq!(again, detail);
    }

    #[test]
    fn summary_accepts_null_responsible() {
        let raw = json!({"id": "a1", "title": "t", "status": "NEW", "responsibleUserId": null});
        let summary: IncidentSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.responsible_user_id, Some(None));
        assert!(summary.responsible().is_none());
        assert_eq!(serde_json::to_value(&summary).unwrap()["responsibleUserId"], json!(null));

        let absent: IncidentSummary =
            serde_json::from_value(json!({"id": "a1", "title": "t", "status": "NEW"})).unwrap();
        assert_eq!(absent.responsible_user_id, None);
        assert!(serde_json::to_value(&absent).unwrap().get("responsibleUserId").is_none());
    }

    #[test]
    fn detail_rejects_null_for_non_nullable_fields() {
        let raw = json!({"id": 1, "title": "t", "status": "NEW", "description": null});
        assert!(serde_json::from_value::<IncidentDetail>(raw).is_err());
    }
}
