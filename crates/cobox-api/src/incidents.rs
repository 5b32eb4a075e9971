// Incident endpoints

use crate::ApiClient;
use crate::error::Error;
use crate::models::{AssignResponsibleRequest, IncidentDetail, IncidentSummary};
use crate::schema::FlexId;

impl ApiClient {
    /// `GET api/incidents`
    pub async fn list_incidents(&self) -> Result<Vec<IncidentSummary>, Error> {
        self.get_list("api/incidents").await
    }

    /// `GET api/incidents/{id}`
    pub async fn get_incident(&self, id: &FlexId) -> Result<IncidentDetail, Error> {
        self.get(&format!("api/incidents/{id}")).await
    }

    /// Hand the incident to another user. Returns the updated incident.
    ///
    /// `PATCH api/incidents/{id}/assign-responsible`
    pub async fn assign_responsible(
        &self,
        id: &FlexId,
        req: &AssignResponsibleRequest,
    ) -> Result<IncidentDetail, Error> {
        self.patch(&format!("api/incidents/{id}/assign-responsible"), req)
            .await
    }
}
