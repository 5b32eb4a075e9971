// Route endpoints

use crate::ApiClient;
use crate::error::Error;
use crate::models::{
    AddOrderRequest, AssignDriverRequest, AssignVehicleRequest, CreateRouteRequest, Route,
};

impl ApiClient {
    /// `GET api/v1/routes`
    pub async fn list_routes(&self) -> Result<Vec<Route>, Error> {
        self.get_list("api/v1/routes").await
    }

    /// `GET api/v1/routes/{id}`
    pub async fn get_route(&self, id: i64) -> Result<Route, Error> {
        self.get(&format!("api/v1/routes/{id}")).await
    }

    /// `POST api/v1/routes`
    pub async fn create_route(&self, req: &CreateRouteRequest) -> Result<Route, Error> {
        self.post("api/v1/routes", req).await
    }

    /// `POST api/v1/routes/{id}/orders`
    pub async fn add_order_to_route(
        &self,
        route_id: i64,
        req: &AddOrderRequest,
    ) -> Result<Route, Error> {
        self.post(&format!("api/v1/routes/{route_id}/orders"), req)
            .await
    }

    /// `PATCH api/v1/routes/{id}/vehicle`
    pub async fn assign_vehicle(
        &self,
        route_id: i64,
        req: &AssignVehicleRequest,
    ) -> Result<Route, Error> {
        self.patch(&format!("api/v1/routes/{route_id}/vehicle"), req)
            .await
    }

    /// `PATCH api/v1/routes/{id}/driver`
    pub async fn assign_driver(
        &self,
        route_id: i64,
        req: &AssignDriverRequest,
    ) -> Result<Route, Error> {
        self.patch(&format!("api/v1/routes/{route_id}/driver"), req)
            .await
    }

    /// Request the `InProgress` transition.
    ///
    /// `PATCH api/v1/routes/{id}/in-progress` (no body)
    pub async fn mark_route_in_progress(&self, route_id: i64) -> Result<Route, Error> {
        self.patch_empty(&format!("api/v1/routes/{route_id}/in-progress"))
            .await
    }
}
