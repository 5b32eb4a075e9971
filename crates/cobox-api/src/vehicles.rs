// Vehicle endpoints

use crate::ApiClient;
use crate::error::Error;
use crate::models::{CreateVehicleRequest, Vehicle};

impl ApiClient {
    /// List every vehicle in the fleet.
    ///
    /// `GET api/v1/vehicles`
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        self.get_list("api/v1/vehicles").await
    }

    /// `GET api/v1/vehicles/{id}`
    pub async fn get_vehicle(&self, id: i64) -> Result<Vehicle, Error> {
        self.get(&format!("api/v1/vehicles/{id}")).await
    }

    /// Register a new vehicle.
    ///
    /// `POST api/v1/vehicles`
    pub async fn create_vehicle(&self, req: &CreateVehicleRequest) -> Result<Vehicle, Error> {
        self.post("api/v1/vehicles", req).await
    }
}
