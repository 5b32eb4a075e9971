// Driver endpoints

use crate::ApiClient;
use crate::error::Error;
use crate::models::{CreateDriverRequest, Driver, DriverRoute};

impl ApiClient {
    /// `GET api/v1/drivers`
    pub async fn list_drivers(&self) -> Result<Vec<Driver>, Error> {
        self.get_list("api/v1/drivers").await
    }

    /// `GET api/v1/drivers/{id}`
    pub async fn get_driver(&self, id: i64) -> Result<Driver, Error> {
        self.get(&format!("api/v1/drivers/{id}")).await
    }

    /// Register a driver. The licence number is checked locally first;
    /// a rejected payload never reaches the network.
    ///
    /// `POST api/v1/drivers`
    pub async fn create_driver(&self, req: &CreateDriverRequest) -> Result<Driver, Error> {
        self.post("api/v1/drivers", req).await
    }

    /// Routes assigned to one driver.
    ///
    /// `GET api/v1/drivers/{id}/routes`
    pub async fn list_driver_routes(&self, driver_id: i64) -> Result<Vec<DriverRoute>, Error> {
        self.get_list(&format!("api/v1/drivers/{driver_id}/routes"))
            .await
    }
}
