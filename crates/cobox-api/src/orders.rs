// Delivery order endpoints

use futures::future::try_join_all;

use crate::ApiClient;
use crate::error::Error;
use crate::models::{CompleteOrderRequest, CreateOrderRequest, Order};

impl ApiClient {
    /// `GET api/v1/orders`
    pub async fn list_orders(&self) -> Result<Vec<Order>, Error> {
        self.get_list("api/v1/orders").await
    }

    /// `GET api/v1/orders/{id}`
    pub async fn get_order(&self, id: i64) -> Result<Order, Error> {
        self.get(&format!("api/v1/orders/{id}")).await
    }

    /// Fetch several orders concurrently, one request per id.
    ///
    /// Results keep the order of `ids`. The first failure fails the whole
    /// batch; there is no partial result.
    pub async fn get_orders_by_ids(&self, ids: &[i64]) -> Result<Vec<Order>, Error> {
        try_join_all(ids.iter().map(|&id| self.get_order(id))).await
    }

    /// `POST api/v1/orders`
    pub async fn create_order(&self, req: &CreateOrderRequest) -> Result<Order, Error> {
        self.post("api/v1/orders", req).await
    }

    /// Request the `ReadyForDispatch` transition.
    ///
    /// `PATCH api/v1/orders/{id}/ready-for-dispatch` (no body)
    pub async fn mark_order_ready(&self, id: i64) -> Result<Order, Error> {
        self.patch_empty(&format!("api/v1/orders/{id}/ready-for-dispatch"))
            .await
    }

    /// Record proof of delivery for an order on a route.
    ///
    /// `PATCH api/v1/orders/{id}/completed`
    pub async fn complete_order(
        &self,
        id: i64,
        req: &CompleteOrderRequest,
    ) -> Result<Order, Error> {
        self.patch(&format!("api/v1/orders/{id}/completed"), req)
            .await
    }
}
