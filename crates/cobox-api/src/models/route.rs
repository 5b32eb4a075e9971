use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::nullable;

/// Reference to an order inside a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: i64,
}

/// A delivery route. An order reference sits in exactly one of
/// `orders_ids` (pending) or `finished_order_ids`; the backend enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Option<i64>>,
    pub orders_ids: Vec<OrderRef>,
    pub finished_order_ids: Vec<OrderRef>,
    pub route_status: String,
}

impl Route {
    pub fn vehicle(&self) -> Option<i64> {
        self.vehicle_id.flatten()
    }

    pub fn driver(&self) -> Option<i64> {
        self.driver_id.flatten()
    }

    /// Ids of every order on the route, pending first, then finished.
    pub fn all_order_ids(&self) -> Vec<i64> {
        self.orders_ids
            .iter()
            .chain(&self.finished_order_ids)
            .map(|r| r.order_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateRouteRequest {
    pub title: String,
}

pub type AddOrderRequest = OrderRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignVehicleRequest {
    pub vehicle_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverRequest {
    pub driver_id: i64,
}
