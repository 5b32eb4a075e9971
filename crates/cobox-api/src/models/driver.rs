use serde::{Deserialize, Serialize};
use validator::Validate;

use super::route::OrderRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub licence_number: String,
    pub driver_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(
        min = 9,
        max = 10,
        message = "Licence number must be between 9 and 10 characters"
    ))]
    pub licence_number: String,
}

/// A route as seen from a driver's perspective.
///
/// Unlike [`Route`](super::Route), a driver's routes always have both a
/// vehicle and a driver assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRoute {
    pub id: i64,
    pub title: String,
    pub vehicle_id: i64,
    pub driver_id: i64,
    pub orders_ids: Vec<OrderRef>,
    pub finished_order_ids: Vec<OrderRef>,
    pub route_status: String,
}
