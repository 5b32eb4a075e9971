use serde::{Deserialize, Serialize};
use validator::Validate;

/// A fleet vehicle. `id` is assigned by the backend and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: String,
    pub capacity_kg: f64,
    pub vehicle_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub plate_number: String,
    pub capacity_kg: f64,
}
