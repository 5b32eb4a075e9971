use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::nullable;

/// A delivery order. Status transitions are owned by the backend; the
/// client only requests them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub address_line: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub reference_latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub reference_longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    pub weight_kg: f64,
    pub order_status: String,
}

impl Order {
    /// Coordinates picked on the map, when both are known.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.reference_latitude
            .flatten()
            .zip(self.reference_longitude.flatten())
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_ref()?.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub client_id: i64,
    pub address_line: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub weight_kg: f64,
}

/// Proof-of-delivery payload for `PATCH api/v1/orders/{id}/completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderRequest {
    pub route_id: i64,
    pub photo_url: String,
    pub receiver_name: String,
    pub signature_data: String,
}
