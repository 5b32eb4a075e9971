// ── Command API ──
//
// Every write goes through a `Mutation`. Each variant declares the cache
// keys it invalidates; the dashboard invalidates exactly those after a
// successful call and leaves the cache untouched on failure.

use cobox_api::FlexId;
use cobox_api::models::{
    CompleteOrderRequest, CreateDriverRequest, CreateOrderRequest, CreateRouteRequest,
    CreateVehicleRequest, Driver, IncidentDetail, Order, Route, Vehicle,
};

use crate::store::QueryKey;
use crate::store::key;

/// All write operations against the backend.
#[derive(Debug, Clone)]
pub enum Mutation {
    // ── Fleet ────────────────────────────────────────────────────────
    CreateVehicle(CreateVehicleRequest),
    CreateDriver(CreateDriverRequest),

    // ── Delivery ─────────────────────────────────────────────────────
    CreateOrder(CreateOrderRequest),
    MarkOrderReady {
        order_id: i64,
    },
    CompleteOrder {
        order_id: i64,
        proof: CompleteOrderRequest,
    },

    // ── Routes ───────────────────────────────────────────────────────
    CreateRoute(CreateRouteRequest),
    AddOrderToRoute {
        route_id: i64,
        order_id: i64,
    },
    AssignVehicle {
        route_id: i64,
        vehicle_id: i64,
    },
    AssignDriver {
        route_id: i64,
        driver_id: i64,
    },
    MarkRouteInProgress {
        route_id: i64,
    },

    // ── Incidents ────────────────────────────────────────────────────
    AssignIncidentResponsible {
        incident_id: FlexId,
        user_id: FlexId,
    },
}

impl Mutation {
    /// Cache prefixes to drop after this mutation succeeds.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Self::CreateVehicle(_) => vec![key::vehicles()],
            Self::CreateDriver(_) => vec![key::drivers()],
            Self::CreateOrder(_) | Self::MarkOrderReady { .. } | Self::CompleteOrder { .. } => {
                vec![key::orders()]
            }
            Self::CreateRoute(_)
            | Self::AddOrderToRoute { .. }
            | Self::AssignVehicle { .. }
            | Self::AssignDriver { .. }
            | Self::MarkRouteInProgress { .. } => vec![key::routes()],
            Self::AssignIncidentResponsible { incident_id, .. } => {
                vec![key::incidents(), key::incident(incident_id)]
            }
        }
    }

    /// Notice shown after success.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::CreateVehicle(_) => "Vehicle created",
            Self::CreateDriver(_) => "Driver created",
            Self::CreateOrder(_) => "Order created",
            Self::MarkOrderReady { .. } => "Order ready for dispatch",
            Self::CompleteOrder { .. } => "Order completed",
            Self::CreateRoute(_) => "Route created",
            Self::AddOrderToRoute { .. } => "Order added to route",
            Self::AssignVehicle { .. } => "Vehicle assigned to route",
            Self::AssignDriver { .. } => "Driver assigned to route",
            Self::MarkRouteInProgress { .. } => "Route marked in progress",
            Self::AssignIncidentResponsible { .. } => "Responsible updated",
        }
    }

    /// Notice shown after failure when no better message is available.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateVehicle(_) => "Failed to create vehicle",
            Self::CreateDriver(_) => "Failed to create driver",
            Self::CreateOrder(_) => "Failed to create order",
            Self::MarkOrderReady { .. } => "Failed to mark order ready",
            Self::CompleteOrder { .. } => "Failed to complete order",
            Self::CreateRoute(_) => "Failed to create route",
            Self::AddOrderToRoute { .. } => "Failed to add order to route",
            Self::AssignVehicle { .. } => "Failed to assign vehicle",
            Self::AssignDriver { .. } => "Failed to assign driver",
            Self::MarkRouteInProgress { .. } => "Failed to mark route in progress",
            Self::AssignIncidentResponsible { .. } => "Could not assign responsible",
        }
    }
}

/// Entity returned by a successful mutation.
#[derive(Debug, Clone)]
pub enum MutationResult {
    Vehicle(Vehicle),
    Driver(Driver),
    Order(Order),
    Route(Route),
    Incident(IncidentDetail),
}
