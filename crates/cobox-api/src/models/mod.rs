// Wire models for every request and response payload.
//
// Response types derive `Deserialize` (their serde shape *is* the schema)
// and `Serialize` so validated values can be re-validated or rendered.
// Request types additionally derive `validator::Validate`.

pub mod auth;
pub mod driver;
pub mod incident;
pub mod order;
pub mod route;
pub mod user;
pub mod vehicle;

pub use auth::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse};
pub use driver::{CreateDriverRequest, Driver, DriverRoute};
pub use incident::{AssignResponsibleRequest, IncidentDetail, IncidentEvent, IncidentSummary};
pub use order::{CompleteOrderRequest, CreateOrderRequest, Order};
pub use route::{
    AddOrderRequest, AssignDriverRequest, AssignVehicleRequest, CreateRouteRequest, OrderRef,
    Route,
};
pub use user::User;
pub use vehicle::{CreateVehicleRequest, Vehicle};
