// ── Dashboard facade ──
//
// Single entry point for consumers: session lifecycle, guarded
// navigation, cached reads, and mutations with their invalidation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cobox_api::models::{
    AddOrderRequest, AssignDriverRequest, AssignResponsibleRequest, AssignVehicleRequest, Driver,
    DriverRoute, IncidentDetail, IncidentSummary, Order, Route, SignUpRequest, SignUpResponse,
    User, Vehicle,
};
use cobox_api::{ApiClient, FlexId, TransportConfig};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::audit::AuditDispatcher;
use crate::command::{Mutation, MutationResult};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::incident::{ReassignRequest, precheck, reassignment_event};
use crate::navigation::{self, AuthState, Navigation, View};
use crate::session::{Session, SessionManager, SessionStore};
use crate::store::key::{self, MIN_SEARCH_LEN, stale};
use crate::store::{QueryCache, QueryKey, QueryOutcome};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    api: Arc<ApiClient>,
    session: SessionManager,
    cache: Arc<QueryCache>,
    audit: AuditDispatcher,
}

impl Dashboard {
    /// Build a dashboard bound to the configured backend. Does not touch
    /// the session store: call [`restore_session()`](Self::restore_session).
    pub fn new(config: DashboardConfig, store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let api = Arc::new(ApiClient::new(&config.api_base_url, &transport)?);
        Ok(Self {
            inner: Arc::new(DashboardInner {
                session: SessionManager::new(Arc::clone(&api), store),
                audit: AuditDispatcher::new(Arc::clone(&api)),
                cache: QueryCache::new(),
                api,
                config,
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    pub fn audit(&self) -> &AuditDispatcher {
        &self.inner.audit
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn restore_session(&self) -> Option<Arc<Session>> {
        self.inner.session.restore()
    }

    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        self.inner.session.login(email, password).await
    }

    /// Sign out and forget every cached read.
    pub fn logout(&self) {
        self.inner.session.logout();
        self.inner.cache.clear();
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, req: &SignUpRequest) -> Result<SignUpResponse, CoreError> {
        let created = self.inner.api.sign_up(req).await?;
        info!(user = %created.email, "account registered");
        Ok(created)
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState::of(self.inner.session.current().as_deref())
    }

    /// Route to `view` under the current session.
    pub fn navigate(&self, view: View) -> Navigation {
        navigation::guard(self.auth_state(), view)
    }

    /// Sidebar entries for the current session; empty when signed out.
    pub fn sidebar(&self) -> Vec<View> {
        self.inner
            .session
            .current()
            .map(|s| navigation::sidebar(&s))
            .unwrap_or_default()
    }

    // ── Reads ────────────────────────────────────────────────────────
    //
    // Detail queries are disabled while no id is selected; id 0 counts as
    // unselected.

    async fn cached<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        call: F,
    ) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: FnOnce(Arc<ApiClient>) -> Fut,
        Fut: Future<Output = Result<T, cobox_api::Error>> + Send + 'static,
    {
        let api = Arc::clone(&self.inner.api);
        self.inner
            .cache
            .fetch(key, stale_time, move || {
                let fut = call(api);
                async move { fut.await.map_err(CoreError::from) }
            })
            .await
    }

    pub async fn vehicles(&self) -> Result<Arc<Vec<Vehicle>>, CoreError> {
        self.cached(key::vehicles(), stale::VEHICLES, |api| async move {
            api.list_vehicles().await
        })
        .await
    }

    pub async fn vehicle(&self, id: Option<i64>) -> Result<QueryOutcome<Vehicle>, CoreError> {
        let Some(id) = chosen_id(id) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(key::vehicle(id), stale::VEHICLE, move |api| async move {
            api.get_vehicle(id).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    pub async fn drivers(&self) -> Result<Arc<Vec<Driver>>, CoreError> {
        self.cached(key::drivers(), stale::DRIVERS, |api| async move {
            api.list_drivers().await
        })
        .await
    }

    pub async fn driver(&self, id: Option<i64>) -> Result<QueryOutcome<Driver>, CoreError> {
        let Some(id) = chosen_id(id) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(key::driver(id), stale::DRIVER, move |api| async move {
            api.get_driver(id).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    pub async fn driver_routes(
        &self,
        driver_id: Option<i64>,
    ) -> Result<QueryOutcome<Vec<DriverRoute>>, CoreError> {
        let Some(id) = chosen_id(driver_id) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(
            key::driver_routes(id),
            stale::DRIVER_ROUTES,
            move |api| async move { api.list_driver_routes(id).await },
        )
        .await
        .map(QueryOutcome::Ready)
    }

    pub async fn orders(&self) -> Result<Arc<Vec<Order>>, CoreError> {
        self.cached(key::orders(), stale::ORDERS, |api| async move {
            api.list_orders().await
        })
        .await
    }

    pub async fn order(&self, id: Option<i64>) -> Result<QueryOutcome<Order>, CoreError> {
        let Some(id) = chosen_id(id) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(key::order(id), stale::ORDERS, move |api| async move {
            api.get_order(id).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    /// Orders of a route, fetched concurrently. Disabled for an empty list.
    pub async fn orders_by_ids(&self, ids: &[i64]) -> Result<QueryOutcome<Vec<Order>>, CoreError> {
        if ids.is_empty() {
            return Ok(QueryOutcome::Disabled);
        }
        let owned = ids.to_vec();
        self.cached(key::orders_by_ids(ids), stale::ORDERS, move |api| async move {
            api.get_orders_by_ids(&owned).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    pub async fn routes(&self) -> Result<Arc<Vec<Route>>, CoreError> {
        self.cached(key::routes(), stale::ROUTES, |api| async move {
            api.list_routes().await
        })
        .await
    }

    pub async fn route(&self, id: Option<i64>) -> Result<QueryOutcome<Route>, CoreError> {
        let Some(id) = chosen_id(id) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(key::route(id), stale::ROUTES, move |api| async move {
            api.get_route(id).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    pub async fn incidents(&self) -> Result<Arc<Vec<IncidentSummary>>, CoreError> {
        self.cached(key::incidents(), stale::INCIDENTS, |api| async move {
            api.list_incidents().await
        })
        .await
    }

    pub async fn incident(
        &self,
        id: Option<FlexId>,
    ) -> Result<QueryOutcome<IncidentDetail>, CoreError> {
        let Some(id) = id.filter(|id| !id.as_str().is_empty()) else {
            return Ok(QueryOutcome::Disabled);
        };
        self.cached(key::incident(&id), stale::INCIDENT, move |api| async move {
            api.get_incident(&id).await
        })
        .await
        .map(QueryOutcome::Ready)
    }

    /// User lookup for the reassignment dialog. Terms shorter than two
    /// characters (after trimming) are not sent.
    pub async fn search_users(&self, term: &str) -> Result<QueryOutcome<Vec<User>>, CoreError> {
        let term = term.trim().to_owned();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Ok(QueryOutcome::Disabled);
        }
        self.cached(
            key::user_search(&term),
            stale::USER_SEARCH,
            move |api| async move { api.search_users(&term).await },
        )
        .await
        .map(QueryOutcome::Ready)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Run `mutation`, then invalidate the keys it declares.
    pub async fn execute(&self, mutation: Mutation) -> Result<MutationResult, CoreError> {
        let api = &self.inner.api;
        let result = match &mutation {
            Mutation::CreateVehicle(req) => api.create_vehicle(req).await.map(MutationResult::Vehicle),
            Mutation::CreateDriver(req) => api.create_driver(req).await.map(MutationResult::Driver),
            Mutation::CreateOrder(req) => api.create_order(req).await.map(MutationResult::Order),
            Mutation::MarkOrderReady { order_id } => {
                api.mark_order_ready(*order_id).await.map(MutationResult::Order)
            }
            Mutation::CompleteOrder { order_id, proof } => api
                .complete_order(*order_id, proof)
                .await
                .map(MutationResult::Order),
            Mutation::CreateRoute(req) => api.create_route(req).await.map(MutationResult::Route),
            Mutation::AddOrderToRoute { route_id, order_id } => api
                .add_order_to_route(*route_id, &AddOrderRequest { order_id: *order_id })
                .await
                .map(MutationResult::Route),
            Mutation::AssignVehicle {
                route_id,
                vehicle_id,
            } => api
                .assign_vehicle(
                    *route_id,
                    &AssignVehicleRequest {
                        vehicle_id: *vehicle_id,
                    },
                )
                .await
                .map(MutationResult::Route),
            Mutation::AssignDriver {
                route_id,
                driver_id,
            } => api
                .assign_driver(
                    *route_id,
                    &AssignDriverRequest {
                        driver_id: *driver_id,
                    },
                )
                .await
                .map(MutationResult::Route),
            Mutation::MarkRouteInProgress { route_id } => api
                .mark_route_in_progress(*route_id)
                .await
                .map(MutationResult::Route),
            Mutation::AssignIncidentResponsible {
                incident_id,
                user_id,
            } => api
                .assign_responsible(
                    incident_id,
                    &AssignResponsibleRequest {
                        new_responsible_user_id: user_id.clone(),
                    },
                )
                .await
                .map(MutationResult::Incident),
        }?;

        for prefix in mutation.invalidates() {
            self.inner.cache.invalidate(&prefix);
        }
        debug!(?mutation, "mutation applied");
        Ok(result)
    }

    /// Reassign an incident's responsible user.
    ///
    /// Prechecks run first and fail without any request. On success the
    /// incident caches are invalidated and an audit event is queued; its
    /// delivery does not affect the result.
    pub async fn reassign_responsible(
        &self,
        req: &ReassignRequest,
    ) -> Result<IncidentDetail, CoreError> {
        let selected = precheck(req)?;
        let mutation = Mutation::AssignIncidentResponsible {
            incident_id: req.incident_id.clone(),
            user_id: selected.clone(),
        };
        let MutationResult::Incident(updated) = self.execute(mutation).await? else {
            return Err(CoreError::Internal(
                "reassignment returned a non-incident result".into(),
            ));
        };

        let actor = self.inner.session.current().map(|s| s.user.id);
        let mut event = reassignment_event(req, selected, actor, Utc::now());
        event.incident_id = updated.id.clone();
        self.inner.audit.emit(event);

        Ok(updated)
    }
}

fn chosen_id(id: Option<i64>) -> Option<i64> {
    id.filter(|&id| id != 0)
}
