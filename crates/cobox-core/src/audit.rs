// ── Audit dispatcher ──
//
// Fire-and-forget emission of audit events. An emission failure is
// logged and counted; it never reaches the caller and is never retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cobox_api::ApiClient;
use cobox_api::models::IncidentEvent;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

pub struct AuditDispatcher {
    api: Arc<ApiClient>,
    tracker: TaskTracker,
    failures: Arc<AtomicU64>,
}

impl AuditDispatcher {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            tracker: TaskTracker::new(),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Queue `event` for publication and return immediately.
    pub fn emit(&self, event: IncidentEvent) {
        let api = Arc::clone(&self.api);
        let failures = Arc::clone(&self.failures);
        self.tracker.spawn(async move {
            match api.publish_incident_event(&event).await {
                Ok(()) => debug!(incident = %event.incident_id, "audit event published"),
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    warn!(incident = %event.incident_id, error = %e, "failed to publish audit event");
                }
            }
        });
    }

    /// Emissions still in flight.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Emissions that failed since startup.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Wait until every queued emission has finished.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
