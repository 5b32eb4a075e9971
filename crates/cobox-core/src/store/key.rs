// ── Query keys ──
//
// A key is an ordered list of segments. Invalidation matches by prefix,
// so `fleet/routes` covers every route list and detail below it.

use std::fmt;

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// This key extended by one segment.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` matches this key segment by segment.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

// ── Dashboard keys ───────────────────────────────────────────────────

pub fn vehicles() -> QueryKey {
    QueryKey::new(["fleet", "vehicles"])
}

pub fn vehicle(id: i64) -> QueryKey {
    vehicles().child(id)
}

pub fn drivers() -> QueryKey {
    QueryKey::new(["fleet", "drivers"])
}

pub fn driver(id: i64) -> QueryKey {
    drivers().child(id)
}

pub fn driver_routes(driver_id: i64) -> QueryKey {
    drivers().child(driver_id).child("routes")
}

pub fn routes() -> QueryKey {
    QueryKey::new(["fleet", "routes"])
}

pub fn route(id: i64) -> QueryKey {
    routes().child(id)
}

pub fn orders() -> QueryKey {
    QueryKey::new(["delivery", "orders"])
}

pub fn order(id: i64) -> QueryKey {
    orders().child(id)
}

/// Batch lookup. The id list is part of the identity, in request order.
pub fn orders_by_ids(ids: &[i64]) -> QueryKey {
    let joined: Vec<String> = ids.iter().map(ToString::to_string).collect();
    orders().child("byIds").child(joined.join(","))
}

pub fn incidents() -> QueryKey {
    QueryKey::new(["incidents"])
}

pub fn incident(id: impl fmt::Display) -> QueryKey {
    incidents().child(id)
}

pub fn user_search(term: &str) -> QueryKey {
    QueryKey::new(["users", "search", term])
}

// ── Freshness windows ────────────────────────────────────────────────

/// How long a cached value is served without refetching.
pub mod stale {
    use std::time::Duration;

    pub const VEHICLES: Duration = Duration::from_secs(60);
    pub const VEHICLE: Duration = Duration::from_secs(30);
    pub const DRIVERS: Duration = Duration::from_secs(30);
    pub const DRIVER: Duration = Duration::from_secs(30);
    pub const DRIVER_ROUTES: Duration = Duration::from_secs(30);
    pub const ORDERS: Duration = Duration::from_secs(30);
    pub const ROUTES: Duration = Duration::from_secs(30);
    pub const INCIDENTS: Duration = Duration::from_secs(30);
    pub const INCIDENT: Duration = Duration::from_secs(15);
    pub const USER_SEARCH: Duration = Duration::from_secs(60);
}

/// Shortest user search term that triggers a request.
pub const MIN_SEARCH_LEN: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_per_segment() {
        assert!(driver_routes(7).starts_with(&drivers()));
        assert!(orders_by_ids(&[1, 2]).starts_with(&orders()));
        assert!(incident("10").starts_with(&incidents()));
        assert!(!QueryKey::new(["fleet", "vehicles2"]).starts_with(&vehicles()));
        assert!(!drivers().starts_with(&driver_routes(7)));
    }

    #[test]
    fn keys_render_as_paths() {
        assert_eq!(driver_routes(7).to_string(), "fleet/drivers/7/routes");
        assert_eq!(orders_by_ids(&[3, 1]).to_string(), "delivery/orders/byIds/3,1");
    }
}
