use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

/// The bearer credential shared by every request issued through one
/// [`ApiClient`](crate::ApiClient).
///
/// Reads are lock-free and happen at send time, so swapping the token is
/// visible to every request issued afterwards while requests already in
/// flight keep the header they were built with.
#[derive(Debug, Default)]
pub struct BearerCredential {
    token: ArcSwapOption<SecretString>,
}

impl BearerCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the token. `None` clears it.
    pub fn set(&self, token: Option<SecretString>) {
        self.token.store(token.map(Arc::new));
    }

    pub fn clear(&self) {
        self.token.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.token.load().is_some()
    }

    /// The `Authorization` header value for the current token, if any.
    pub(crate) fn header_value(&self) -> Option<HeaderValue> {
        let guard = self.token.load();
        let token = guard.as_ref()?;
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}
