// Async HTTP client for the CoBox backend.
//
// Base URL: configured origin (e.g. http://localhost:8000/)
// Auth: `Authorization: Bearer <token>` once a session token is attached

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use validator::Validate;

use crate::auth::BearerCredential;
use crate::error::Error;
use crate::schema::{check_request, parse_body, parse_list};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Status and body of a response, before schema validation.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: reqwest::StatusCode,
    pub text: String,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the CoBox REST API.
///
/// One instance is shared (behind an `Arc`) by every service call. The
/// bearer token lives in a [`BearerCredential`] that login and logout
/// swap in place.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credential: BearerCredential,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client bound to `base_url`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            credential: BearerCredential::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Credential ───────────────────────────────────────────────────

    /// Attach (or with `None`, detach) the bearer token for every
    /// subsequently issued request.
    pub fn set_token(&self, token: Option<SecretString>) {
        self.credential.set(token);
    }

    pub fn clear_token(&self) {
        self.credential.clear();
    }

    pub fn has_token(&self) -> bool {
        self.credential.is_set()
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Transport ────────────────────────────────────────────────────

    /// Issue one request and read its body, whatever the status.
    pub(crate) async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(auth) = self.credential.header_value() {
            req = req.header(AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok(RawResponse { status, text })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let raw = self.send::<()>(Method::GET, path, &[], None).await?;
        parse_body(&success_text(raw)?)
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        self.get_list_with_params(path, &[]).await
    }

    pub(crate) async fn get_list_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let raw = self.send::<()>(Method::GET, path, params, None).await?;
        parse_list(&success_text(raw)?)
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Validate + Sync,
    {
        check_request(body)?;
        let raw = self.send(Method::POST, path, &[], Some(body)).await?;
        parse_body(&success_text(raw)?)
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Validate + Sync,
    {
        check_request(body)?;
        let raw = self.send(Method::PATCH, path, &[], Some(body)).await?;
        parse_body(&success_text(raw)?)
    }

    /// PATCH without a request body (state transitions).
    pub(crate) async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let raw = self.send::<()>(Method::PATCH, path, &[], None).await?;
        parse_body(&success_text(raw)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.has_token())
            .finish_non_exhaustive()
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Body of a 2xx response, or the normalized HTTP error.
pub(crate) fn success_text(raw: RawResponse) -> Result<String, Error> {
    if raw.status.is_success() {
        Ok(raw.text)
    } else {
        Err(parse_error(raw))
    }
}

fn parse_error(raw: RawResponse) -> Error {
    let fallback = || {
        raw.status
            .canonical_reason()
            .map_or_else(|| raw.status.to_string(), str::to_owned)
    };
    let message = serde_json::from_str::<ErrorResponse>(&raw.text)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(fallback);

    Error::Http {
        status: raw.status.as_u16(),
        message,
        body: raw.text,
    }
}

/// Parse the configured origin and make sure relative joins append to it.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}
