// Identity & access endpoints
//
// Sign-in and sign-up fail with `Error::Authentication` rather than the
// generic HTTP error. The message carries the status and the raw response
// text.

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::ApiClient;
use crate::error::Error;
use crate::models::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse};
use crate::schema::{check_request, parse_body};

impl ApiClient {
    /// Exchange credentials for a session token.
    ///
    /// `POST api/v1/authentication/sign-in`
    pub async fn sign_in(&self, req: &SignInRequest) -> Result<SignInResponse, Error> {
        check_request(req)?;
        self.authenticate("sign-in", "api/v1/authentication/sign-in", req)
            .await
    }

    /// Register a new staff account.
    ///
    /// `POST api/v1/authentication/sign-up`
    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpResponse, Error> {
        check_request(req)?;
        self.authenticate("sign-up", "api/v1/authentication/sign-up", req)
            .await
    }

    async fn authenticate<T, B>(&self, action: &str, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let raw = self.send(Method::POST, path, &[], Some(body)).await?;
        let status = raw.status.as_u16();

        if !raw.text.trim().is_empty()
            && serde_json::from_str::<serde_json::Value>(&raw.text).is_err()
        {
            return Err(Error::Authentication {
                message: format!("invalid JSON from {action} (HTTP {status}): {}", raw.text),
            });
        }

        if !raw.status.is_success() {
            return Err(Error::Authentication {
                message: format!("{action} failed (HTTP {status}): {}", raw.text),
            });
        }

        parse_body(&raw.text).map_err(|e| Error::Authentication {
            message: format!(
                "{action} response failed validation ({e}); raw response: {}",
                raw.text
            ),
        })
    }
}
