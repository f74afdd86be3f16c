//! # Tournify Client
//!
//! `tournify-client` is the single authorized HTTP channel of the application.
//! Every outgoing request passes through [`AuthorizedClient`], which attaches the
//! persisted bearer token and reacts to 401 responses by invalidating the session
//! and routing to the login page, except for the login/register endpoints, where a
//! 401 only means the submitted credentials were wrong.

#![warn(missing_docs)]

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tournify_core::{AuthError, ClientConfig, Navigator};
use tournify_session::Session;
use tracing::{debug, warn};
use url::Url;

pub use reqwest;

/// HTTP client wrapping every request in the authorization pipeline.
#[derive(Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("api_url", &self.config.api_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AuthorizedClient {
    /// Create a client with a default `reqwest::Client`.
    pub fn new(config: ClientConfig, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, session, navigator)
    }

    /// Create a client around an existing `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_http_client(
        http: reqwest::Client,
        config: ClientConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            config: Arc::new(config),
            session,
            navigator,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session this client reads its token from.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve `path` against the API base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.config.api_endpoint(path)
    }

    /// Start a request to `path`. Send it with [`AuthorizedClient::send`].
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AuthError> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    /// Build and send a request through the pipeline.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, AuthError> {
        let request = request
            .build()
            .map_err(|e| AuthError::Config(format!("Invalid request: {e}")))?;
        self.execute(request).await
    }

    /// Send a request through the pipeline.
    ///
    /// Every status is returned to the caller unchanged; only transport failures
    /// become errors. A 401 from a non-auth endpoint additionally invalidates the
    /// session and navigates to the login route before returning.
    pub async fn execute(&self, mut request: Request) -> Result<Response, AuthError> {
        self.authorize(&mut request);
        let exempt = self.config.is_auth_endpoint(request.url());
        let path = request.url().path().to_string();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if exempt {
                debug!(%path, "Auth endpoint answered 401; session left untouched");
            } else {
                self.handle_unauthorized(&path);
            }
        }
        Ok(response)
    }

    fn authorize(&self, request: &mut Request) {
        let Some(token) = self.session.bearer_token() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Stored token is not a valid header value; sending request without it"),
        }
    }

    fn handle_unauthorized(&self, path: &str) {
        warn!(%path, "Request rejected with 401; invalidating session");
        self.session.invalidate();
        self.navigator.navigate(&self.config.login_route);
    }

    /// `GET path`, decoding a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        let request = self.request(Method::GET, path)?;
        let response = self.send(request).await?;
        self.decode(response).await
    }

    /// `POST path` with a JSON body, decoding a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        let response = self.send(request).await?;
        self.decode(response).await
    }

    /// `PUT path` with a JSON body, decoding a JSON response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        let response = self.send(request).await?;
        self.decode(response).await
    }

    /// `DELETE path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), AuthError> {
        let request = self.request(Method::DELETE, path)?;
        let response = self.send(request).await?;
        self.error_for_status(response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, AuthError> {
        let response = self.error_for_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Turn a non-success response into the matching [`AuthError`].
    pub async fn error_for_status(&self, response: Response) -> Result<Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let exempt = self.config.is_auth_endpoint(response.url());
        let body = response.text().await.unwrap_or_default();
        Err(if exempt {
            AuthError::from_auth_status(status, &body)
        } else {
            AuthError::from_api_status(status, &body)
        })
    }
}
