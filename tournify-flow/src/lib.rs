//! # Tournify Flow
//!
//! `tournify-flow` is the single authority over the session lifecycle. The
//! [`AuthService`] logs users in, registers accounts, refreshes the cached
//! profile and logs out, keeping persisted credentials and the session store
//! in step.
//!
//! ## Key Components
//!
//! - **[`AuthService`]**: login/register/logout/profile refresh and the post-login redirect.
//! - **[`AuthBackend`]**: the remote side, implemented over HTTP by [`HttpAuthBackend`].

#![warn(missing_docs)]

/// Remote authentication endpoints.
pub mod backend;

pub use backend::{AuthBackend, HttpAuthBackend};

use tournify_client::AuthorizedClient;
use tournify_core::{AuthError, ClientConfig, LoginRequest, RegisterRequest, TokenPayload, User};
use tournify_session::{ReturnUrl, Session};
use tracing::{info, warn};

/// Orchestrates authentication against an [`AuthBackend`].
pub struct AuthService<B = HttpAuthBackend> {
    backend: B,
    session: Session,
    return_url: ReturnUrl,
    post_login_route: String,
}

impl AuthService<HttpAuthBackend> {
    /// Build a service talking HTTP through `client`, sharing its session.
    pub fn from_client(client: AuthorizedClient, return_url: ReturnUrl) -> Self {
        let session = client.session().clone();
        let post_login_route = client.config().post_login_route.clone();
        Self::new(HttpAuthBackend::new(client), session, return_url)
            .with_post_login_route(post_login_route)
    }
}

impl<B: AuthBackend> AuthService<B> {
    /// Create a new `AuthService`.
    pub fn new(backend: B, session: Session, return_url: ReturnUrl) -> Self {
        Self {
            backend,
            session,
            return_url,
            post_login_route: ClientConfig::default().post_login_route,
        }
    }

    /// Set where [`AuthService::login_and_redirect`] goes when no return URL is stored.
    pub fn with_post_login_route(mut self, route: impl Into<String>) -> Self {
        self.post_login_route = route.into();
        self
    }

    /// The session this service manages.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current user.
    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Log in and establish the session.
    ///
    /// On failure the existing session, if any, is left exactly as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = match self.backend.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(e);
            }
        };

        let user = User::from(response.user);
        self.session.establish(&response.token, user.clone())?;
        info!(user_id = %user.id, role = %user.role, "Session established");
        Ok(user)
    }

    /// Log in, then consume the return-URL marker.
    ///
    /// Returns the user and the destination to navigate to: the stored return
    /// URL, or the post-login route when none was stored.
    pub async fn login_and_redirect(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let user = self.login(email, password).await?;
        let destination = self
            .return_url
            .take()
            .unwrap_or_else(|| self.post_login_route.clone());
        Ok((user, destination))
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        let user = match self.backend.register(request).await {
            Ok(response) => response.into_user(),
            Err(e) => {
                warn!(error = %e, "Registration failed");
                return Err(e);
            }
        };
        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Create an account, then log into it.
    pub async fn register_and_login(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        self.register(request).await?;
        self.login(&request.email, &request.password).await
    }

    /// Drop the local session. No server call is made and this never fails.
    pub fn logout(&self) {
        self.session.invalidate();
        info!("Logged out");
    }

    /// Re-fetch the current user and overwrite the cached copy.
    ///
    /// If the session ended while the fetch was in flight, the fetched user is
    /// discarded and [`AuthError::SessionExpired`] is returned.
    pub async fn refresh_profile(&self) -> Result<User, AuthError> {
        let user = User::from(self.backend.fetch_profile().await?);
        self.session.replace_user(user.clone())?;
        info!(user_id = %user.id, role = %user.role, "Profile refreshed");
        Ok(user)
    }

    /// Whether a non-empty token is persisted right now.
    ///
    /// Presence only. Validity is the backend's call, signalled with a 401.
    pub fn is_authenticated(&self) -> bool {
        self.session.has_token()
    }

    /// Claims of the current token, if it is a readable JWT.
    pub fn token_payload(&self) -> Option<TokenPayload> {
        let token = self.session.bearer_token()?;
        TokenPayload::decode_unverified(&token).ok()
    }
}
