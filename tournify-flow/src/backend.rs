use async_trait::async_trait;
use tournify_client::AuthorizedClient;
use tournify_core::{
    AuthError, AuthResponse, AuthUser, LoginRequest, RegisterRequest, RegisterResponse,
};

/// Path of the login endpoint, relative to the API base.
pub const LOGIN_PATH: &str = "auth/login";
/// Path of the register endpoint, relative to the API base.
pub const REGISTER_PATH: &str = "auth/register";
/// Path of the current-user endpoint, relative to the API base.
pub const PROFILE_PATH: &str = "users/me";

/// The remote side of authentication.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token and user.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError>;

    /// Create an account.
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError>;

    /// Fetch the user the current token belongs to.
    async fn fetch_profile(&self) -> Result<AuthUser, AuthError>;
}

#[async_trait]
impl<T: AuthBackend + ?Sized> AuthBackend for std::sync::Arc<T> {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        (**self).login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        (**self).register(request).await
    }

    async fn fetch_profile(&self) -> Result<AuthUser, AuthError> {
        (**self).fetch_profile().await
    }
}

/// [`AuthBackend`] speaking to the REST API through the authorized channel.
#[derive(Clone, Debug)]
pub struct HttpAuthBackend {
    client: AuthorizedClient,
}

impl HttpAuthBackend {
    /// Use `client` for every call.
    pub fn new(client: AuthorizedClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &AuthorizedClient {
        &self.client
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        self.client.post_json(LOGIN_PATH, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        self.client.post_json(REGISTER_PATH, request).await
    }

    async fn fetch_profile(&self) -> Result<AuthUser, AuthError> {
        self.client.get_json(PROFILE_PATH).await
    }
}
