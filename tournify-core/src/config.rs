use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Per-deployment settings of the client.
///
/// Missing fields fall back to the development preset when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    pub api_url: String,
    /// Durable storage key holding the bearer token.
    pub token_key: String,
    /// Durable storage key holding the serialized user.
    pub user_key: String,
    /// Session-scoped storage key holding the return-URL marker.
    pub return_url_key: String,
    /// Login entry point.
    pub login_route: String,
    /// Destination for authenticated users lacking privilege.
    pub unauthorized_route: String,
    /// Home page.
    pub home_route: String,
    /// Default destination after login when no return URL is stored.
    pub post_login_route: String,
    /// Endpoint paths whose 401 responses mean "wrong credentials" rather than "session expired".
    pub auth_endpoints: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl ClientConfig {
    /// Local backend preset.
    pub fn development() -> Self {
        Self {
            api_url: "http://127.0.0.1:80".to_string(),
            token_key: "tournify_token".to_string(),
            user_key: "tournify_user".to_string(),
            return_url_key: "returnUrl".to_string(),
            login_route: "/login".to_string(),
            unauthorized_route: "/unauthorized".to_string(),
            home_route: "/home".to_string(),
            post_login_route: "/dashboard".to_string(),
            auth_endpoints: vec!["/auth/login".to_string(), "/auth/register".to_string()],
        }
    }

    /// Hosted backend preset.
    pub fn production() -> Self {
        Self {
            api_url: "https://api.tournify.com/api".to_string(),
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            ..Self::development()
        }
    }

    /// Builds a configuration from the process environment.
    ///
    /// `TOURNIFY_ENV=production` selects the production preset; `TOURNIFY_API_URL`,
    /// `TOURNIFY_TOKEN_KEY` and `TOURNIFY_USER_KEY` override individual fields.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("TOURNIFY_ENV").as_deref() {
            Ok("production") => Self::production(),
            _ => Self::development(),
        };
        if let Ok(api_url) = std::env::var("TOURNIFY_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(token_key) = std::env::var("TOURNIFY_TOKEN_KEY") {
            config.token_key = token_key;
        }
        if let Ok(user_key) = std::env::var("TOURNIFY_USER_KEY") {
            config.user_key = user_key;
        }
        config
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Resolves `path` against the API base URL.
    ///
    /// The base may carry its own path prefix (`https://host/api`); `path` is
    /// appended to it rather than replacing its last segment.
    pub fn api_endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let base = self.api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| AuthError::Config(format!("Invalid API URL `{}`: {e}", self.api_url)))
    }

    /// Returns true if `url` targets one of the designated auth endpoints.
    pub fn is_auth_endpoint(&self, url: &Url) -> bool {
        let path = url.path().trim_end_matches('/');
        self.auth_endpoints
            .iter()
            .map(|endpoint| endpoint.trim_end_matches('/'))
            .any(|endpoint| !endpoint.is_empty() && path.ends_with(endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let config = ClientConfig::production();
        let url = config.api_endpoint("/auth/login").unwrap();
        assert_eq!(url.as_str(), "https://api.tournify.com/api/auth/login");

        let config = ClientConfig::development().with_api_url("http://localhost:8080/");
        let url = config.api_endpoint("users/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/users/me");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let config = ClientConfig::development().with_api_url("not a url");
        assert!(matches!(
            config.api_endpoint("auth/login"),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn auth_endpoints_are_recognized_under_a_prefix() {
        let config = ClientConfig::production();
        let login = config.api_endpoint("auth/login").unwrap();
        let register = config.api_endpoint("auth/register/").unwrap();
        let tournaments = config.api_endpoint("tournaments").unwrap();
        assert!(config.is_auth_endpoint(&login));
        assert!(config.is_auth_endpoint(&register));
        assert!(!config.is_auth_endpoint(&tournaments));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_url":"http://backend:9000","token_key":"t"}"#).unwrap();
        assert_eq!(config.api_url, "http://backend:9000");
        assert_eq!(config.token_key, "t");
        assert_eq!(config.user_key, "tournify_user");
        assert_eq!(config.login_route, "/login");
    }

    #[test]
    fn env_overrides_apply_on_top_of_preset() {
        std::env::set_var("TOURNIFY_ENV", "production");
        std::env::set_var("TOURNIFY_TOKEN_KEY", "custom_token");
        let config = ClientConfig::from_env();
        std::env::remove_var("TOURNIFY_ENV");
        std::env::remove_var("TOURNIFY_TOKEN_KEY");

        assert_eq!(config.api_url, "https://api.tournify.com/api");
        assert_eq!(config.token_key, "custom_token");
        assert_eq!(config.user_key, "user");
    }
}
