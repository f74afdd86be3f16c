//! # Tournify
//!
//! Client-side authentication and authorization for the tournify tournament
//! platform. This crate re-exports the workspace crates behind features and,
//! with `flow` and `guard` enabled, wires them together in [`Tournify`].
//!
//! ## Features
//!
//! - `session`: session store, credential persistence, return URL.
//! - `client`: the authorized HTTP channel.
//! - `flow`: login, registration, logout and profile refresh.
//! - `guard`: authentication and role guards.
//! - `full`: all of the above.

#![warn(missing_docs)]

pub use tournify_core as core;
pub use tournify_core::{AuthError, ClientConfig, Navigator, User, UserRole};

#[cfg(feature = "session")]
pub use tournify_session as session;

#[cfg(feature = "client")]
pub use tournify_client as client;

#[cfg(feature = "flow")]
pub use tournify_flow as flow;

#[cfg(feature = "guard")]
pub use tournify_guard as guard;

#[cfg(all(feature = "flow", feature = "guard"))]
mod app {
    use std::sync::Arc;
    use tournify_client::AuthorizedClient;
    use tournify_core::{ClientConfig, Navigator};
    use tournify_flow::AuthService;
    use tournify_guard::{AppRoute, RoleGuard};
    use tournify_session::{CredentialPersistence, KeyValueStorage, ReturnUrl, Session};
    use tracing::info;

    /// The assembled client: one session shared by the HTTP channel, the auth
    /// service and the route guard.
    pub struct Tournify {
        config: ClientConfig,
        session: Session,
        client: AuthorizedClient,
        auth: AuthService,
        guard: RoleGuard<AppRoute>,
    }

    impl Tournify {
        /// Restore the persisted session and build every component around it.
        ///
        /// `durable` holds the token and user across restarts; `session_storage`
        /// holds the return URL, which only needs to survive the login round trip.
        pub fn bootstrap(
            config: ClientConfig,
            durable: Arc<dyn KeyValueStorage>,
            session_storage: Arc<dyn KeyValueStorage>,
            navigator: Arc<dyn Navigator>,
        ) -> Self {
            let session = Session::restore(CredentialPersistence::from_config(durable, &config));
            let return_url = ReturnUrl::from_config(session_storage, &config);
            let guard = RoleGuard::from_config(
                session.store().clone(),
                return_url.clone(),
                AppRoute::table(),
                &config,
            );
            let client = AuthorizedClient::new(config.clone(), session.clone(), navigator);
            let auth = AuthService::from_client(client.clone(), return_url);

            info!(
                api_url = %config.api_url,
                signed_in = session.current_user().is_some(),
                "Tournify client ready"
            );

            Self {
                config,
                session,
                client,
                auth,
                guard,
            }
        }

        /// The configuration in use.
        pub fn config(&self) -> &ClientConfig {
            &self.config
        }

        /// The shared session.
        pub fn session(&self) -> &Session {
            &self.session
        }

        /// The authorized HTTP channel, for domain API calls.
        pub fn client(&self) -> &AuthorizedClient {
            &self.client
        }

        /// The authentication service.
        pub fn auth(&self) -> &AuthService {
            &self.auth
        }

        /// The route guard over [`AppRoute`].
        pub fn guard(&self) -> &RoleGuard<AppRoute> {
            &self.guard
        }
    }
}

#[cfg(all(feature = "flow", feature = "guard"))]
pub use app::Tournify;
