//! # Tournify Guard
//!
//! Navigation-time gates. Both guards read the session synchronously and return a
//! terminal [`GuardDecision`]; nothing is retried, the user re-navigates once the
//! underlying condition changes.

use std::fmt::Debug;
use std::hash::Hash;
use tournify_core::ClientConfig;
use tournify_session::{ReturnUrl, SessionStore};
use tracing::{debug, warn};

pub mod route;

pub use route::{Access, AppRoute, RouteRule, RouteTable};

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds.
    Allowed,
    /// Nobody is signed in. The attempted URL has been stored as the return URL.
    DeniedUnauthenticated {
        /// The login route.
        redirect: String,
    },
    /// Signed in, but without a required role.
    DeniedUnauthorized {
        /// The unauthorized route, or the route's own override.
        redirect: String,
    },
}

impl GuardDecision {
    /// Whether navigation proceeds.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allowed)
    }

    /// Where to go instead, when denied.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            GuardDecision::Allowed => None,
            GuardDecision::DeniedUnauthenticated { redirect }
            | GuardDecision::DeniedUnauthorized { redirect } => Some(redirect),
        }
    }
}

/// A predicate consulted before a navigation to `route` at `url` completes.
pub trait CanActivate<R> {
    /// Decide the navigation.
    fn can_activate(&self, route: &R, url: &str) -> GuardDecision;
}

/// Lets signed-in users through; sends everyone else to the login route.
#[derive(Clone, Debug)]
pub struct AuthGuard {
    store: SessionStore,
    return_url: ReturnUrl,
    login_route: String,
}

impl AuthGuard {
    /// Create a new `AuthGuard`.
    pub fn new(store: SessionStore, return_url: ReturnUrl, login_route: impl Into<String>) -> Self {
        Self {
            store,
            return_url,
            login_route: login_route.into(),
        }
    }

    /// Create a guard redirecting to the login route of `config`.
    pub fn from_config(store: SessionStore, return_url: ReturnUrl, config: &ClientConfig) -> Self {
        Self::new(store, return_url, config.login_route.clone())
    }

    /// Allow iff a user is signed in. On denial, remember `url` for after login.
    pub fn check(&self, url: &str) -> GuardDecision {
        if self.store.is_present() {
            GuardDecision::Allowed
        } else {
            self.deny(url)
        }
    }

    fn deny(&self, url: &str) -> GuardDecision {
        if let Err(e) = self.return_url.store(url) {
            warn!(error = %e, "Failed to store return URL");
        }
        debug!(%url, "Navigation requires authentication");
        GuardDecision::DeniedUnauthenticated {
            redirect: self.login_route.clone(),
        }
    }
}

impl<R> CanActivate<R> for AuthGuard {
    fn can_activate(&self, _route: &R, url: &str) -> GuardDecision {
        self.check(url)
    }
}

/// Checks the signed-in user's role against the route's rule.
///
/// Routes without a rule, and rules without roles, only require a signed-in user.
#[derive(Clone, Debug)]
pub struct RoleGuard<R> {
    auth: AuthGuard,
    routes: RouteTable<R>,
    unauthorized_route: String,
}

impl<R: Eq + Hash + Debug> RoleGuard<R> {
    /// Create a new `RoleGuard`.
    pub fn new(
        auth: AuthGuard,
        routes: RouteTable<R>,
        unauthorized_route: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            routes,
            unauthorized_route: unauthorized_route.into(),
        }
    }

    /// Create a guard using the routes of `config`.
    pub fn from_config(
        store: SessionStore,
        return_url: ReturnUrl,
        routes: RouteTable<R>,
        config: &ClientConfig,
    ) -> Self {
        Self::new(
            AuthGuard::from_config(store, return_url, config),
            routes,
            config.unauthorized_route.clone(),
        )
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable<R> {
        &self.routes
    }

    /// Decide a navigation to `route` at `url`.
    pub fn check(&self, route: &R, url: &str) -> GuardDecision {
        let rule = self.routes.rule(route);
        if matches!(rule.map(|r| &r.access), Some(Access::Public)) {
            return GuardDecision::Allowed;
        }

        // One read of the latest value; the receiver is dropped right after.
        let user = self.auth.store.watch().borrow().clone();
        let Some(user) = user else {
            return self.auth.deny(url);
        };

        match rule.and_then(RouteRule::required_roles) {
            None => GuardDecision::Allowed,
            Some(roles) if user.has_any_role(roles) => GuardDecision::Allowed,
            Some(roles) => {
                warn!(?route, role = %user.role, required = ?roles, "Access denied");
                let redirect = rule
                    .and_then(|r| r.denied_redirect.clone())
                    .unwrap_or_else(|| self.unauthorized_route.clone());
                GuardDecision::DeniedUnauthorized { redirect }
            }
        }
    }
}

impl<R: Eq + Hash + Debug> CanActivate<R> for RoleGuard<R> {
    fn can_activate(&self, route: &R, url: &str) -> GuardDecision {
        self.check(route, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tournify_core::{User, UserRole};
    use tournify_session::MemoryStorage;

    fn user(role: UserRole) -> User {
        User {
            id: "u1".into(),
            username: "someone".into(),
            email: "s@x.com".into(),
            first_name: None,
            last_name: None,
            role,
            avatar_url: None,
        }
    }

    fn setup() -> (SessionStore, ReturnUrl, RoleGuard<AppRoute>) {
        let config = ClientConfig::default();
        let store = SessionStore::default();
        let return_url = ReturnUrl::from_config(Arc::new(MemoryStorage::new()), &config);
        let guard = RoleGuard::from_config(
            store.clone(),
            return_url.clone(),
            AppRoute::table(),
            &config,
        );
        (store, return_url, guard)
    }

    #[test]
    fn auth_guard_denies_anonymous_and_remembers_last_url() {
        let (store, return_url, _) = setup();
        let config = ClientConfig::default();
        let guard = AuthGuard::from_config(store.clone(), return_url.clone(), &config);

        let decision = guard.check("/tournaments/7");
        assert_eq!(
            decision,
            GuardDecision::DeniedUnauthenticated {
                redirect: "/login".into()
            }
        );
        assert_eq!(return_url.peek().as_deref(), Some("/tournaments/7"));

        guard.check("/dashboard");
        assert_eq!(return_url.take().as_deref(), Some("/dashboard"));
        assert_eq!(return_url.take(), None);

        store.set(Some(user(UserRole::Player)));
        assert!(guard.check("/dashboard").is_allowed());
        assert_eq!(return_url.peek(), None);
    }

    #[test]
    fn role_guard_checks_membership() {
        let (store, _, guard) = setup();

        store.set(Some(user(UserRole::Player)));
        let decision = guard.check(&AppRoute::CreateTournament, "/tournaments/create");
        assert_eq!(
            decision,
            GuardDecision::DeniedUnauthorized {
                redirect: "/unauthorized".into()
            }
        );

        store.set(Some(user(UserRole::Organizer)));
        assert!(guard
            .check(&AppRoute::CreateTournament, "/tournaments/create")
            .is_allowed());
    }

    #[test]
    fn role_guard_sends_anonymous_users_to_login() {
        let (_, return_url, guard) = setup();
        let decision = guard.check(&AppRoute::Admin, "/admin/users");
        assert_eq!(decision.redirect(), Some("/login"));
        assert_eq!(return_url.peek().as_deref(), Some("/admin/users"));
    }

    #[test]
    fn routes_without_roles_only_need_a_session() {
        let (store, _, guard) = setup();
        assert!(!guard.check(&AppRoute::Dashboard, "/dashboard").is_allowed());

        store.set(Some(user(UserRole::Referee)));
        assert!(guard.check(&AppRoute::Dashboard, "/dashboard").is_allowed());
        assert!(guard.check(&AppRoute::Teams, "/teams/my-teams").is_allowed());
    }

    #[test]
    fn unknown_routes_degrade_to_authentication() {
        let config = ClientConfig::default();
        let store = SessionStore::default();
        let return_url = ReturnUrl::from_config(Arc::new(MemoryStorage::new()), &config);
        let routes = RouteTable::new()
            .route("open", RouteRule::public())
            .route("empty", RouteRule::roles([]));
        let guard = RoleGuard::from_config(store.clone(), return_url, routes, &config);

        assert!(guard.check(&"open", "/open").is_allowed());
        assert!(!guard.check(&"elsewhere", "/elsewhere").is_allowed());
        assert!(!guard.check(&"empty", "/empty").is_allowed());

        store.set(Some(user(UserRole::Player)));
        assert!(guard.check(&"elsewhere", "/elsewhere").is_allowed());
        assert!(guard.check(&"empty", "/empty").is_allowed());
    }

    #[test]
    fn public_routes_skip_the_session() {
        let (_, return_url, guard) = setup();
        assert!(guard.check(&AppRoute::Landing, "/").is_allowed());
        assert!(guard.check(&AppRoute::Login, "/login").is_allowed());
        assert_eq!(return_url.peek(), None);
    }

    #[test]
    fn admin_area_uses_its_own_denial_route() {
        let (store, _, guard) = setup();
        store.set(Some(user(UserRole::Organizer)));
        assert_eq!(
            guard.can_activate(&AppRoute::Admin, "/admin"),
            GuardDecision::DeniedUnauthorized {
                redirect: "/home".into()
            }
        );

        store.set(Some(user(UserRole::Admin)));
        assert!(guard.can_activate(&AppRoute::Admin, "/admin").is_allowed());
    }
}
