use std::collections::HashMap;
use std::hash::Hash;
use tournify_core::UserRole;

/// Who may enter a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users holding one of these roles. An empty list behaves as `Authenticated`.
    Roles(Vec<UserRole>),
}

/// Static access configuration of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// Who may enter.
    pub access: Access,
    /// Where to send signed-in users lacking the role, instead of the global unauthorized route.
    pub denied_redirect: Option<String>,
}

impl RouteRule {
    /// Open to everyone.
    pub fn public() -> Self {
        Self {
            access: Access::Public,
            denied_redirect: None,
        }
    }

    /// Open to any signed-in user.
    pub fn authenticated() -> Self {
        Self {
            access: Access::Authenticated,
            denied_redirect: None,
        }
    }

    /// Open to signed-in users holding one of `roles`.
    pub fn roles(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self {
            access: Access::Roles(roles.into_iter().collect()),
            denied_redirect: None,
        }
    }

    /// Send unauthorized users to `route` instead of the global unauthorized route.
    pub fn with_denied_redirect(mut self, route: impl Into<String>) -> Self {
        self.denied_redirect = Some(route.into());
        self
    }

    /// The roles required, or `None` when any signed-in user (or anyone) qualifies.
    pub fn required_roles(&self) -> Option<&[UserRole]> {
        match &self.access {
            Access::Roles(roles) if !roles.is_empty() => Some(roles),
            _ => None,
        }
    }
}

/// Association between route identifiers and their access rules.
///
/// `R` is whatever the application uses to name routes: an enum, a `&'static str`.
#[derive(Debug, Clone)]
pub struct RouteTable<R> {
    rules: HashMap<R, RouteRule>,
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }
}

impl<R: Eq + Hash> RouteTable<R> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule of `route`.
    pub fn route(mut self, route: R, rule: RouteRule) -> Self {
        self.insert(route, rule);
        self
    }

    /// Add or replace the rule of `route` in place.
    pub fn insert(&mut self, route: R, rule: RouteRule) {
        self.rules.insert(route, rule);
    }

    /// The rule of `route`, if configured.
    pub fn rule(&self, route: &R) -> Option<&RouteRule> {
        self.rules.get(route)
    }
}

/// Routes of the tournament application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// Landing page.
    Landing,
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// "You lack privileges" page.
    Unauthorized,
    /// Personal dashboard.
    Dashboard,
    /// Tournament listing and detail pages.
    Tournaments,
    /// Tournament creation.
    CreateTournament,
    /// Joining a tournament as a team.
    JoinTournament,
    /// Team management.
    Teams,
    /// Administration area.
    Admin,
}

impl AppRoute {
    /// The access rules of the application routes.
    pub fn table() -> RouteTable<AppRoute> {
        RouteTable::new()
            .route(AppRoute::Landing, RouteRule::public())
            .route(AppRoute::Login, RouteRule::public())
            .route(AppRoute::Register, RouteRule::public())
            .route(AppRoute::Unauthorized, RouteRule::public())
            .route(AppRoute::Dashboard, RouteRule::authenticated())
            .route(AppRoute::Tournaments, RouteRule::authenticated())
            .route(
                AppRoute::CreateTournament,
                RouteRule::roles([UserRole::Organizer, UserRole::Admin]),
            )
            .route(AppRoute::JoinTournament, RouteRule::authenticated())
            .route(AppRoute::Teams, RouteRule::authenticated())
            .route(
                AppRoute::Admin,
                RouteRule::roles([UserRole::Admin]).with_denied_redirect("/home"),
            )
    }
}
