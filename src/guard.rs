//! Route guard: pages that need a session redirect to login without one.

use std::fmt;

use crate::session::SessionStore;

/// Every page reachable from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Classify,
    Cameras,
    Objects,
    Prompts,
    Identifications,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Classify => "/classify",
            Self::Cameras => "/cameras",
            Self::Objects => "/objects",
            Self::Prompts => "/prompts",
            Self::Identifications => "/identifications",
            Self::NotFound => "/404",
        }
    }

    /// Resolve a path; unknown paths land on [`Route::NotFound`].
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/classify" => Self::Classify,
            "/cameras" => Self::Cameras,
            "/objects" => Self::Objects,
            "/prompts" => Self::Prompts,
            "/identifications" => Self::Identifications,
            _ => Self::NotFound,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Home | Self::Login | Self::NotFound)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted(Route),
    /// No session: go to `to`, then come back to `return_to` after login.
    Redirect { to: Route, return_to: Route },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Wraps page access with a session check.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn check(&self, route: Route) -> Access {
        if route.requires_auth() && !self.session.is_authenticated() {
            tracing::debug!(%route, "No session, redirecting to login");
            Access::Redirect {
                to: Route::Login,
                return_to: route,
            }
        } else {
            Access::Granted(route)
        }
    }

    /// Run `page` when access is granted.
    pub fn protect<T>(&self, route: Route, page: impl FnOnce() -> T) -> Result<T, Access> {
        match self.check(route) {
            Access::Granted(_) => Ok(page()),
            redirect => Err(redirect),
        }
    }
}
