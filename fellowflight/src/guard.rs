//! Session-gated navigation
//!
//! The guard has no memory: its state is recomputed from the session store on every navigation
//! event, and the only effect it ever has is a redirect to one of the canonical routes.

use std::fmt;

use tracing::{debug, info};

use crate::session::{Session, SessionStore};

/// Canonical destinations of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing / sign-in screen
    Entry,
    /// Onboarding form
    Onboarding,
    /// Match list
    Matches,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Entry, Route::Onboarding, Route::Matches];

    /// Path the route is served under
    pub fn path(self) -> &'static str {
        match self {
            Route::Entry => "/",
            Route::Onboarding => "/form",
            Route::Matches => "/matches",
        }
    }

    /// Resolves a location to a canonical route
    ///
    /// Query string, fragment and a trailing slash are ignored. Unknown paths yield `None`.
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Authorization state derived from a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No access token
    Unauthenticated,
    /// Signed in, onboarding not completed
    OnboardingPending,
    /// Signed in and onboarded
    Ready,
}

impl GuardState {
    pub fn from_session(session: &Session) -> Self {
        match session {
            Session {
                access_token: None, ..
            } => Self::Unauthenticated,
            Session {
                onboarding_complete: Some(true),
                ..
            } => Self::Ready,
            _ => Self::OnboardingPending,
        }
    }

    /// The only route a client in this state may stay on
    pub fn required_destination(self) -> Route {
        match self {
            Self::Unauthenticated => Route::Entry,
            Self::OnboardingPending => Route::Onboarding,
            Self::Ready => Route::Matches,
        }
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Current route may be rendered
    Allow,
    /// Navigation to the route is required before anything renders
    Redirect(Route),
}

/// Navigation side effect
pub trait Navigator {
    /// Replaces the current location with `route`
    fn redirect(&mut self, route: Route);
}

/// Navigator recording redirects instead of performing them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    pub redirects: Vec<Route>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&mut self, route: Route) {
        self.redirects.push(route);
    }
}

/// Maps (session, current route) to a required redirect
#[derive(Debug, Clone)]
pub struct NavigationGuard<S> {
    sessions: S,
}

impl<S: SessionStore> NavigationGuard<S> {
    pub fn new(sessions: S) -> Self {
        Self { sessions }
    }

    /// Fresh session read
    pub fn session(&self) -> Session {
        self.sessions.read()
    }

    /// Current guard state
    pub fn state(&self) -> GuardState {
        GuardState::from_session(&self.session())
    }

    /// Decides whether `location` may be shown without performing any navigation
    pub fn evaluate(&self, location: &str) -> Decision {
        decide(self.state(), location)
    }

    /// Evaluates the guard for a navigation event, redirecting through `navigator` if needed
    pub fn on_navigation(&self, location: &str, navigator: &mut impl Navigator) -> Decision {
        self.on_navigation_with(&self.session(), location, navigator)
    }

    /// Like `on_navigation`, deciding on an already read `session`
    pub fn on_navigation_with(
        &self,
        session: &Session,
        location: &str,
        navigator: &mut impl Navigator,
    ) -> Decision {
        let state = GuardState::from_session(session);
        let decision = decide(state, location);
        match decision {
            Decision::Allow => debug!(location, ?state, "Navigation allowed"),
            Decision::Redirect(route) => {
                info!(location, ?state, %route, "Redirecting");
                navigator.redirect(route);
            }
        }
        decision
    }
}

fn decide(state: GuardState, location: &str) -> Decision {
    let required = state.required_destination();
    if Route::from_location(location) == Some(required) {
        Decision::Allow
    } else {
        Decision::Redirect(required)
    }
}
