//! Matches screen controller

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::avatar::{AvatarSource, InitialsAvatar};
use super::client::{MatchClient, no_matches};
use super::normalize::{NormalizedMatch, Normalizer};
use super::tracker::RequestTracker;
use crate::guard::{Decision, NavigationGuard, Navigator, Route};
use crate::session::SessionStore;

/// Result of a single `MatchesView::load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Guard redirected away before anything was fetched
    Redirected(Route),
    /// Matches replaced with the given number of records
    Loaded(usize),
    /// Service failed; the list was replaced with an empty one
    Unavailable,
    /// Response arrived after the request was superseded or the view unmounted; discarded
    Stale,
}

/// Drives guard -> fetch -> normalize for the matches screen
pub struct MatchesView<S, A = InitialsAvatar> {
    guard: NavigationGuard<S>,
    client: MatchClient,
    normalizer: Normalizer<A>,
    requests: RequestTracker,
    matches: RwLock<Vec<NormalizedMatch>>,
}

impl<S: SessionStore> MatchesView<S, InitialsAvatar> {
    pub fn new(guard: NavigationGuard<S>, client: MatchClient) -> Self {
        Self::with_normalizer(guard, client, Normalizer::default())
    }
}

impl<S: SessionStore, A: AvatarSource> MatchesView<S, A> {
    pub fn with_normalizer(
        guard: NavigationGuard<S>,
        client: MatchClient,
        normalizer: Normalizer<A>,
    ) -> Self {
        Self {
            guard,
            client,
            normalizer,
            requests: RequestTracker::new(),
            matches: RwLock::new(Vec::new()),
        }
    }

    /// Loads matches of `flight_id` into the view
    ///
    /// The guard is evaluated before any request is issued, so an unauthorized client never
    /// triggers a fetch. The guard decision and the request token come from a single session
    /// read. Only the most recently issued load may update the list.
    #[instrument(skip(self, navigator))]
    pub async fn load(&self, flight_id: i64, navigator: &mut impl Navigator) -> LoadOutcome {
        let session = self.guard.session();
        let decision = self
            .guard
            .on_navigation_with(&session, Route::Matches.path(), navigator);
        if let Decision::Redirect(route) = decision {
            self.requests.cancel();
            return LoadOutcome::Redirected(route);
        }

        // `Allow` on the matches route implies a token is present
        let Some(token) = session.access_token else {
            self.requests.cancel();
            navigator.redirect(Route::Entry);
            return LoadOutcome::Redirected(Route::Entry);
        };

        let ticket = self.requests.issue();
        let result = self.client.fetch_matches(flight_id, &token).await;

        if !self.requests.is_current(ticket) {
            debug!(flight_id, "Discarding stale matches response");
            return LoadOutcome::Stale;
        }

        let (payload, outcome) = match result {
            Ok(payload) => (payload, None),
            Err(err) => (no_matches(&err, flight_id), Some(LoadOutcome::Unavailable)),
        };

        let matches = self.normalizer.normalize(&payload);
        let count = matches.len();
        *self.matches.write().await = matches;

        outcome.unwrap_or(LoadOutcome::Loaded(count))
    }

    /// Marks the view as gone; responses of outstanding loads are discarded
    pub fn unmount(&self) {
        self.requests.cancel();
    }

    /// Currently displayed matches
    pub async fn matches(&self) -> Vec<NormalizedMatch> {
        self.matches.read().await.clone()
    }
}
