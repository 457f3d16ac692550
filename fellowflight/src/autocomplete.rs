//! Airport autocomplete for the onboarding form

use std::path::Path;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::airports::{self, AirportIndex, AirportRecord, BuildReport};

/// Number of suggestions offered
pub const SUGGESTION_LIMIT: usize = 5;

/// Queries shorter than this never produce suggestions
pub const MIN_QUERY_CHARS: usize = 2;

/// Turns keystrokes into airport suggestions
///
/// The index is installed once, possibly after the controller started receiving queries.
/// Until then every query yields no suggestions. Clones share the same index slot.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteController {
    index: Arc<OnceCell<AirportIndex>>,
}

impl AutocompleteController {
    /// Controller waiting for its index
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller with a ready index
    pub fn with_index(index: AirportIndex) -> Self {
        Self {
            index: Arc::new(OnceCell::new_with(Some(index))),
        }
    }

    /// Installs the index; only the first install takes effect
    pub fn install(&self, index: AirportIndex) -> bool {
        match self.index.set(index) {
            Ok(()) => true,
            Err(_) => {
                warn!("Airport index already installed, ignoring");
                false
            }
        }
    }

    /// Builds the index from the reference table at `path` and installs it
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<BuildReport, airports::Error> {
        let (index, report) = AirportIndex::load(path).await?;
        self.install(index);
        Ok(report)
    }

    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    /// Suggestions for the current query, best first
    pub fn on_query_changed(&self, query: &str) -> Vec<AirportRecord> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.index.get() {
            Some(index) => index.search(query, SUGGESTION_LIMIT),
            None => {
                debug!(query, "Airport index not ready yet");
                Vec::new()
            }
        }
    }
}
