//! FellowFlight travel matching client core
//!
//! Gates screens on the persisted session, fetches and normalizes travel matches and offers
//! fuzzy airport suggestions for the onboarding form.

pub mod airports;
pub mod autocomplete;
pub mod guard;
pub mod matches;
pub mod onboarding;
pub mod session;

pub use airports::{AirportIndex, AirportRecord};
pub use autocomplete::AutocompleteController;
pub use guard::{Decision, GuardState, NavigationGuard, Navigator, Route};
pub use matches::{MatchClient, MatchesView, NormalizedMatch};
pub use session::{Session, SessionMarkers, SessionReader, SessionStore};
