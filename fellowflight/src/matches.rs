//! Match retrieval and normalization pipeline
//!
//! `MatchClient` talks to the remote service, `Normalizer` turns its payload into display
//! records and `MatchesView` ties both to the navigation guard for the matches screen.

pub mod avatar;
pub mod client;
pub mod normalize;
pub mod tracker;
pub mod view;
pub mod wire;

pub use avatar::{AvatarSource, InitialsAvatar, RandomPortrait};
pub use client::{ApiConfig, MatchClient, NetworkError};
pub use normalize::{MatchKind, NormalizedMatch, Normalizer, normalize};
pub use tracker::{RequestTracker, Ticket};
pub use view::{LoadOutcome, MatchesView};
pub use wire::{RawMatchPayload, RawProfile};
