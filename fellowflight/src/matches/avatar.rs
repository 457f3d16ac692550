//! Avatar resolution strategies
//!
//! The match service does not provide pictures, so the avatar shown on a match card is chosen
//! by the client. Normalization delegates that choice to an `AvatarSource`.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::normalize::MatchKind;
use super::wire::RawProfile;

/// Chooses the avatar reference for a matched traveller
pub trait AvatarSource {
    fn avatar_for(&self, profile: &RawProfile, kind: MatchKind) -> String;
}

impl<T: AvatarSource + ?Sized> AvatarSource for &T {
    fn avatar_for(&self, profile: &RawProfile, kind: MatchKind) -> String {
        (**self).avatar_for(profile, kind)
    }
}

/// Deterministic avatar: the initials of the traveller's name
///
/// `"Jane Smith"` becomes `"JS"`, names with more than two words use the first and the last one.
/// Blank names map to `"?"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialsAvatar;

impl AvatarSource for InitialsAvatar {
    fn avatar_for(&self, profile: &RawProfile, _kind: MatchKind) -> String {
        let mut words = profile.name.split_whitespace();
        let first = words.next();
        let last = words.next_back();

        let initials: String = [first, last]
            .into_iter()
            .flatten()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            "?".to_owned()
        } else {
            initials
        }
    }
}

const PORTRAITS_URL: &str = "https://randomuser.me/api/portraits";

/// Random stock portrait
///
/// Seeded instances always hand out the same sequence of portraits.
#[derive(Debug)]
pub struct RandomPortrait {
    rng: Mutex<StdRng>,
}

impl RandomPortrait {
    /// Portraits seeded from the OS entropy source
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPortrait {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarSource for RandomPortrait {
    fn avatar_for(&self, _profile: &RawProfile, _kind: MatchKind) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let group = if rng.random_bool(0.5) { "women" } else { "men" };
        let id: u8 = rng.random_range(0..100);
        format!("{PORTRAITS_URL}/{group}/{id}.jpg")
    }
}
