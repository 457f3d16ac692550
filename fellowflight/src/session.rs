//! Session facts derived from client-persisted markers
//!
//! The markers are owned by the external authentication flow. This module only ever reads them,
//! and it reads them again on every call - nothing here caches a `Session`.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use cookie::{Cookie, CookieJar};
use derivative::Derivative;
use serde::Deserialize;
use tracing::debug;

/// Names of the persisted session markers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct SessionMarkers {
    /// Marker holding the bearer access token
    #[derivative(Default(value = "\"fellowflight_access_token\".to_owned()"))]
    pub access_token: String,

    /// Marker holding `"true"` once onboarding was submitted
    #[derivative(Default(value = "\"fellowflight_form_complete\".to_owned()"))]
    pub onboarding_complete: String,
}

/// Authorization facts of the current client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token issued by the authentication flow
    pub access_token: Option<String>,
    /// Whether the onboarding form was completed
    pub onboarding_complete: Option<bool>,
}

impl Session {
    /// Session of a signed-in client
    pub fn authenticated(token: impl Into<String>, onboarding_complete: bool) -> Self {
        Self {
            access_token: Some(token.into()),
            onboarding_complete: Some(onboarding_complete),
        }
    }

    /// Session without any markers set
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Read-only access to persisted key/value markers
pub trait MarkerStore {
    /// Returns the raw value stored under `name`, if any
    fn marker(&self, name: &str) -> Option<String>;
}

impl MarkerStore for CookieJar {
    fn marker(&self, name: &str) -> Option<String> {
        self.get(name).map(|cookie| cookie.value().to_owned())
    }
}

impl MarkerStore for HashMap<String, String> {
    fn marker(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: MarkerStore + ?Sized> MarkerStore for &T {
    fn marker(&self, name: &str) -> Option<String> {
        (**self).marker(name)
    }
}

impl<T: MarkerStore + ?Sized> MarkerStore for Arc<T> {
    fn marker(&self, name: &str) -> Option<String> {
        (**self).marker(name)
    }
}

impl<T: MarkerStore> MarkerStore for RwLock<T> {
    fn marker(&self, name: &str) -> Option<String> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .marker(name)
    }
}

/// Parses a `Cookie` header (`a=b; c=d`) into a cookie jar
///
/// Values are percent-decoded. Pairs which cannot be parsed are skipped.
pub fn cookie_jar(header: &str) -> CookieJar {
    let mut jar = CookieJar::new();
    for cookie in Cookie::split_parse_encoded(header.to_owned()) {
        match cookie {
            Ok(cookie) => jar.add_original(cookie),
            Err(err) => debug!(%err, "Skipping malformed cookie pair"),
        }
    }
    jar
}

/// Capability producing the current `Session`
pub trait SessionStore {
    fn read(&self) -> Session;
}

impl SessionStore for Session {
    fn read(&self) -> Session {
        self.clone()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn read(&self) -> Session {
        (**self).read()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn read(&self) -> Session {
        (**self).read()
    }
}

/// Derives `Session` from a marker store
#[derive(Debug, Clone)]
pub struct SessionReader<M> {
    store: M,
    markers: SessionMarkers,
}

impl<M: MarkerStore> SessionReader<M> {
    /// Reader using the default marker names
    pub fn new(store: M) -> Self {
        Self::with_markers(store, SessionMarkers::default())
    }

    pub fn with_markers(store: M, markers: SessionMarkers) -> Self {
        Self { store, markers }
    }

    /// Underlying marker store
    pub fn store(&self) -> &M {
        &self.store
    }
}

impl<M: MarkerStore> SessionStore for SessionReader<M> {
    fn read(&self) -> Session {
        let access_token = self
            .store
            .marker(&self.markers.access_token)
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());

        let onboarding_complete = self
            .store
            .marker(&self.markers.onboarding_complete)
            .and_then(|flag| match flag.trim() {
                "true" => Some(true),
                "false" => Some(false),
                other => {
                    debug!(value = other, "Unrecognized onboarding marker value");
                    None
                }
            });

        Session {
            access_token,
            onboarding_complete,
        }
    }
}
