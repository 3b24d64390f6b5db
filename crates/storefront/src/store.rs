//! Persisted state containers.
//!
//! A [`PersistedStore`] owns one piece of client state and writes it to a
//! [`KeyValueStorage`] after every transition. The transition itself is a
//! pure method on the state type ([`StoreState::apply`]), so state logic is
//! testable without any storage at all.
//!
//! # Persisted layout
//!
//! ```json
//! { "state": { ... }, "version": 0 }
//! ```
//!
//! stored under the state type's fixed [`StoreState::STORAGE_KEY`].

use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::storage::{KeyValueStorage, StorageError};

/// State that can live inside a [`PersistedStore`].
pub trait StoreState: Serialize + DeserializeOwned + Default + Clone {
    /// Fixed storage key (e.g. `cart-storage`).
    const STORAGE_KEY: &'static str;

    /// Schema version written alongside the state.
    const VERSION: u32;

    /// Transitions accepted by [`StoreState::apply`].
    type Action: Debug;

    /// Apply one transition in place. Must not perform I/O.
    fn apply(&mut self, action: Self::Action);

    /// Restore invariants on freshly decoded state. Called by [`decode`].
    fn normalize(&mut self) {}
}

#[derive(Serialize)]
struct EnvelopeRef<'a, S> {
    state: &'a S,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<S> {
    state: S,
    version: u32,
}

/// Serialize `state` into its persisted envelope.
///
/// # Errors
///
/// Returns an error if the state cannot be serialized.
pub fn encode<S: StoreState>(state: &S) -> Result<String, StorageError> {
    let envelope = EnvelopeRef {
        state,
        version: S::VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a persisted envelope back into state.
///
/// # Errors
///
/// Returns an error if the payload is not a valid envelope or was written
/// with a different schema version.
pub fn decode<S: StoreState>(raw: &str) -> Result<S, StorageError> {
    let envelope: Envelope<S> = serde_json::from_str(raw)?;
    if envelope.version != S::VERSION {
        return Err(StorageError::VersionMismatch {
            key: S::STORAGE_KEY.to_owned(),
            stored: envelope.version,
            expected: S::VERSION,
        });
    }
    let mut state = envelope.state;
    state.normalize();
    Ok(state)
}

/// A state container that persists after every transition.
pub struct PersistedStore<S: StoreState> {
    state: S,
    storage: Arc<dyn KeyValueStorage>,
}

impl<S: StoreState> PersistedStore<S> {
    /// Create a store in its initial state without reading storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            state: S::default(),
            storage,
        }
    }

    /// Create a store from whatever is persisted under its key.
    ///
    /// An absent key yields the initial state. Unreadable, corrupt, or
    /// foreign-version data is logged and replaced by the initial state.
    #[must_use]
    #[instrument(skip(storage), fields(key = S::STORAGE_KEY))]
    pub fn rehydrate(storage: Arc<dyn KeyValueStorage>) -> Self {
        let state = match storage.get(S::STORAGE_KEY) {
            Ok(Some(raw)) => decode::<S>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable persisted state");
                S::default()
            }),
            Ok(None) => {
                tracing::debug!("No persisted state, starting fresh");
                S::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted state");
                S::default()
            }
        };
        Self { state, storage }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply a transition, then persist the resulting state.
    pub fn dispatch(&mut self, action: S::Action) {
        tracing::debug!(key = S::STORAGE_KEY, ?action, "Applying store action");
        self.state.apply(action);
        self.persist();
    }

    /// Write the current state to storage.
    ///
    /// Persistence is best-effort: failures are logged and otherwise
    /// ignored, and the in-memory state stays authoritative.
    fn persist(&self) {
        let result = encode(&self.state).and_then(|raw| self.storage.set(S::STORAGE_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!(key = S::STORAGE_KEY, error = %e, "Failed to persist state");
        }
    }
}

impl<S: StoreState + Debug> Debug for PersistedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &S::STORAGE_KEY)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
