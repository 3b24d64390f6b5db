//! Integration tests for Corner Shop.
//!
//! Tests drive the storefront the way a front end does: one [`AppState`]
//! per session, persisted to a throwaway directory so sessions can be
//! restarted against the same data.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p corner-shop-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use corner_shop_storefront::config::StorefrontConfig;
use corner_shop_storefront::state::AppState;
use corner_shop_storefront::storage::FileStorage;
use tempfile::TempDir;

/// A storage directory that outlives individual sessions.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a fresh, empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration pointing at this context's directory, without delays.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: self.data_dir().to_path_buf(),
            ..StorefrontConfig::default()
        }
        .without_delays()
    }

    /// Start a session, rehydrating whatever earlier sessions persisted.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built.
    #[must_use]
    pub fn session(&self) -> AppState {
        let storage = Arc::new(FileStorage::new(self.data_dir()));
        AppState::new(self.config(), storage).expect("Failed to build app state")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
