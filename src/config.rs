//! Configuration for the grocery store
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the snapshot file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── groceries.json      (current snapshot)
    ///     └── groceries.json.tmp  (only present mid-persist)
    pub data_dir: PathBuf,

    /// Which storage variant backs the engine
    pub backend: StorageBackend,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Whether to fsync the snapshot before it replaces the old one
    pub sync_strategy: SyncStrategy,

    /// Load seed data when no valid snapshot exists (otherwise start empty)
    pub seed_on_fallback: bool,
}

/// Storage variant, selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Nothing touches the disk; state lives for the process lifetime
    Memory,

    /// Full snapshot rewritten to `{data_dir}/groceries.json` after every mutation
    File,
}

/// Snapshot sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync the temp file before renaming it into place (safest)
    EveryWrite,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./groceries_data"),
            backend: StorageBackend::File,
            sync_strategy: SyncStrategy::EveryWrite,
            seed_on_fallback: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (where the snapshot file lives)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Select the storage backend
    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the snapshot sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Choose between seed data and an empty list when no snapshot loads
    pub fn seed_on_fallback(mut self, seed: bool) -> Self {
        self.config.seed_on_fallback = seed;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
