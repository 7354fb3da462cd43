//! Moodlog Core - business logic for a personal mood and sleep journal
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Entry) and the error taxonomy
//! - **ports**: Trait definitions for external dependencies (repositories,
//!   credential store, token service, asset host, clock, diagnostics)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, argon2, JWT, Cloudinary, ...)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::argon2::Argon2CredentialStore;
use adapters::clock::SystemClock;
use adapters::cloudinary::CloudinaryAssetHost;
use adapters::duckdb::DuckDbRepository;
use adapters::jwt::JwtTokenService;
use adapters::local_assets::LocalAssetHost;
use config::{AssetHostConfig, Config};
use ports::{AssetHost, Diagnostics};
use services::{AccountService, JournalService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, ErrorKind, OperationResult};
pub use domain::{
    AccountId, Credentials, EntryId, EntryInput, EntryView, ImageRef, ImageUpload, LogEvent,
    Profile,
};
pub use services::{
    EntryPoint, EventCount, LogEntry, LogFilter, LoggingService, LoginResult,
};

/// Journal database file name inside the data directory
pub const DB_FILENAME: &str = "moodlog.duckdb";

/// Main context for Moodlog operations
///
/// This is the primary entry point for all business logic. It opens the
/// journal database, loads configuration, and wires the adapters into
/// the services.
pub struct MoodlogContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub repository: Arc<DuckDbRepository>,
    pub account_service: AccountService,
    pub journal_service: JournalService,
}

impl MoodlogContext {
    /// Create a new Moodlog context
    ///
    /// `diagnostics` receives recovered failures (e.g. an old profile image
    /// that could not be deleted).
    pub fn new(data_dir: &Path, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Self::with_config(data_dir, config, diagnostics)
    }

    /// Create a context from an already loaded configuration
    pub fn with_config(
        data_dir: &Path,
        config: Config,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        if config.jwt_secret_is_default {
            tracing::warn!(
                "no JWT secret configured; using the development secret (set {})",
                config::JWT_SECRET_ENV
            );
        }

        let repository = Arc::new(DuckDbRepository::new(&data_dir.join(DB_FILENAME))?);

        // Initialize schema
        repository.ensure_schema()?;

        let assets: Arc<dyn AssetHost> = match &config.assets {
            AssetHostConfig::Local => Arc::new(LocalAssetHost::new(data_dir.join("uploads"))),
            AssetHostConfig::Cloudinary(cloudinary) => {
                Arc::new(CloudinaryAssetHost::new(cloudinary)?)
            }
        };

        let account_service = AccountService::new(
            repository.clone(),
            Arc::new(Argon2CredentialStore::new()),
            Arc::new(JwtTokenService::new(&config.jwt_secret)?),
            assets,
            diagnostics,
            config.token_ttl,
        );
        let journal_service = JournalService::new(repository.clone(), Arc::new(SystemClock));

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            repository,
            account_service,
            journal_service,
        })
    }
}
