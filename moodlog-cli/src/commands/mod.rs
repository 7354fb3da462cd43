//! CLI command implementations

pub mod history;
pub mod login;
pub mod logs;
pub mod onboarding;
pub mod profile;
pub mod record;
pub mod register;

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use dialoguer::Password;
use serde::{Deserialize, Serialize};

use moodlog_core::ports::{Diagnostics, TracingDiagnostics};
use moodlog_core::{AccountId, EntryPoint, Error, LoggingService, MoodlogContext};

/// Overrides the session file, e.g. for scripts
pub const TOKEN_ENV: &str = "MOODLOG_TOKEN";

const SESSION_FILE: &str = "session.json";

/// Get the data directory from environment or default
pub fn get_moodlog_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MOODLOG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory; set MOODLOG_DIR")?;
    Ok(home.join(".moodlog"))
}

/// Get the logging service for CLI operations
///
/// Opened once per process. Returns None if logging fails to initialize
/// (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    static LOGGER: OnceLock<Option<Arc<LoggingService>>> = OnceLock::new();
    LOGGER.get_or_init(open_logger).clone()
}

fn open_logger() -> Option<Arc<LoggingService>> {
    let moodlog_dir = get_moodlog_dir().ok()?;
    std::fs::create_dir_all(&moodlog_dir).ok()?;
    match LoggingService::new(&moodlog_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            tracing::debug!(error = %e, "event log unavailable");
            None
        }
    }
}

/// Open the journal with diagnostics routed to the event log when available
pub fn get_context() -> Result<MoodlogContext> {
    let moodlog_dir = get_moodlog_dir()?;
    std::fs::create_dir_all(&moodlog_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", moodlog_dir))?;

    let diagnostics: Arc<dyn Diagnostics> = match get_logger() {
        Some(logger) => logger,
        None => Arc::new(TracingDiagnostics),
    };

    MoodlogContext::new(&moodlog_dir, diagnostics).context("Failed to initialize moodlog")
}

/// Last issued token, kept between invocations
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub account_id: AccountId,
}

fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}

pub fn load_session(dir: &Path) -> Result<Option<Session>> {
    let path = session_path(dir);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let session = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt session file {}; run `mood logout`", path.display()))?;
    Ok(Some(session))
}

pub fn save_session(dir: &Path, session: &Session) -> Result<()> {
    let path = session_path(dir);
    std::fs::write(&path, serde_json::to_string_pretty(session)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Remove the session file; returns whether one existed
pub fn clear_session(dir: &Path) -> Result<bool> {
    let path = session_path(dir);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}

/// Resolve the caller's account from `MOODLOG_TOKEN` or the session file
pub fn require_account(ctx: &MoodlogContext) -> moodlog_core::domain::result::Result<AccountId> {
    let token = match std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => load_session(&ctx.data_dir)
            .map_err(|e| Error::unauthenticated(e.to_string()))?
            .map(|s| s.token)
            .ok_or_else(|| Error::unauthenticated("not logged in; run `mood login`"))?,
    };
    ctx.account_service.authenticate(token.trim())
}

/// Use the given password or prompt for one
pub fn password_or_prompt(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}
