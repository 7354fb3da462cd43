//! Account service - registration, sessions, onboarding and profile

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AccountId, Credentials, ImageRef, ImageUpload, LogEvent, NewAccount, Profile,
};
use crate::ports::{AccountRepository, AssetHost, CredentialStore, Diagnostics, TokenService};

/// Default lifetime of an issued token
pub fn default_token_ttl() -> Duration {
    Duration::days(1)
}

/// Outcome of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub account_id: AccountId,
    pub onboarding_required: bool,
}

/// Service for the account lifecycle
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenService>,
    assets: Arc<dyn AssetHost>,
    diagnostics: Arc<dyn Diagnostics>,
    token_ttl: Duration,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenService>,
        assets: Arc<dyn AssetHost>,
        diagnostics: Arc<dyn Diagnostics>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            accounts,
            credentials,
            tokens,
            assets,
            diagnostics,
            token_ttl,
        }
    }

    /// Create an account that still has to go through onboarding
    #[instrument(skip_all)]
    pub fn register(&self, credentials: Credentials) -> Result<AccountId> {
        let credentials = credentials.validate()?;

        if self
            .accounts
            .find_account_by_email(&credentials.email)?
            .is_some()
        {
            return Err(Error::conflict("an account with this email already exists"));
        }

        let password_hash = self.credentials.hash(&credentials.password)?;
        // Insert still fails with Conflict if another registration won the race
        let id = self.accounts.insert_account(&NewAccount {
            email: credentials.email,
            password_hash,
        })?;

        debug!(account = %id, "registered account");
        Ok(id)
    }

    /// Verify credentials and issue a token for the account
    #[instrument(skip_all)]
    pub fn login(&self, credentials: Credentials) -> Result<LoginResult> {
        let credentials = credentials.validate()?;

        let account = self
            .accounts
            .find_account_by_email(&credentials.email)?
            .ok_or_else(|| Error::unauthenticated("invalid email or password"))?;

        if !self
            .credentials
            .verify(&credentials.password, &account.password_hash)?
        {
            return Err(Error::unauthenticated("invalid email or password"));
        }

        let token = self.tokens.issue(account.id, self.token_ttl)?;
        debug!(account = %account.id, "issued token");

        Ok(LoginResult {
            token,
            account_id: account.id,
            onboarding_required: account.onboarding_required,
        })
    }

    /// Resolve a token to the account it was issued for
    pub fn authenticate(&self, token: &str) -> Result<AccountId> {
        self.tokens.verify(token)
    }

    /// Finish onboarding, optionally choosing a display name.
    ///
    /// A blank name leaves the current one untouched. Safe to repeat.
    #[instrument(skip(self, display_name))]
    pub fn complete_onboarding(&self, id: AccountId, display_name: Option<&str>) -> Result<()> {
        let name = display_name.map(str::trim).filter(|n| !n.is_empty());
        self.accounts.finish_onboarding(id, name)
    }

    /// Skip onboarding without touching the display name
    #[instrument(skip(self))]
    pub fn mark_onboarding_done(&self, id: AccountId) -> Result<()> {
        self.accounts.finish_onboarding(id, None)
    }

    /// Whether the account still has to complete onboarding
    pub fn onboarding_required(&self, id: AccountId) -> Result<bool> {
        Ok(self.require_account(id)?.onboarding_required)
    }

    pub fn get_profile(&self, id: AccountId) -> Result<Profile> {
        Ok(self.require_account(id)?.profile())
    }

    #[instrument(skip(self, display_name))]
    pub fn update_display_name(&self, id: AccountId, display_name: &str) -> Result<()> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("display name cannot be empty"));
        }
        self.accounts.set_display_name(id, name)
    }

    /// Upload a new profile picture, removing the previous one first.
    ///
    /// Failing to delete the previous asset is reported to diagnostics and
    /// does not stop the replacement.
    #[instrument(skip(self, file))]
    pub fn replace_image(&self, id: AccountId, file: Option<ImageUpload>) -> Result<ImageRef> {
        let file = file.ok_or_else(|| Error::invalid_input("no file supplied"))?;
        if file.bytes.is_empty() {
            return Err(Error::invalid_input("uploaded file is empty"));
        }

        let account = self.require_account(id)?;

        if let Some(previous) = &account.image {
            if let Err(e) = self.assets.delete(&previous.public_id) {
                self.diagnostics.warn(
                    LogEvent::new("image_delete_failed")
                        .with_error(e.to_string())
                        .with_error_details(format!(
                            "host={} public_id={}",
                            self.assets.name(),
                            previous.public_id
                        )),
                );
            }
        }

        let image = self.assets.upload(&file)?;
        self.accounts.set_image(id, &image)?;

        debug!(account = %id, public_id = %image.public_id, "replaced profile image");
        Ok(image)
    }

    fn require_account(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .find_account(id)?
            .ok_or_else(|| Error::not_found(format!("account {}", id)))
    }
}
