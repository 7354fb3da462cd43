//! Repository ports - persistence abstraction
//!
//! Uniqueness (account email, one entry per account and day) is enforced by
//! the store, not only checked by the services: a violating insert must fail
//! with [`Error::Conflict`](crate::domain::result::Error::Conflict).

use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{Account, AccountId, Entry, EntryId, ImageRef, NewAccount, NewEntry};

/// Account persistence
pub trait AccountRepository: Send + Sync {
    /// Insert a new account with `onboarding_required = true` and the
    /// default display name. Fails with `Conflict` if the email is taken.
    fn insert_account(&self, account: &NewAccount) -> Result<AccountId>;

    /// Get account by ID
    fn find_account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Get account by email (exact match)
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Clear the onboarding flag, optionally overwriting the display name.
    /// Fails with `NotFound` if no account matched.
    fn finish_onboarding(&self, id: AccountId, display_name: Option<&str>) -> Result<()>;

    /// Overwrite the display name. Fails with `NotFound` if no account matched.
    fn set_display_name(&self, id: AccountId, display_name: &str) -> Result<()>;

    /// Store url and public id together. Fails with `NotFound` if no account matched.
    fn set_image(&self, id: AccountId, image: &ImageRef) -> Result<()>;
}

/// Journal entry persistence
pub trait EntryRepository: Send + Sync {
    /// Insert an entry. Fails with `Conflict` if the account already has an
    /// entry on that date.
    fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId>;

    /// Whether the account has an entry on the given date
    fn entry_exists_on(&self, account_id: AccountId, date: NaiveDate) -> Result<bool>;

    /// Up to `limit` entries, newest date first
    fn recent_entries_by_date(&self, account_id: AccountId, limit: usize) -> Result<Vec<Entry>>;

    /// Delete all but the `keep` most recently inserted entries of the
    /// account (highest ids). Returns how many rows were deleted.
    fn prune_entries(&self, account_id: AccountId, keep: usize) -> Result<usize>;
}
