//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod entry;
mod event;
pub mod result;

pub use account::{
    Account, AccountId, Credentials, ImageRef, ImageUpload, NewAccount, Profile,
    DEFAULT_DISPLAY_NAME, PLACEHOLDER_IMAGE_URL,
};
pub use entry::{Entry, EntryId, EntryInput, EntryView, NewEntry, RETENTION_LIMIT};
pub use event::LogEvent;
