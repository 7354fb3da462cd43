//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod asset_host;
mod auth;
mod clock;
mod diagnostics;
mod repository;

pub use asset_host::AssetHost;
pub use auth::{CredentialStore, TokenService};
pub use clock::Clock;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use repository::{AccountRepository, EntryRepository};
