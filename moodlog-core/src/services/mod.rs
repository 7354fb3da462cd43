//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod journal;
pub mod logging;
pub mod migration;

pub use account::{default_token_ttl, AccountService, LoginResult};
pub use journal::JournalService;
pub use logging::{EntryPoint, EventCount, LogEntry, LogFilter, LoggingService};
pub use migration::{MigrationResult, MigrationService};
