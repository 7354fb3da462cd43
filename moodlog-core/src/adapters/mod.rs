//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the AccountRepository and EntryRepository ports
//! - Argon2 for CredentialStore
//! - JWT (HS256) for TokenService
//! - Cloudinary HTTP client and the local filesystem for AssetHost
//! - System clock for Clock

pub mod argon2;
pub mod clock;
pub mod cloudinary;
pub mod duckdb;
pub mod jwt;
pub mod local_assets;

#[cfg(test)]
pub mod cloudinary_mock;
