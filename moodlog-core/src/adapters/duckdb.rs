//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use duckdb::{params, Connection, OptionalExt};

use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AccountId, Entry, EntryId, ImageRef, NewAccount, NewEntry, DEFAULT_DISPLAY_NAME,
};
use crate::migrations::MIGRATIONS;
use crate::ports::{AccountRepository, EntryRepository};
use crate::services::{MigrationResult, MigrationService};

/// Check if an error is a unique/primary key violation
///
/// DuckDB reports these as `Constraint Error: Duplicate key "..." violates
/// unique constraint`. NOT NULL and CHECK failures are not conflicts.
fn is_unique_violation(err: &duckdb::Error) -> bool {
    let lower = err.to_string().to_lowercase();
    lower.contains("duplicate key") || lower.contains("unique constraint")
}

const ACCOUNT_COLUMNS: &str = "account_id, email, password_hash, display_name, image_url,
     image_public_id, onboarding_required, created_at::VARCHAR";

const ENTRY_COLUMNS: &str =
    "entry_id, account_id, entry_date::VARCHAR, mood, feeling, notes, sleep_hours";

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the journal database
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    fn row_to_account(row: &duckdb::Row) -> duckdb::Result<Account> {
        // 0: account_id, 1: email, 2: password_hash, 3: display_name, 4: image_url,
        // 5: image_public_id, 6: onboarding_required, 7: created_at
        let image_url: Option<String> = row.get(4)?;
        let image_public_id: Option<String> = row.get(5)?;
        let created_str: String = row.get(7)?;

        let image = match (image_url, image_public_id) {
            (Some(url), Some(public_id)) => Some(ImageRef { url, public_id }),
            _ => None,
        };

        Ok(Account {
            id: AccountId(row.get(0)?),
            email: row.get(1)?,
            password_hash: row.get(2)?,
            display_name: row.get(3)?,
            image,
            onboarding_required: row.get(6)?,
            created_at: parse_timestamp(&created_str),
        })
    }

    fn row_to_entry(row: &duckdb::Row) -> duckdb::Result<Entry> {
        let date_str: String = row.get(2)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            duckdb::Error::FromSqlConversionFailure(2, duckdb::types::Type::Text, Box::new(e))
        })?;

        Ok(Entry {
            id: EntryId(row.get(0)?),
            account_id: AccountId(row.get(1)?),
            date,
            mood: row.get(3)?,
            feeling: row.get(4)?,
            notes: row.get(5)?,
            sleep_hours: row.get(6)?,
        })
    }

    fn find_account_where(&self, clause: &str, param: &dyn duckdb::ToSql) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM accounts WHERE {}", ACCOUNT_COLUMNS, clause);
        let account = conn
            .query_row(&sql, [param], Self::row_to_account)
            .optional()?;
        Ok(account)
    }

    /// Run an UPDATE against one account, mapping "no row matched" to NotFound
    fn update_account(&self, id: AccountId, sql: &str, params: &[&dyn duckdb::ToSql]) -> Result<()> {
        let conn = self.conn()?;
        let rows = conn.execute(sql, params)?;
        if rows == 0 {
            return Err(Error::not_found(format!("account {}", id)));
        }
        Ok(())
    }
}

impl AccountRepository for DuckDbRepository {
    fn insert_account(&self, account: &NewAccount) -> Result<AccountId> {
        let conn = self.conn()?;
        let inserted = conn.query_row(
            "INSERT INTO accounts (email, password_hash, display_name, onboarding_required, created_at)
             VALUES (?, ?, ?, TRUE, CAST(? AS TIMESTAMP))
             RETURNING account_id",
            params![
                account.email,
                account.password_hash,
                DEFAULT_DISPLAY_NAME,
                format_timestamp(Utc::now()),
            ],
            |row| row.get::<_, i64>(0),
        );

        match inserted {
            Ok(id) => Ok(AccountId(id)),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::conflict("an account with this email already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_account(&self, id: AccountId) -> Result<Option<Account>> {
        self.find_account_where("account_id = ?", &id.0)
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.find_account_where("email = ?", &email)
    }

    fn finish_onboarding(&self, id: AccountId, display_name: Option<&str>) -> Result<()> {
        // Only ever writes FALSE: the flag cannot return to required
        self.update_account(
            id,
            "UPDATE accounts
             SET display_name = COALESCE(?, display_name), onboarding_required = FALSE
             WHERE account_id = ?",
            params![display_name, id.0],
        )
    }

    fn set_display_name(&self, id: AccountId, display_name: &str) -> Result<()> {
        self.update_account(
            id,
            "UPDATE accounts SET display_name = ? WHERE account_id = ?",
            params![display_name, id.0],
        )
    }

    fn set_image(&self, id: AccountId, image: &ImageRef) -> Result<()> {
        self.update_account(
            id,
            "UPDATE accounts SET image_url = ?, image_public_id = ? WHERE account_id = ?",
            params![image.url, image.public_id, id.0],
        )
    }
}

impl EntryRepository for DuckDbRepository {
    fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        let conn = self.conn()?;
        let inserted = conn.query_row(
            "INSERT INTO entries (account_id, entry_date, mood, feeling, notes, sleep_hours, created_at)
             VALUES (?, CAST(? AS DATE), ?, ?, ?, ?, CAST(? AS TIMESTAMP))
             RETURNING entry_id",
            params![
                entry.account_id.0,
                entry.date.to_string(),
                entry.mood,
                entry.feeling,
                entry.notes,
                entry.sleep_hours,
                format_timestamp(Utc::now()),
            ],
            |row| row.get::<_, i64>(0),
        );

        match inserted {
            Ok(id) => Ok(EntryId(id)),
            Err(e) if is_unique_violation(&e) => Err(Error::conflict(format!(
                "an entry for {} already exists",
                entry.date
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn entry_exists_on(&self, account_id: AccountId, date: NaiveDate) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE account_id = ? AND entry_date = CAST(? AS DATE)",
            params![account_id.0, date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn recent_entries_by_date(&self, account_id: AccountId, limit: usize) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM entries WHERE account_id = ? ORDER BY entry_date DESC LIMIT ?",
            ENTRY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let entries = stmt
            .query_map(params![account_id.0, limit], Self::row_to_entry)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        Ok(entries)
    }

    fn prune_entries(&self, account_id: AccountId, keep: usize) -> Result<usize> {
        let conn = self.conn()?;
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        let deleted = conn.execute(
            "DELETE FROM entries
             WHERE account_id = ?
               AND entry_id NOT IN (
                   SELECT entry_id FROM entries
                   WHERE account_id = ?
                   ORDER BY entry_id DESC
                   LIMIT ?
               )",
            params![account_id.0, account_id.0, keep],
        )?;
        Ok(deleted)
    }
}

// Helper functions

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}
