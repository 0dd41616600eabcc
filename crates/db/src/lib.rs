mod cursors;
mod error;
mod helpers;
mod history;
mod migrations;
mod records;
mod sync;
mod types;
mod usage;

use std::path::Path;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use sync::SyncCommit;
pub use types::SyncBatch;

/// Local store for fetched records, sync cursors, the usage ledger and
/// follower history. All of it lives in one sqlite file so a sync merge
/// commits in a single transaction.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }
}
