use xwatch_core::{RecordId, UnitPrices, UsageDay};

use crate::Db;
use crate::cursors::{advance_cursor_in, cursor_in};
use crate::error::Result;
use crate::records::upsert_records_in;
use crate::types::SyncBatch;
use crate::usage::{add_usage_in, reads_in};

/// State after a committed [`SyncBatch`].
#[derive(Debug, Clone)]
pub struct SyncCommit {
    pub written: usize,
    pub cursor: Option<RecordId>,
    pub usage: UsageDay,
}

impl Db {
    /// Writes records, cursor and usage of one fetch in a single transaction.
    /// Nothing is persisted if any step fails.
    pub fn commit_sync(&mut self, batch: &SyncBatch, prices: UnitPrices) -> Result<SyncCommit> {
        let tx = self.conn.transaction()?;
        let written = upsert_records_in(&tx, &batch.records)?;
        let cursor = if batch.advance_cursor && batch.kind.uses_cursor() {
            advance_cursor_in(&tx, batch.kind, batch.records.iter().map(|record| &record.id))?
        } else {
            cursor_in(&tx, batch.kind)?
        };
        add_usage_in(&tx, batch.day, &batch.reads)?;
        let totals = reads_in(&tx, batch.day)?.unwrap_or_default();
        tx.commit()?;
        Ok(SyncCommit {
            written,
            cursor,
            usage: UsageDay::new(batch.day, totals, prices),
        })
    }
}
