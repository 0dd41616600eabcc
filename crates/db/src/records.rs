use rusqlite::{Connection, OptionalExtension, params};
use xwatch_core::{Record, RecordId, ResourceKind};

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_ts, record_from_row, row_to_record_row};

/// Replaces stored snapshots sharing `(kind, id)` and leaves every other
/// record alone.
pub(crate) fn upsert_records_in(conn: &Connection, records: &[Record]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO record (kind, id, payload, created_at, fetched_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(kind, id) DO UPDATE SET
          payload = excluded.payload,
          created_at = excluded.created_at,
          fetched_at = excluded.fetched_at
        "#,
    )?;
    let mut written = 0usize;
    for record in records {
        let payload = serde_json::to_string(&record.payload)?;
        written += stmt.execute(params![
            record.kind.as_str(),
            record.id.as_str(),
            payload,
            record.created_at.as_ref().map(format_ts),
            format_ts(&record.fetched_at),
        ])?;
    }
    Ok(written)
}

impl Db {
    pub fn upsert_records(&mut self, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let written = upsert_records_in(&tx, records)?;
        tx.commit()?;
        Ok(written)
    }

    /// Every stored record of `kind`, in no particular order.
    pub fn list_records(&self, kind: ResourceKind) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, id, payload, created_at, fetched_at
            FROM record
            WHERE kind = ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![kind.as_str()], row_to_record_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(record_from_row).collect()
    }

    pub fn get_record(&self, kind: ResourceKind, id: &RecordId) -> Result<Option<Record>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT kind, id, payload, created_at, fetched_at
                FROM record
                WHERE kind = ?1 AND id = ?2
                "#,
                params![kind.as_str(), id.as_str()],
                row_to_record_row,
            )
            .optional()?;
        row.map(record_from_row).transpose()
    }

    pub fn count_records(&self, kind: ResourceKind) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM record WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}
