use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use xwatch_core::{RecordId, ResourceKind};

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_ts, parse_record_id};

pub(crate) fn cursor_in(conn: &Connection, kind: ResourceKind) -> Result<Option<RecordId>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT last_seen_id FROM sync_cursor WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    value
        .map(|value| parse_record_id("sync_cursor", &value))
        .transpose()
}

/// Moves the cursor to the numeric max of its current value and `observed`.
/// Returns the cursor after the call; never moves backwards.
pub(crate) fn advance_cursor_in<'a>(
    conn: &Connection,
    kind: ResourceKind,
    observed: impl IntoIterator<Item = &'a RecordId>,
) -> Result<Option<RecordId>> {
    let current = cursor_in(conn, kind)?;
    let Some(candidate) = RecordId::max_of(observed) else {
        return Ok(current);
    };
    if let Some(ref current) = current
        && current >= candidate
    {
        return Ok(Some(current.clone()));
    }
    conn.execute(
        r#"
        INSERT INTO sync_cursor (kind, last_seen_id, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(kind) DO UPDATE SET
          last_seen_id = excluded.last_seen_id,
          updated_at = excluded.updated_at
        "#,
        params![kind.as_str(), candidate.as_str(), format_ts(&Utc::now())],
    )?;
    Ok(Some(candidate.clone()))
}

impl Db {
    pub fn cursor_for(&self, kind: ResourceKind) -> Result<Option<RecordId>> {
        cursor_in(&self.conn, kind)
    }

    pub fn advance_cursor(
        &mut self,
        kind: ResourceKind,
        observed: &[RecordId],
    ) -> Result<Option<RecordId>> {
        let tx = self.conn.transaction()?;
        let cursor = advance_cursor_in(&tx, kind, observed)?;
        tx.commit()?;
        Ok(cursor)
    }
}
