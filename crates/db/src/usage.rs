use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use xwatch_core::{ReadCounts, ReadKind, UnitPrices, UsageDay};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{format_day, parse_day};

pub(crate) fn add_usage_in(conn: &Connection, day: NaiveDate, reads: &ReadCounts) -> Result<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO usage_day (day, read_kind, count)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(day, read_kind) DO UPDATE SET count = count + excluded.count
        "#,
    )?;
    let day = format_day(day);
    for (kind, count) in reads.iter() {
        stmt.execute(params![day, kind.as_str(), count as i64])?;
    }
    Ok(())
}

pub(crate) fn reads_in(conn: &Connection, day: NaiveDate) -> Result<Option<ReadCounts>> {
    let mut stmt = conn.prepare("SELECT read_kind, count FROM usage_day WHERE day = ?1")?;
    let rows = stmt
        .query_map(params![format_day(day)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Ok(None);
    }
    let mut reads = ReadCounts::new();
    for (kind, count) in rows {
        reads.add(parse_read_kind(&kind)?, count.max(0) as u64);
    }
    Ok(Some(reads))
}

fn parse_read_kind(value: &str) -> Result<ReadKind> {
    value.parse::<ReadKind>().map_err(|err| DbError::Corrupt {
        table: "usage_day",
        message: err.to_string(),
    })
}

impl Db {
    /// Adds `reads` to the running totals for `day` and returns the day.
    pub fn record_usage(
        &mut self,
        day: NaiveDate,
        reads: &ReadCounts,
        prices: UnitPrices,
    ) -> Result<UsageDay> {
        let tx = self.conn.transaction()?;
        add_usage_in(&tx, day, reads)?;
        let totals = reads_in(&tx, day)?.unwrap_or_default();
        tx.commit()?;
        Ok(UsageDay::new(day, totals, prices))
    }

    pub fn usage_for_day(&self, day: NaiveDate, prices: UnitPrices) -> Result<Option<UsageDay>> {
        Ok(reads_in(&self.conn, day)?.map(|reads| UsageDay::new(day, reads, prices)))
    }

    /// Most recent days first, at most `limit` entries (0 = all).
    pub fn list_usage_days(&self, prices: UnitPrices, limit: usize) -> Result<Vec<UsageDay>> {
        let mut stmt = self
            .conn
            .prepare("SELECT day, read_kind, count FROM usage_day ORDER BY day DESC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut by_day: BTreeMap<NaiveDate, ReadCounts> = BTreeMap::new();
        for (day, kind, count) in rows {
            by_day
                .entry(parse_day(&day)?)
                .or_default()
                .add(parse_read_kind(&kind)?, count.max(0) as u64);
        }
        let days = by_day
            .into_iter()
            .rev()
            .map(|(day, reads)| UsageDay::new(day, reads, prices));
        Ok(if limit == 0 {
            days.collect()
        } else {
            days.take(limit).collect()
        })
    }
}
