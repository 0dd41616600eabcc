use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use xwatch_core::{Record, RecordId, ResourceKind};

use crate::error::{DbError, Result};
use crate::types::RecordRow;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

pub(crate) fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(crate) fn parse_day(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value, DAY_FORMAT)?)
}

pub(crate) fn parse_record_id(table: &'static str, value: &str) -> Result<RecordId> {
    RecordId::parse(value).map_err(|err| DbError::Corrupt {
        table,
        message: err.to_string(),
    })
}

pub(crate) fn row_to_record_row(row: &Row<'_>) -> std::result::Result<RecordRow, rusqlite::Error> {
    Ok(RecordRow {
        kind: row.get(0)?,
        id: row.get(1)?,
        payload: row.get(2)?,
        created_at: row.get(3)?,
        fetched_at: row.get(4)?,
    })
}

pub(crate) fn record_from_row(row: RecordRow) -> Result<Record> {
    let kind = row
        .kind
        .parse::<ResourceKind>()
        .map_err(|err| DbError::Corrupt {
            table: "record",
            message: err.to_string(),
        })?;
    let created_at = match row.created_at.as_deref() {
        Some(value) => Some(parse_ts(value)?),
        None => None,
    };
    Ok(Record {
        kind,
        id: parse_record_id("record", &row.id)?,
        payload: serde_json::from_str(&row.payload)?,
        created_at,
        fetched_at: parse_ts(&row.fetched_at)?,
    })
}
