use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use xwatch_core::{FetchTarget, PostPayload, Record, ResourceKind, sort_by_freshness};
use xwatch_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::util::time::{window_days, window_start, within_window};

#[derive(Clone)]
pub struct RecordsService {
    config: SharedConfig,
}

impl RecordsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Stored records of `kind`, freshest first, without any remote call.
    pub fn cached(
        &self,
        kind: ResourceKind,
        window: Option<Duration>,
        max: usize,
    ) -> Result<Vec<Record>> {
        let db = self.db()?;
        let start = window
            .map(|window| window_start(Utc::now(), window))
            .transpose()?;
        cached_view(&db, kind, &FetchTarget::Stream, start, max)
    }

    /// Own posts from the last `days` days ranked by engagement.
    pub fn top_posts(&self, days: i64, max: usize) -> Result<Vec<(Record, PostPayload)>> {
        let db = self.db()?;
        let start = window_start(Utc::now(), window_days(days)?)?;
        let mut ranked = Vec::new();
        for record in db.list_records(ResourceKind::Post)? {
            if !within_window(record.created_at, Some(start)) {
                continue;
            }
            let payload: PostPayload = decode_payload(&record)?;
            ranked.push((record, payload));
        }
        ranked.sort_by(|(left, left_post), (right, right_post)| {
            right_post
                .metrics
                .engagement()
                .cmp(&left_post.metrics.engagement())
                .then_with(|| right.id.cmp(&left.id))
        });
        ranked.truncate(max);
        Ok(ranked)
    }

    pub fn count(&self, kind: ResourceKind) -> Result<u64> {
        let db = self.db()?;
        Ok(db.count_records(kind)?)
    }
}

/// Stored records matching `target`, inside the window, freshest first,
/// truncated to `max`.
pub(crate) fn cached_view(
    db: &Db,
    kind: ResourceKind,
    target: &FetchTarget,
    start: Option<DateTime<Utc>>,
    max: usize,
) -> Result<Vec<Record>> {
    let mut records: Vec<Record> = db
        .list_records(kind)?
        .into_iter()
        .filter(|record| target.matches(record))
        .filter(|record| within_window(record.freshness(), start))
        .collect();
    sort_by_freshness(&mut records);
    records.truncate(max);
    Ok(records)
}

/// Decodes a stored payload; a mismatch means the store is corrupt.
pub fn decode_payload<T: DeserializeOwned>(record: &Record) -> Result<T> {
    Ok(record.decode().map_err(xwatch_db::DbError::from)?)
}
