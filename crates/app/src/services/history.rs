use chrono::NaiveDate;
use tracing::debug;
use xwatch_core::{FollowerSnapshot, ProfilePayload};
use xwatch_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::util::time::utc_today;

/// Number of daily snapshots retained.
pub const HISTORY_CAP: usize = 90;

/// Change in follower count since the latest stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerDelta {
    pub since: NaiveDate,
    pub change: i64,
}

#[derive(Clone)]
pub struct HistoryService {
    config: SharedConfig,
}

impl HistoryService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Stores today's counts unless today already has a snapshot.
    pub fn track(&self, profile: &ProfilePayload) -> Result<bool> {
        self.track_on(utc_today(), profile)
    }

    pub fn track_on(&self, date: NaiveDate, profile: &ProfilePayload) -> Result<bool> {
        let mut db = self.db()?;
        let snapshot = FollowerSnapshot {
            date,
            followers: profile.metrics.followers_count,
            following: profile.metrics.following_count,
            posts: profile.metrics.tweet_count,
        };
        let added = db.append_follower_snapshot(&snapshot, HISTORY_CAP)?;
        debug!(%date, followers = snapshot.followers, added, "follower snapshot");
        Ok(added)
    }

    pub fn latest(&self) -> Result<Option<FollowerSnapshot>> {
        let db = self.db()?;
        Ok(db.latest_follower_snapshot()?)
    }

    /// Oldest first.
    pub fn list(&self) -> Result<Vec<FollowerSnapshot>> {
        let db = self.db()?;
        Ok(db.list_follower_snapshots()?)
    }

    /// `None` without history; a zero change is still reported.
    pub fn follower_delta(&self, followers: u64) -> Result<Option<FollowerDelta>> {
        Ok(self.latest()?.map(|last| FollowerDelta {
            since: last.date,
            change: followers as i64 - last.followers as i64,
        }))
    }
}
