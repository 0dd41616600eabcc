use chrono::{DateTime, Duration, Utc};
use xwatch_core::Record;

pub const ACTIVITY_WINDOW_HOURS: i64 = 24;
pub const ACTIVITY_PAGE_SIZE: u32 = 20;

const RECENT_POST_MINUTES: i64 = 10;
const BUSY_HOUR_POSTS: usize = 3;
const BUSY_DAY_POSTS: usize = 10;

/// Posting-frequency nudge, checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    RecentPost { minutes: i64 },
    BusyHour { posts: usize },
    BusyDay { posts: usize },
    Manageable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    pub posts_24h: usize,
    pub posts_1h: usize,
    /// Posts on the current UTC day.
    pub posts_today: usize,
    pub latest: Option<Record>,
    pub nudge: Nudge,
}

impl ActivitySummary {
    /// Summarises posts from the last day. Records without a creation time
    /// count toward the 24h total only.
    pub fn from_posts(records: &[Record], now: DateTime<Utc>) -> Self {
        let hour_ago = now - Duration::hours(1);
        let posts_1h = records
            .iter()
            .filter(|record| record.created_at.is_some_and(|at| at > hour_ago))
            .count();
        let posts_today = records
            .iter()
            .filter(|record| {
                record
                    .created_at
                    .is_some_and(|at| at.date_naive() == now.date_naive())
            })
            .count();
        let latest = records
            .iter()
            .filter(|record| record.created_at.is_some())
            .max_by_key(|record| record.created_at)
            .cloned();

        let nudge = match latest.as_ref().and_then(|record| record.created_at) {
            Some(at) if (now - at).num_minutes() < RECENT_POST_MINUTES => Nudge::RecentPost {
                minutes: (now - at).num_minutes().max(0),
            },
            _ if posts_1h >= BUSY_HOUR_POSTS => Nudge::BusyHour { posts: posts_1h },
            _ if posts_today >= BUSY_DAY_POSTS => Nudge::BusyDay { posts: posts_today },
            _ => Nudge::Manageable,
        };

        Self {
            posts_24h: records.len(),
            posts_1h,
            posts_today,
            latest,
            nudge,
        }
    }
}
