mod support;

use chrono::{Duration, NaiveDate};
use support::setup_db;
use xwatch_core::FollowerSnapshot;

fn snapshot(date: NaiveDate, followers: u64) -> FollowerSnapshot {
    FollowerSnapshot {
        date,
        followers,
        following: 10,
        posts: 100,
    }
}

#[test]
fn one_snapshot_per_day() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("date");
    assert!(db.append_follower_snapshot(&snapshot(today, 50), 90).expect("append"));
    assert!(!db.append_follower_snapshot(&snapshot(today, 55), 90).expect("append"));
    let latest = db
        .latest_follower_snapshot()
        .expect("latest")
        .expect("present");
    assert_eq!(latest.followers, 50);
}

#[test]
fn history_is_capped_to_newest_entries() {
    let mut test_db = setup_db();
    let db = &mut test_db.db;
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
    for offset in 0..95u64 {
        let date = start + Duration::days(offset as i64);
        db.append_follower_snapshot(&snapshot(date, offset), 90)
            .expect("append");
    }
    let history = db.list_follower_snapshots().expect("list");
    assert_eq!(history.len(), 90);
    assert_eq!(history[0].date, start + Duration::days(5));
    assert_eq!(history[89].followers, 94);
}
