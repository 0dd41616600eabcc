mod support;

use chrono::{Duration, NaiveDate};
use support::{post_aged, post_reads, post_with_likes, setup_app};
use xwatch_app::{AppError, BudgetGate, HISTORY_CAP};
use xwatch_core::{ProfilePayload, ReadCounts, ReadKind, ResourceKind, UserMetrics};

fn profile(followers: u64) -> ProfilePayload {
    ProfilePayload {
        username: "someone".to_string(),
        name: "Some One".to_string(),
        metrics: UserMetrics {
            followers_count: followers,
            following_count: 12,
            tweet_count: 340,
            listed_count: 1,
        },
        ..ProfilePayload::default()
    }
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("date") + Duration::days(offset)
}

#[test]
fn usage_accumulates_and_never_decreases_within_a_day() {
    let app = setup_app(0.25);
    let budget = &app.state.services.budget;
    assert!(budget.current_day_usage().expect("usage").is_none());
    assert!(budget.status().expect("status").is_none());

    let mut previous = 0.0;
    for reads in [post_reads(1), ReadCounts::single(ReadKind::UserRead, 1), post_reads(0)] {
        let usage = budget.record_usage(&reads).expect("record");
        assert!(usage.estimated_cost() >= previous);
        previous = usage.estimated_cost();
    }
    let today = budget.current_day_usage().expect("usage").expect("today");
    assert_eq!(today.reads.get(ReadKind::PostRead), 1);
    assert_eq!(today.reads.get(ReadKind::UserRead), 1);
    assert!((today.estimated_cost() - 0.015).abs() < 1e-12);
    assert_eq!(budget.history(7).expect("history").len(), 1);
}

#[test]
fn disabled_budget_always_proceeds() {
    let app = setup_app(0.0);
    let budget = &app.state.services.budget;
    budget.record_usage(&post_reads(1000)).expect("spend");
    assert_eq!(budget.may_proceed(false).expect("gate"), BudgetGate::Proceed);
    assert!(budget.status().expect("status").is_none());
}

#[test]
fn forced_gate_proceeds_past_the_limit() {
    let app = setup_app(0.01);
    let budget = &app.state.services.budget;
    budget.record_usage(&post_reads(2)).expect("spend");
    assert!(!budget.may_proceed(false).expect("gate").is_proceed());
    assert!(budget.may_proceed(true).expect("gate").is_proceed());
}

#[test]
fn follower_history_keeps_one_snapshot_per_day_and_reports_delta() {
    let app = setup_app(0.25);
    let history = &app.state.services.history;
    assert!(history.follower_delta(10).expect("delta").is_none());

    assert!(history.track_on(day(0), &profile(100)).expect("track"));
    assert!(!history.track_on(day(0), &profile(150)).expect("same day"));
    assert!(history.track_on(day(1), &profile(120)).expect("next day"));

    let latest = history.latest().expect("latest").expect("snapshot");
    assert_eq!(latest.followers, 120);
    let delta = history.follower_delta(115).expect("delta").expect("some");
    assert_eq!(delta.since, day(1));
    assert_eq!(delta.change, -5);
}

#[test]
fn follower_history_is_capped() {
    let app = setup_app(0.25);
    let history = &app.state.services.history;
    for offset in 0..(HISTORY_CAP as i64 + 5) {
        history
            .track_on(day(offset), &profile(offset as u64))
            .expect("track");
    }
    let entries = history.list().expect("list");
    assert_eq!(entries.len(), HISTORY_CAP);
    assert_eq!(entries.first().map(|snap| snap.date), Some(day(5)));
}

#[test]
fn top_posts_rank_cached_posts_by_engagement_inside_window() {
    let app = setup_app(0.25);
    let mut db = app.state.open_db().expect("open db");
    db.upsert_records(&[
        post_with_likes("1", 24, 5),
        post_with_likes("2", 48, 50),
        post_with_likes("3", 24 * 10, 500),
        post_with_likes("4", 2, 0),
    ])
    .expect("seed");

    let top = app.state.services.records.top_posts(7, 2).expect("top");
    let ids: Vec<String> = top.iter().map(|(record, _)| record.id.to_string()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(top[0].1.metrics.engagement(), 50);
    assert_eq!(app.state.services.budget.current_day_usage().expect("usage"), None);
}

#[test]
fn cached_view_is_freshest_first() {
    let app = setup_app(0.25);
    let mut db = app.state.open_db().expect("open db");
    db.upsert_records(&[
        post_aged(ResourceKind::Mention, "8", 6),
        post_aged(ResourceKind::Mention, "20", 2),
        post_aged(ResourceKind::Post, "30", 1),
    ])
    .expect("seed");

    let records = &app.state.services.records;
    let cached = records
        .cached(ResourceKind::Mention, Some(Duration::hours(4)), 10)
        .expect("cached");
    assert_eq!(cached.len(), 1);
    let all = records.cached(ResourceKind::Mention, None, 10).expect("all");
    let ids: Vec<String> = all.iter().map(|record| record.id.to_string()).collect();
    assert_eq!(ids, vec!["20", "8"]);
    assert_eq!(records.count(ResourceKind::Post).expect("count"), 1);
}

#[test]
fn out_of_range_look_back_is_rejected_not_panicking() {
    let app = setup_app(0.25);
    let records = &app.state.services.records;
    assert!(matches!(
        records.top_posts(300_000_000, 10),
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(records.top_posts(0, 10), Err(AppError::InvalidInput(_))));
    assert!(matches!(
        records.cached(ResourceKind::Post, Some(Duration::hours(3_000_000_000)), 10),
        Err(AppError::InvalidInput(_))
    ));
}
