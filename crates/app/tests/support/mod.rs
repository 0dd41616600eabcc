#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use xwatch_app::AppState;
use xwatch_core::{
    BudgetPolicy, FetchError, FetchOutcome, FetchRequest, Fetcher, PostMetrics, PostPayload,
    ReadCounts, ReadKind, Record, RecordId, ResourceKind, UnitPrices,
};

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

pub fn setup_app(daily_limit_usd: f64) -> TestApp {
    setup_app_with_prices(daily_limit_usd, UnitPrices::default())
}

pub fn setup_app_with_prices(daily_limit_usd: f64, prices: UnitPrices) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("app.sqlite");
    let state = AppState::new(db_path, BudgetPolicy::new(daily_limit_usd), prices);
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}

/// Scripted fetcher that replays queued responses and keeps every request.
#[derive(Default)]
pub struct FakeFetcher {
    responses: RefCell<VecDeque<Result<FetchOutcome, FetchError>>>,
    pub requests: RefCell<Vec<FetchRequest>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<FetchOutcome, FetchError>) -> &Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> FetchRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("at least one request")
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(FetchOutcome::default()))
    }
}

pub fn id(value: &str) -> RecordId {
    RecordId::parse(value).expect("record id")
}

pub fn post_aged(kind: ResourceKind, record_id: &str, hours_ago: i64) -> Record {
    let now = Utc::now();
    let created_at = now - Duration::hours(hours_ago);
    let payload = PostPayload {
        text: format!("post {}", record_id),
        created_at: Some(created_at),
        metrics: PostMetrics::default(),
    };
    Record::new(kind, id(record_id), &payload, Some(created_at), now).expect("record")
}

pub fn post_with_likes(record_id: &str, hours_ago: i64, likes: u64) -> Record {
    let now = Utc::now();
    let created_at = now - Duration::hours(hours_ago);
    let payload = PostPayload {
        text: format!("post {}", record_id),
        created_at: Some(created_at),
        metrics: PostMetrics {
            like_count: likes,
            ..PostMetrics::default()
        },
    };
    Record::new(ResourceKind::Post, id(record_id), &payload, Some(created_at), now)
        .expect("record")
}

/// One primary call returning `records`.
pub fn page(records: Vec<Record>) -> FetchOutcome {
    FetchOutcome {
        records,
        reads: ReadCounts::single(ReadKind::PostRead, 1),
    }
}

pub fn post_reads(count: u64) -> ReadCounts {
    ReadCounts::single(ReadKind::PostRead, count)
}
