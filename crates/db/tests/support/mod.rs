#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use xwatch_core::{PostMetrics, PostPayload, Record, RecordId, ResourceKind};
use xwatch_db::Db;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn id(value: &str) -> RecordId {
    RecordId::parse(value).expect("record id")
}

pub fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0)
        .single()
        .expect("timestamp")
}

pub fn make_post(record_id: &str, text: &str, likes: u64, created_hour: u32) -> Record {
    let created_at = ts(created_hour);
    let payload = PostPayload {
        text: text.to_string(),
        created_at: Some(created_at),
        metrics: PostMetrics {
            like_count: likes,
            ..PostMetrics::default()
        },
    };
    Record::new(
        ResourceKind::Post,
        id(record_id),
        &payload,
        Some(created_at),
        ts(23),
    )
    .expect("record")
}
