use chrono::NaiveDate;
use xwatch_core::{ReadCounts, Record, ResourceKind};

/// Raw `record` row before id, payload and timestamps are validated.
#[derive(Debug, Clone)]
pub(crate) struct RecordRow {
    pub kind: String,
    pub id: String,
    pub payload: String,
    pub created_at: Option<String>,
    pub fetched_at: String,
}

/// Everything one successful fetch writes, committed together.
#[derive(Debug, Clone)]
pub struct SyncBatch {
    pub kind: ResourceKind,
    pub records: Vec<Record>,
    /// Whether the ids in `records` may move the stream cursor.
    pub advance_cursor: bool,
    pub day: NaiveDate,
    pub reads: ReadCounts,
}
