use chrono::{DateTime, Utc};

use crate::ids::RecordId;
use crate::pricing::ReadCounts;
use crate::record::{Record, ResourceKind};

/// Largest page the read API returns for a single call.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound on parent-post lookups made when expanding mention context.
pub const CONTEXT_LOOKUP_LIMIT: usize = 5;

/// What a fetch is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    /// The configured account's stream for the resource kind.
    Stream,
    Post(RecordId),
    User(RecordId),
    Username(String),
}

impl FetchTarget {
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream)
    }

    /// Whether a stored record answers a request for this target.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Stream => true,
            Self::Post(id) | Self::User(id) => record.id == *id,
            Self::Username(username) => record
                .payload
                .get("username")
                .and_then(|value| value.as_str())
                .is_some_and(|stored| stored.eq_ignore_ascii_case(username)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub kind: ResourceKind,
    pub target: FetchTarget,
    /// Only records strictly newer than this id.
    pub since_id: Option<RecordId>,
    /// Only records created at or after this instant.
    pub start_time: Option<DateTime<Utc>>,
    pub max_results: u32,
    /// Fetch parent posts of replies; each lookup is a separate metered read.
    pub expand_context: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub records: Vec<Record>,
    /// Remote calls actually made, primary and secondary.
    pub reads: ReadCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("remote unavailable: {0}")]
    Unavailable(String),
    #[error("payment required: {0}")]
    PaymentRequired(String),
    #[error("remote error: {0}")]
    Other(String),
}

/// Source of remote records, injected into the sync engine.
pub trait Fetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
        (**self).fetch(request)
    }
}
