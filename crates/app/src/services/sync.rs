use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use xwatch_core::{
    BudgetStatus, CONTEXT_LOOKUP_LIMIT, FetchRequest, FetchTarget, Fetcher, MAX_PAGE_SIZE,
    ReadCounts, ReadKind, Record, RecordId, ResourceKind, UsageDay, sort_by_freshness,
};
use xwatch_db::{Db, SyncBatch};

use crate::error::Result;
use crate::services::budget::{BudgetGate, gate, status_for};
use crate::services::records::cached_view;
use crate::services::{SharedConfig, open_db};
use crate::util::time::{utc_today, window_start};

/// One invocation of the sync engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub kind: ResourceKind,
    pub target: FetchTarget,
    pub max_results: u32,
    /// Look-back window; replaces the cursor floor with a start time.
    pub window: Option<Duration>,
    pub no_cache: bool,
    pub force: bool,
    pub dry_run: bool,
    pub expand_context: bool,
}

impl SyncRequest {
    pub fn new(kind: ResourceKind, target: FetchTarget, max_results: u32) -> Self {
        Self {
            kind,
            target,
            max_results,
            window: None,
            no_cache: false,
            force: false,
            dry_run: false,
            expand_context: false,
        }
    }

    pub fn stream(kind: ResourceKind, max_results: u32) -> Self {
        Self::new(kind, FetchTarget::Stream, max_results)
    }

    pub fn with_window(mut self, window: Option<Duration>) -> Self {
        self.window = window;
        self
    }

    pub fn with_flags(mut self, force: bool, no_cache: bool, dry_run: bool) -> Self {
        self.force = force;
        self.no_cache = no_cache;
        self.dry_run = dry_run;
        self
    }

    pub fn with_context(mut self, expand_context: bool) -> Self {
        self.expand_context = expand_context;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.max_results.clamp(1, MAX_PAGE_SIZE)
    }

    fn uses_cursor(&self) -> bool {
        self.kind.uses_cursor() && self.window.is_none() && !self.no_cache && self.target.is_stream()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Remote,
    /// Served from the local store after an empty fetch; no calls recorded.
    Cache,
}

/// Bounds on what a request would cost if run.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub min_reads: ReadCounts,
    pub max_reads: ReadCounts,
    pub min_usd: f64,
    pub max_usd: f64,
}

/// What a dry run would have done.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub kind: ResourceKind,
    pub target: FetchTarget,
    pub since_id: Option<RecordId>,
    pub start_time: Option<DateTime<Utc>>,
    pub max_results: u32,
    pub estimate: CostEstimate,
    pub status: Option<BudgetStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub kind: ResourceKind,
    /// Freshest first.
    pub records: Vec<Record>,
    pub source: RecordSource,
    /// Calls made by this operation.
    pub reads: ReadCounts,
    pub call_cost_usd: f64,
    /// Today's ledger after the operation, when anything was ever recorded.
    pub usage: Option<UsageDay>,
    pub status: Option<BudgetStatus>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Previewed(Preview),
    Denied(BudgetStatus),
    Completed(SyncReport),
}

#[derive(Clone)]
pub struct SyncService {
    config: SharedConfig,
}

impl SyncService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn estimate(&self, request: &SyncRequest) -> CostEstimate {
        let primary = ReadCounts::single(request.kind.read_kind(), 1);
        let mut max_reads = primary.clone();
        if request.expand_context && request.kind == ResourceKind::Mention {
            max_reads.add(ReadKind::PostRead, CONTEXT_LOOKUP_LIMIT as u64);
        }
        CostEstimate {
            min_usd: self.config.prices.cost(&primary),
            max_usd: self.config.prices.cost(&max_reads),
            min_reads: primary,
            max_reads,
        }
    }

    /// Gate, fetch, merge and present one request.
    pub fn run<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        request: &SyncRequest,
    ) -> Result<SyncOutcome> {
        let mut db = self.db()?;
        let fetch = self.fetch_request(&db, request)?;

        if request.dry_run {
            let status = status_for(&db, &self.config.policy, self.config.prices)?;
            return Ok(SyncOutcome::Previewed(Preview {
                kind: request.kind,
                target: request.target.clone(),
                since_id: fetch.since_id,
                start_time: fetch.start_time,
                max_results: fetch.max_results,
                estimate: self.estimate(request),
                status,
            }));
        }

        if let BudgetGate::Denied(status) =
            gate(&db, &self.config.policy, self.config.prices, request.force)?
        {
            info!(kind = %request.kind, spent_usd = status.spent_usd, "sync denied by budget");
            return Ok(SyncOutcome::Denied(status));
        }

        debug!(
            kind = %request.kind,
            since_id = fetch.since_id.as_ref().map(|id| id.as_str()),
            max_results = fetch.max_results,
            "fetching"
        );
        let outcome = fetcher.fetch(&fetch)?;

        if outcome.records.is_empty() {
            let records = if request.no_cache {
                Vec::new()
            } else {
                let cached = cached_view(
                    &db,
                    request.kind,
                    &request.target,
                    fetch.start_time,
                    fetch.max_results as usize,
                )?;
                debug!(kind = %request.kind, cached = cached.len(), "empty fetch, serving local store");
                cached
            };
            let source = if request.no_cache {
                RecordSource::Remote
            } else {
                RecordSource::Cache
            };
            let usage = db.usage_for_day(utc_today(), self.config.prices)?;
            let status = status_for(&db, &self.config.policy, self.config.prices)?;
            return Ok(SyncOutcome::Completed(SyncReport {
                kind: request.kind,
                records,
                source,
                reads: ReadCounts::new(),
                call_cost_usd: 0.0,
                usage,
                status,
            }));
        }

        let mut records = outcome.records;
        let batch = SyncBatch {
            kind: request.kind,
            records: records.clone(),
            advance_cursor: request.target.is_stream(),
            day: utc_today(),
            reads: outcome.reads.clone(),
        };
        let commit = db.commit_sync(&batch, self.config.prices)?;
        info!(
            kind = %request.kind,
            written = commit.written,
            cursor = commit.cursor.as_ref().map(|id| id.as_str()),
            calls = outcome.reads.total(),
            "sync merged"
        );

        sort_by_freshness(&mut records);
        let status = if commit.usage.reads.is_empty() {
            None
        } else {
            BudgetStatus::evaluate(&self.config.policy, commit.usage.estimated_cost())
        };
        Ok(SyncOutcome::Completed(SyncReport {
            kind: request.kind,
            records,
            source: RecordSource::Remote,
            call_cost_usd: self.config.prices.cost(&outcome.reads),
            reads: outcome.reads,
            usage: Some(commit.usage),
            status,
        }))
    }

    fn fetch_request(&self, db: &Db, request: &SyncRequest) -> Result<FetchRequest> {
        let since_id = if request.uses_cursor() {
            db.cursor_for(request.kind)?
        } else {
            None
        };
        let start_time = request
            .window
            .map(|window| window_start(Utc::now(), window))
            .transpose()?;
        Ok(FetchRequest {
            kind: request.kind,
            target: request.target.clone(),
            since_id,
            start_time,
            max_results: request.page_size(),
            expand_context: request.expand_context,
        })
    }
}
