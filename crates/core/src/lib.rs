mod budget;
mod fetch;
mod ids;
mod pricing;
mod record;

pub use budget::{BudgetBand, BudgetPolicy, BudgetStatus};
pub use fetch::{
    CONTEXT_LOOKUP_LIMIT, FetchError, FetchOutcome, FetchRequest, FetchTarget, Fetcher,
    MAX_PAGE_SIZE,
};
pub use ids::{InvalidRecordId, RecordId};
pub use pricing::{ReadCounts, ReadKind, UnitPrices, UnknownReadKind, UsageDay};
pub use record::{
    FollowerSnapshot, MentionPayload, MentionType, PostMetrics, PostPayload, ProfilePayload,
    Record, ResourceKind, UnknownResourceKind, UserMetrics, sort_by_freshness,
};
