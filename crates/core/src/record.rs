use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::pricing::ReadKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Mention,
    Post,
    Profile,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Mention, Self::Post, Self::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Post => "post",
            Self::Profile => "profile",
        }
    }

    /// Streams with monotonically increasing ids keep a high-water mark.
    /// Profiles are keyed by user id, which says nothing about recency.
    pub fn uses_cursor(&self) -> bool {
        !matches!(self, Self::Profile)
    }

    /// Metered read kind charged for one call against this resource.
    pub fn read_kind(&self) -> ReadKind {
        match self {
            Self::Mention | Self::Post => ReadKind::PostRead,
            Self::Profile => ReadKind::UserRead,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind {0:?}")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mention" => Ok(Self::Mention),
            "post" => Ok(Self::Post),
            "profile" => Ok(Self::Profile),
            other => Err(UnknownResourceKind(other.to_string())),
        }
    }
}

/// One fetched item as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: ResourceKind,
    pub id: RecordId,
    pub payload: serde_json::Value,
    /// Platform creation time, when the resource has one.
    pub created_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl Record {
    pub fn new<T: Serialize>(
        kind: ResourceKind,
        id: RecordId,
        payload: &T,
        created_at: Option<DateTime<Utc>>,
        fetched_at: DateTime<Utc>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            kind,
            id,
            payload: serde_json::to_value(payload)?,
            created_at,
            fetched_at,
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.payload.clone())
    }

    /// Ordering key for "most recent first" views. Posts and mentions use
    /// their creation time; profiles are snapshots, so the fetch time.
    pub fn freshness(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            ResourceKind::Profile => Some(self.fetched_at),
            ResourceKind::Mention | ResourceKind::Post => self.created_at,
        }
    }
}

/// Sorts most recent first; records without a freshness timestamp go last.
pub fn sort_by_freshness(records: &mut [Record]) {
    records.sort_by(|a, b| {
        b.freshness()
            .cmp(&a.freshness())
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub impression_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
}

impl PostMetrics {
    pub fn engagement(&self) -> u64 {
        self.like_count
            .saturating_add(self.retweet_count)
            .saturating_add(self.reply_count)
            .saturating_add(self.quote_count)
    }

    pub fn engagement_rate_pct(&self) -> Option<f64> {
        if self.impression_count == 0 {
            return None;
        }
        Some(self.engagement() as f64 / self.impression_count as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionType {
    Reply,
    Quote,
    #[default]
    Mention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPayload {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: PostMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionPayload {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub author_id: Option<String>,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_followers: u64,
    #[serde(default, rename = "type")]
    pub mention_type: MentionType,
    #[serde(default)]
    pub metrics: PostMetrics,
    /// Post this mention replies to, when it is a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub metrics: UserMetrics,
}

/// Daily follower count sample kept for delta reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerSnapshot {
    pub date: chrono::NaiveDate,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}
