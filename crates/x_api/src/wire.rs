//! Response bodies of the v2 read endpoints, limited to the fields we keep.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use xwatch_core::{PostMetrics, UserMetrics};

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Single<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Includes {
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PostMetrics>,
    #[serde(default)]
    pub referenced_tweets: Vec<ReferencedTweet>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReferencedTweet {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub id: String,
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
    pub public_metrics: Option<UserMetrics>,
}

/// Problem body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Problem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl Problem {
    pub fn summary(&self) -> Option<String> {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
            (Some(text), None) | (None, Some(text)) => Some(text.clone()),
            (None, None) => None,
        }
    }
}
