use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use xwatch_core::{
    CONTEXT_LOOKUP_LIMIT, FetchError, FetchOutcome, FetchRequest, FetchTarget, Fetcher,
    MentionPayload, MentionType, ReadCounts, ReadKind, Record, RecordId, ResourceKind,
};

use crate::convert::{author_index, mention_record, post_record, profile_record};
use crate::wire::{ApiTweet, ApiUser, Page, Problem, Single};

pub const DEFAULT_BASE_URL: &str = "https://api.x.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeline endpoints reject pages smaller than this.
const MIN_PAGE_SIZE: u32 = 5;

const TWEET_FIELDS: &str = "created_at,public_metrics,referenced_tweets,author_id,conversation_id";
const USER_FIELDS: &str = "username,name,public_metrics,description,location,url,created_at,verified";

#[derive(Debug, Clone)]
pub struct XClientConfig {
    pub base_url: String,
    pub bearer_token: String,
    /// Account whose mentions and timeline are streamed.
    pub user_id: RecordId,
    pub timeout: Duration,
}

impl XClientConfig {
    pub fn new(bearer_token: impl Into<String>, user_id: RecordId) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: bearer_token.into(),
            user_id,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How a planned call's body is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    TweetPage,
    Tweet,
    User,
}

/// One HTTP call derived from a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub shape: Shape,
}

pub(crate) fn plan(request: &FetchRequest, user_id: &RecordId) -> Result<Call, FetchError> {
    let tweet_query = || {
        vec![
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ]
    };
    let call = match (request.kind, &request.target) {
        (ResourceKind::Mention | ResourceKind::Post, FetchTarget::Stream) => {
            let path = match request.kind {
                ResourceKind::Mention => format!("/2/users/{}/mentions", user_id),
                _ => format!("/2/users/{}/tweets", user_id),
            };
            let mut query = tweet_query();
            query.push((
                "max_results",
                request.max_results.max(MIN_PAGE_SIZE).to_string(),
            ));
            if request.kind == ResourceKind::Post {
                query.push(("exclude", "retweets".to_string()));
            }
            if let Some(since_id) = &request.since_id {
                query.push(("since_id", since_id.to_string()));
            }
            if let Some(start) = request.start_time {
                query.push((
                    "start_time",
                    start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ));
            }
            Call {
                path,
                query,
                shape: Shape::TweetPage,
            }
        }
        (ResourceKind::Mention | ResourceKind::Post, FetchTarget::Post(id)) => Call {
            path: format!("/2/tweets/{}", id),
            query: tweet_query(),
            shape: Shape::Tweet,
        },
        (ResourceKind::Profile, target) => {
            let path = match target {
                FetchTarget::Stream => "/2/users/me".to_string(),
                FetchTarget::User(id) => format!("/2/users/{}", id),
                FetchTarget::Username(username) => {
                    format!("/2/users/by/username/{}", username.trim_start_matches('@'))
                }
                FetchTarget::Post(_) => {
                    return Err(FetchError::Other(
                        "profiles cannot be fetched by post id".to_string(),
                    ));
                }
            };
            Call {
                path,
                query: vec![("user.fields", USER_FIELDS.to_string())],
                shape: Shape::User,
            }
        }
        (kind, target) => {
            return Err(FetchError::Other(format!(
                "unsupported {} fetch for {:?}",
                kind, target
            )));
        }
    };
    Ok(call)
}

/// Maps an unsuccessful status to the error class the caller reports.
pub(crate) fn classify_status(status: StatusCode, message: String) -> FetchError {
    let message = format!("HTTP {}: {}", status.as_u16(), message);
    if status == StatusCode::PAYMENT_REQUIRED {
        FetchError::PaymentRequired(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        FetchError::Unavailable(message)
    } else {
        FetchError::Other(message)
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    FetchError::Unavailable(err.to_string())
}

/// Blocking client for the metered read API.
pub struct XClient {
    http: Client,
    config: XClientConfig,
}

impl XClient {
    pub fn new(config: XClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("xwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Other(format!("build http client: {}", err)))?;
        Ok(Self { http, config })
    }

    fn get<T: DeserializeOwned>(&self, call: &Call) -> Result<T, FetchError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), call.path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.bearer_token)
            .query(&call.query)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<Problem>(&body)
                .ok()
                .and_then(|problem| problem.summary())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                });
            debug!(%url, status = status.as_u16(), "request rejected");
            return Err(classify_status(status, message));
        }
        response
            .json::<T>()
            .map_err(|err| FetchError::Other(format!("decode response: {}", err)))
    }

    fn fetch_context(&self, records: &mut [Record], reads: &mut ReadCounts) {
        let mut lookups = 0;
        for record in records.iter_mut() {
            if lookups >= CONTEXT_LOOKUP_LIMIT {
                break;
            }
            let Ok(mut mention) = record.decode::<MentionPayload>() else {
                continue;
            };
            let Some(parent) = mention.parent_id.clone() else {
                continue;
            };
            if mention.mention_type != MentionType::Reply {
                continue;
            }
            lookups += 1;
            let call = Call {
                path: format!("/2/tweets/{}", parent),
                query: vec![("tweet.fields", "text,author_id,created_at".to_string())],
                shape: Shape::Tweet,
            };
            match self.get::<Single<ApiTweet>>(&call) {
                Ok(body) => {
                    reads.add(ReadKind::PostRead, 1);
                    if let Some(tweet) = body.data {
                        mention.context_text = Some(tweet.text);
                        if let Ok(payload) = serde_json::to_value(&mention) {
                            record.payload = payload;
                        }
                    }
                }
                Err(err) => {
                    debug!(parent = %parent, error = %err, "context lookup skipped");
                }
            }
        }
    }
}

impl Fetcher for XClient {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
        let call = plan(request, &self.config.user_id)?;
        let fetched_at = Utc::now();
        let mut reads = ReadCounts::single(request.kind.read_kind(), 1);

        let mut records = match call.shape {
            Shape::TweetPage => {
                let page: Page<ApiTweet> = self.get(&call)?;
                let tweets = page.data.unwrap_or_default();
                convert_tweets(request.kind, &tweets, &page.includes.users, fetched_at)?
            }
            Shape::Tweet => {
                let single: Single<ApiTweet> = self.get(&call)?;
                let tweets: Vec<ApiTweet> = single.data.into_iter().collect();
                convert_tweets(request.kind, &tweets, &single.includes.users, fetched_at)?
            }
            Shape::User => {
                let single: Single<ApiUser> = self.get(&call)?;
                single
                    .data
                    .iter()
                    .map(|user| profile_record(user, fetched_at))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        records.truncate(request.max_results as usize);

        if request.expand_context && request.kind == ResourceKind::Mention {
            self.fetch_context(&mut records, &mut reads);
        }
        debug!(
            kind = %request.kind,
            records = records.len(),
            calls = reads.total(),
            "fetch complete"
        );
        Ok(FetchOutcome { records, reads })
    }
}

pub(crate) fn convert_tweets(
    kind: ResourceKind,
    tweets: &[ApiTweet],
    users: &[ApiUser],
    fetched_at: chrono::DateTime<Utc>,
) -> Result<Vec<Record>, FetchError> {
    match kind {
        ResourceKind::Mention => {
            let authors = author_index(users);
            tweets
                .iter()
                .map(|tweet| mention_record(tweet, &authors, fetched_at))
                .collect()
        }
        _ => tweets
            .iter()
            .map(|tweet| post_record(kind, tweet, fetched_at))
            .collect(),
    }
}
