use std::collections::HashMap;

use chrono::{DateTime, Utc};
use xwatch_core::{
    FetchError, MentionPayload, MentionType, PostPayload, ProfilePayload, Record, RecordId,
    ResourceKind,
};

use crate::wire::{ApiTweet, ApiUser, ReferencedTweet};

/// Reply or quote when the post references one; a later reference wins.
pub(crate) fn mention_type(references: &[ReferencedTweet]) -> MentionType {
    references
        .iter()
        .fold(MentionType::Mention, |current, reference| {
            match reference.kind.as_str() {
                "replied_to" => MentionType::Reply,
                "quoted" => MentionType::Quote,
                _ => current,
            }
        })
}

pub(crate) fn parent_id(references: &[ReferencedTweet]) -> Option<String> {
    references
        .iter()
        .find(|reference| reference.kind == "replied_to")
        .map(|reference| reference.id.clone())
}

fn record_id(value: &str) -> Result<RecordId, FetchError> {
    RecordId::parse(value).map_err(|err| FetchError::Other(format!("unexpected id: {}", err)))
}

fn encode_error(err: serde_json::Error) -> FetchError {
    FetchError::Other(format!("encode payload: {}", err))
}

pub(crate) fn post_record(
    kind: ResourceKind,
    tweet: &ApiTweet,
    fetched_at: DateTime<Utc>,
) -> Result<Record, FetchError> {
    let payload = PostPayload {
        text: tweet.text.clone(),
        created_at: tweet.created_at,
        metrics: tweet.public_metrics.unwrap_or_default(),
    };
    Record::new(kind, record_id(&tweet.id)?, &payload, tweet.created_at, fetched_at)
        .map_err(encode_error)
}

pub(crate) fn mention_record(
    tweet: &ApiTweet,
    authors: &HashMap<&str, &ApiUser>,
    fetched_at: DateTime<Utc>,
) -> Result<Record, FetchError> {
    let author = tweet
        .author_id
        .as_deref()
        .and_then(|author_id| authors.get(author_id).copied());
    let payload = MentionPayload {
        text: tweet.text.clone(),
        created_at: tweet.created_at,
        author_id: tweet.author_id.clone(),
        author_username: author.map(|user| user.username.clone()),
        author_name: author.map(|user| user.name.clone()),
        author_followers: author
            .and_then(|user| user.public_metrics)
            .map(|metrics| metrics.followers_count)
            .unwrap_or(0),
        mention_type: mention_type(&tweet.referenced_tweets),
        metrics: tweet.public_metrics.unwrap_or_default(),
        parent_id: parent_id(&tweet.referenced_tweets),
        context_text: None,
    };
    Record::new(
        ResourceKind::Mention,
        record_id(&tweet.id)?,
        &payload,
        tweet.created_at,
        fetched_at,
    )
    .map_err(encode_error)
}

pub(crate) fn profile_record(user: &ApiUser, fetched_at: DateTime<Utc>) -> Result<Record, FetchError> {
    let payload = ProfilePayload {
        username: user.username.clone(),
        name: user.name.clone(),
        description: user.description.clone().filter(|text| !text.is_empty()),
        location: user.location.clone().filter(|text| !text.is_empty()),
        url: user.url.clone().filter(|text| !text.is_empty()),
        created_at: user.created_at,
        verified: user.verified,
        metrics: user.public_metrics.unwrap_or_default(),
    };
    Record::new(
        ResourceKind::Profile,
        record_id(&user.id)?,
        &payload,
        None,
        fetched_at,
    )
    .map_err(encode_error)
}

pub(crate) fn author_index(users: &[ApiUser]) -> HashMap<&str, &ApiUser> {
    users.iter().map(|user| (user.id.as_str(), user)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(kind: &str, id: &str) -> ReferencedTweet {
        ReferencedTweet {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn classifies_mentions_from_references() {
        assert_eq!(mention_type(&[]), MentionType::Mention);
        assert_eq!(
            mention_type(&[reference("replied_to", "1")]),
            MentionType::Reply
        );
        assert_eq!(mention_type(&[reference("quoted", "2")]), MentionType::Quote);
        assert_eq!(
            mention_type(&[reference("replied_to", "1"), reference("quoted", "2")]),
            MentionType::Quote
        );
        assert_eq!(
            mention_type(&[reference("retweeted", "3")]),
            MentionType::Mention
        );
    }

    #[test]
    fn parent_is_the_replied_to_post() {
        let refs = [reference("quoted", "2"), reference("replied_to", "1")];
        assert_eq!(parent_id(&refs).as_deref(), Some("1"));
        assert_eq!(parent_id(&[reference("quoted", "2")]), None);
    }
}
