use chrono::{DateTime, Utc};
use xwatch_core::{MentionPayload, MentionType, RecordId};

use super::{format_number, posted_line, truncate};

const TEXT_LIMIT: usize = 200;
const CONTEXT_LIMIT: usize = 100;

fn action(mention_type: MentionType) -> &'static str {
    match mention_type {
        MentionType::Reply => "replied to your post",
        MentionType::Quote => "quoted your post",
        MentionType::Mention => "mentioned you",
    }
}

pub fn format_mention(
    id: &RecordId,
    mention: &MentionPayload,
    index: usize,
    now: DateTime<Utc>,
) -> String {
    let username = mention.author_username.as_deref().unwrap_or("unknown");
    let mut lines = vec![
        format!("{}. @{} {}:", index, username, action(mention.mention_type)),
        format!("   \"{}\"", truncate(&mention.text, TEXT_LIMIT)),
        posted_line(mention.created_at, now),
        format!("   Their followers: {}", format_number(mention.author_followers)),
    ];
    if let Some(context) = &mention.context_text {
        lines.push(format!("   In reply to: \"{}\"", truncate(context, CONTEXT_LIMIT)));
    }
    let link_user = mention.author_username.as_deref().unwrap_or("i");
    lines.push(format!("   https://x.com/{}/status/{}", link_user, id));
    lines.join("\n")
}

pub fn mention_summary(mentions: &[MentionPayload]) -> String {
    let count = |wanted: MentionType| {
        mentions
            .iter()
            .filter(|mention| mention.mention_type == wanted)
            .count()
    };
    format!(
        "Summary: {} mentions | {} replies, {} quotes, {} direct",
        mentions.len(),
        count(MentionType::Reply),
        count(MentionType::Quote),
        count(MentionType::Mention)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(kind: MentionType) -> MentionPayload {
        MentionPayload {
            text: "hello".to_string(),
            author_username: Some("alice".to_string()),
            author_followers: 15_300,
            mention_type: kind,
            ..MentionPayload::default()
        }
    }

    #[test]
    fn reply_shows_context_and_link() {
        let mut reply = mention(MentionType::Reply);
        reply.context_text = Some("parent text".to_string());
        let id = RecordId::parse("123").expect("id");
        let text = format_mention(&id, &reply, 1, Utc::now());
        assert!(text.starts_with("1. @alice replied to your post:"));
        assert!(text.contains("Their followers: 15.3K"));
        assert!(text.contains("In reply to: \"parent text\""));
        assert!(text.ends_with("https://x.com/alice/status/123"));
    }

    #[test]
    fn summary_counts_types() {
        let mentions = vec![
            mention(MentionType::Reply),
            mention(MentionType::Reply),
            mention(MentionType::Quote),
        ];
        assert_eq!(
            mention_summary(&mentions),
            "Summary: 3 mentions | 2 replies, 1 quotes, 0 direct"
        );
    }
}
