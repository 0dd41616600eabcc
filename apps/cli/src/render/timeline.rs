use chrono::{DateTime, Utc};
use xwatch_app::{ActivitySummary, Nudge};
use xwatch_core::{PostMetrics, PostPayload, RecordId};

use super::{posted_line, time_ago, truncate, with_commas};

const TEXT_LIMIT: usize = 200;
const LATEST_TEXT_LIMIT: usize = 80;

fn rate(engagement: u64, impressions: u64) -> String {
    if impressions == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}%", engagement as f64 / impressions as f64 * 100.0)
}

pub fn format_post(
    id: &RecordId,
    post: &PostPayload,
    index: usize,
    handle: &str,
    now: DateTime<Utc>,
) -> String {
    let m = &post.metrics;
    [
        format!("{}. {}", index, truncate(&post.text, TEXT_LIMIT)),
        posted_line(post.created_at, now),
        format!(
            "   Impressions: {} | Likes: {} | RTs: {} | Replies: {} | Quotes: {} | Bookmarks: {}",
            with_commas(m.impression_count),
            with_commas(m.like_count),
            with_commas(m.retweet_count),
            with_commas(m.reply_count),
            with_commas(m.quote_count),
            with_commas(m.bookmark_count),
        ),
        format!("   Engagement rate: {}", rate(m.engagement(), m.impression_count)),
        format!("   https://x.com/{}/status/{}", handle, id),
    ]
    .join("\n")
}

pub fn timeline_summary(posts: &[PostPayload]) -> String {
    let (impressions, engagement) = posts
        .iter()
        .map(|post| &post.metrics)
        .fold((0u64, 0u64), |(impressions, engagement), m: &PostMetrics| {
            (
                impressions.saturating_add(m.impression_count),
                engagement.saturating_add(m.engagement()),
            )
        });
    format!(
        "Summary: {} posts | {} impressions | {} engagements | {} rate",
        posts.len(),
        with_commas(impressions),
        with_commas(engagement),
        rate(engagement, impressions)
    )
}

pub fn activity_lines(
    summary: &ActivitySummary,
    latest: Option<&PostPayload>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let (Some(record), Some(post)) = (&summary.latest, latest) {
        let ago = record
            .created_at
            .map(|at| time_ago(at, now))
            .unwrap_or_else(|| "unknown".to_string());
        lines.push(format!(
            "Last post: {}, \"{}\"",
            ago,
            truncate(&post.text, LATEST_TEXT_LIMIT)
        ));
    }
    lines.push(format!("Posts today: {}", summary.posts_today));
    lines.push(format!("Posts this hour: {}", summary.posts_1h));
    lines.push(format!("Posts last 24h: {}", summary.posts_24h));
    lines.push(String::new());
    lines.push(match summary.nudge {
        Nudge::RecentPost { minutes } => {
            format!("** You posted {} minutes ago. Back to work? **", minutes)
        }
        Nudge::BusyHour { posts } => {
            format!("** {} posts in the last hour. That's a lot of X time. **", posts)
        }
        Nudge::BusyDay { posts } => format!("** {} posts today. Heavy X day. **", posts),
        Nudge::Manageable => "(Looks manageable.)".to_string(),
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(impressions: u64, likes: u64, replies: u64) -> PostPayload {
        PostPayload {
            text: "shipping today".to_string(),
            created_at: None,
            metrics: PostMetrics {
                impression_count: impressions,
                like_count: likes,
                reply_count: replies,
                ..PostMetrics::default()
            },
        }
    }

    #[test]
    fn post_block_lists_metrics_and_rate() {
        let id = RecordId::parse("55").expect("id");
        let text = format_post(&id, &post(2_000, 30, 10), 2, "me", Utc::now());
        assert!(text.starts_with("2. shipping today"));
        assert!(text.contains("Impressions: 2,000 | Likes: 30"));
        assert!(text.contains("Engagement rate: 2.0%"));
        assert!(text.ends_with("https://x.com/me/status/55"));
    }

    #[test]
    fn summary_without_impressions_has_no_rate() {
        assert_eq!(
            timeline_summary(&[post(0, 1, 0)]),
            "Summary: 1 posts | 0 impressions | 1 engagements | N/A rate"
        );
        assert_eq!(
            timeline_summary(&[post(100, 4, 1), post(100, 5, 0)]),
            "Summary: 2 posts | 200 impressions | 10 engagements | 5.0% rate"
        );
    }
}
