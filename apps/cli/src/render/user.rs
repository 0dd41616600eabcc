use xwatch_app::FollowerDelta;
use xwatch_core::ProfilePayload;

use super::format_number;

const PROFILE_RULE: &str = "========================================";

pub fn format_profile(profile: &ProfilePayload, delta: Option<FollowerDelta>) -> String {
    let mut lines = vec![
        format!("Profile: {} (@{})", profile.name, profile.username),
        PROFILE_RULE.to_string(),
    ];
    if let Some(bio) = &profile.description {
        lines.push(format!("Bio: {}", bio));
    }
    if let Some(location) = &profile.location {
        lines.push(format!("Location: {}", location));
    }
    if let Some(joined) = profile.created_at {
        lines.push(format!("Joined: {}", joined.format("%B %Y")));
    }
    if let Some(url) = &profile.url {
        lines.push(format!("URL: {}", url));
    }
    lines.push(String::new());

    let m = &profile.metrics;
    let delta = match delta {
        Some(delta) if delta.change > 0 => format!("  (+{} since {})", delta.change, delta.since),
        Some(delta) if delta.change < 0 => format!("  ({} since {})", delta.change, delta.since),
        _ => String::new(),
    };
    lines.push(format!("Followers:  {}{}", format_number(m.followers_count), delta));
    lines.push(format!("Following:  {}", format_number(m.following_count)));
    lines.push(format!("Posts:      {}", format_number(m.tweet_count)));
    lines.push(format!("Listed:     {}", format_number(m.listed_count)));
    lines.push(String::new());
    lines.push(format!("https://x.com/{}", profile.username));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use xwatch_core::UserMetrics;

    fn profile() -> ProfilePayload {
        ProfilePayload {
            username: "me".to_string(),
            name: "Me".to_string(),
            description: Some("building things".to_string()),
            metrics: UserMetrics {
                followers_count: 1_250,
                following_count: 300,
                tweet_count: 48_000,
                listed_count: 2,
            },
            ..ProfilePayload::default()
        }
    }

    #[test]
    fn shows_positive_delta_since_last_snapshot() {
        let delta = FollowerDelta {
            since: NaiveDate::from_ymd_opt(2025, 5, 30).expect("date"),
            change: 12,
        };
        let text = format_profile(&profile(), Some(delta));
        assert!(text.contains("Followers:  1,250  (+12 since 2025-05-30)"));
        assert!(text.contains("Posts:      48.0K"));
        assert!(text.contains("Bio: building things"));
    }

    #[test]
    fn unchanged_followers_show_no_delta() {
        let delta = FollowerDelta {
            since: NaiveDate::from_ymd_opt(2025, 5, 30).expect("date"),
            change: 0,
        };
        let text = format_profile(&profile(), Some(delta));
        assert!(text.contains("Followers:  1,250\n"));
    }
}
