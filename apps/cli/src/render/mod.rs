pub mod mentions;
pub mod timeline;
pub mod user;

use chrono::{DateTime, Local, Utc};
use xwatch_app::Preview;
use xwatch_core::{BudgetBand, BudgetStatus, ReadCounts, UsageDay};

pub const RULE: &str = "==================================================";
pub const CACHE_FOOTER: &str = "(Served from local store — 0 API calls)";

/// Calls above this are flagged in the cost line.
const EXPENSIVE_CALL_USD: f64 = 0.02;

/// 1.2M, 12.3K, or the plain count with separators below ten thousand.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        with_commas(n)
    }
}

pub fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cuts `text` to at most `max` characters, ending in "..." when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M %Z").to_string()
}

pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

pub fn posted_line(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match at {
        Some(at) => format!("   Posted: {} ({})", format_local(at), time_ago(at, now)),
        None => "   Posted: unknown".to_string(),
    }
}

/// Band line printed after metered work; silent band prints nothing.
pub fn budget_line(status: &BudgetStatus) -> Option<String> {
    let amounts = format!(
        "${:.3} / ${:.2} ({:.0}%)",
        status.spent_usd, status.limit_usd, status.pct
    );
    match status.band {
        BudgetBand::Exceeded => Some(format!("[!] BUDGET EXCEEDED: {}", amounts)),
        BudgetBand::Warning => Some(format!("[!] Budget warning: {}, approaching limit", amounts)),
        BudgetBand::Note => Some(format!("[i] Budget note: {} used today", amounts)),
        BudgetBand::Silent => None,
    }
}

pub fn denied_lines(status: &BudgetStatus) -> Vec<String> {
    vec![
        format!(
            "Daily budget exceeded (${:.3} / ${:.2})",
            status.spent_usd, status.limit_usd
        ),
        "Use --force to override.".to_string(),
    ]
}

pub fn reads_label(reads: &ReadCounts) -> String {
    if reads.is_empty() {
        return "no reads".to_string();
    }
    reads
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind.label(count)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cost_line(reads: &ReadCounts, cost_usd: f64) -> String {
    let line = format!("Est. API cost: ~${:.3} ({})", cost_usd, reads_label(reads));
    if cost_usd > EXPENSIVE_CALL_USD {
        format!("{} [$$$ EXPENSIVE]", line)
    } else {
        line
    }
}

pub fn spend_line(usage: Option<&UsageDay>) -> String {
    let spent = usage.map(|usage| usage.estimated_cost()).unwrap_or(0.0);
    format!("Today's spend: ${:.3}", spent)
}

pub fn preview_lines(command: &str, preview: &Preview, note: Option<&str>) -> Vec<String> {
    let estimate = &preview.estimate;
    let cost = if (estimate.max_usd - estimate.min_usd).abs() < f64::EPSILON {
        format!(
            "  Would cost: ~${:.3} ({})",
            estimate.min_usd,
            reads_label(&estimate.min_reads)
        )
    } else {
        format!(
            "  Would cost: ~${:.3}-${:.3} ({} + context lookups)",
            estimate.min_usd,
            estimate.max_usd,
            reads_label(&estimate.min_reads)
        )
    };
    let mut lines = vec![format!("[DRY RUN] xwatch {}", command), cost];
    if let Some(since_id) = &preview.since_id {
        lines.push(format!("  Only posts newer than {}", since_id));
    }
    if let Some(note) = note {
        lines.push(format!("  {}", note));
    }
    if let Some(line) = preview.status.as_ref().and_then(budget_line) {
        lines.push(line);
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use xwatch_core::{BudgetPolicy, ReadKind};

    fn status(spent: f64) -> BudgetStatus {
        BudgetStatus::evaluate(&BudgetPolicy::new(0.25), spent).expect("enabled")
    }

    #[test]
    fn numbers_are_compacted() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(9_999), "9,999");
        assert_eq!(format_number(12_345), "12.3K");
        assert_eq!(format_number(3_400_000), "3.4M");
        assert_eq!(with_commas(1_234_567), "1,234,567");
        assert_eq!(with_commas(0), "0");
    }

    #[test]
    fn long_text_is_truncated_to_limit() {
        let text = "a".repeat(250);
        let cut = truncate(&text, 200);
        assert_eq!(cut.chars().count(), 200);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("short", 200), "short");
    }

    #[test]
    fn time_ago_picks_largest_unit() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("now");
        assert_eq!(time_ago(now - Duration::seconds(42), now), "42s ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn budget_lines_follow_bands() {
        assert_eq!(budget_line(&status(0.01)), None);
        assert_eq!(
            budget_line(&status(0.125)).as_deref(),
            Some("[i] Budget note: $0.125 / $0.25 (50%) used today")
        );
        assert!(
            budget_line(&status(0.2))
                .expect("warning")
                .starts_with("[!] Budget warning")
        );
        assert!(
            budget_line(&status(0.25))
                .expect("exceeded")
                .starts_with("[!] BUDGET EXCEEDED: $0.250 / $0.25")
        );
    }

    #[test]
    fn cost_line_flags_expensive_calls() {
        let one = ReadCounts::single(ReadKind::PostRead, 1);
        assert_eq!(cost_line(&one, 0.005), "Est. API cost: ~$0.005 (1 post read)");
        let six = ReadCounts::single(ReadKind::PostRead, 6);
        assert!(cost_line(&six, 0.03).ends_with("[$$$ EXPENSIVE]"));
        assert_eq!(spend_line(None), "Today's spend: $0.000");
    }
}
