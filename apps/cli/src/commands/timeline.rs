use chrono::{Duration, Utc};
use xwatch_app::{
    ACTIVITY_PAGE_SIZE, ACTIVITY_WINDOW_HOURS, ActivitySummary, AppError, RecordSource, Result,
    SyncRequest, decode_payload, window_hours,
};
use xwatch_core::{FetchTarget, PostPayload, Record, RecordId, ResourceKind};

use super::{Context, completed, print_footer};
use crate::args::TimelineCommand;
use crate::render::timeline::{activity_lines, format_post, timeline_summary};
use crate::render::{CACHE_FOOTER, RULE, cost_line, print_lines, spend_line};

const ACTIVITY_RULE: &str = "========================================";

pub fn run(ctx: &Context, command: TimelineCommand) -> Result<()> {
    match command {
        TimelineCommand::Recent { max, hours } => recent(ctx, max, hours),
        TimelineCommand::Top { days, max } => top(ctx, days, max),
        TimelineCommand::Refresh { post_id } => refresh(ctx, &post_id),
        TimelineCommand::Activity => activity(ctx),
    }
}

fn decode_posts(records: &[Record]) -> Result<Vec<(&Record, PostPayload)>> {
    records
        .iter()
        .map(|record| decode_payload::<PostPayload>(record).map(|post| (record, post)))
        .collect()
}

fn print_posts(ctx: &Context, posts: &[(&Record, PostPayload)]) {
    let now = Utc::now();
    for (index, (record, post)) in posts.iter().enumerate() {
        println!("{}", format_post(&record.id, post, index + 1, ctx.handle(), now));
        println!();
    }
}

fn recent(ctx: &Context, max: u32, hours: Option<i64>) -> Result<()> {
    let request = ctx
        .request(SyncRequest::stream(ResourceKind::Post, max))
        .with_window(hours.map(window_hours).transpose()?);
    let note = Some("Cheaper alternative: 'timeline top' reads from the local store for free");
    let Some(report) = completed(ctx.sync(&request)?, "timeline recent", note) else {
        return Ok(());
    };

    if report.is_empty() {
        println!("No new posts found.");
        print_footer(&report);
        return Ok(());
    }

    let posts = decode_posts(&report.records)?;
    match (report.source, hours) {
        (RecordSource::Cache, _) => {
            println!("Your Recent Posts (from local store, {} posts)", posts.len())
        }
        (RecordSource::Remote, Some(hours)) => {
            println!("Your Recent Posts (last {}h) ({} posts)", hours, posts.len())
        }
        (RecordSource::Remote, None) => println!("Your Recent Posts ({} posts)", posts.len()),
    }
    println!("{}", RULE);
    print_posts(ctx, &posts);

    if report.source == RecordSource::Remote {
        let payloads: Vec<PostPayload> = posts.into_iter().map(|(_, post)| post).collect();
        println!("---");
        println!("{}", timeline_summary(&payloads));
        println!("{}", cost_line(&report.reads, report.call_cost_usd));
        println!("{}", spend_line(report.usage.as_ref()));
    } else {
        print_footer(&report);
    }
    Ok(())
}

fn top(ctx: &Context, days: i64, max: usize) -> Result<()> {
    let records = &ctx.app.services.records;
    if records.count(ResourceKind::Post)? == 0 {
        println!("No posts in local store yet. Run 'xwatch timeline recent' first.");
        return Ok(());
    }
    let ranked = records.top_posts(days, max)?;
    println!(
        "Top Posts by Engagement (last {} days) ({} posts)",
        days,
        ranked.len()
    );
    println!("{}", RULE);
    let posts: Vec<(&Record, PostPayload)> = ranked
        .iter()
        .map(|(record, post)| (record, post.clone()))
        .collect();
    print_posts(ctx, &posts);
    println!("---");
    println!("{}", CACHE_FOOTER);
    Ok(())
}

fn refresh(ctx: &Context, post_id: &str) -> Result<()> {
    let id = RecordId::parse(post_id)
        .map_err(|err| AppError::InvalidInput(format!("post id: {}", err)))?;
    let request = ctx.request(SyncRequest::new(
        ResourceKind::Post,
        FetchTarget::Post(id.clone()),
        1,
    ));
    let command = format!("timeline refresh {}", id);
    let Some(report) = completed(ctx.sync(&request)?, &command, None) else {
        return Ok(());
    };

    if report.is_empty() {
        println!("Post {} not found.", id);
        print_footer(&report);
        return Ok(());
    }
    let posts = decode_posts(&report.records)?;
    match report.source {
        RecordSource::Remote => println!("Refreshed Metrics"),
        RecordSource::Cache => println!("Stored Metrics (no update returned)"),
    }
    println!("{}", RULE);
    print_posts(ctx, &posts);
    print_footer(&report);
    Ok(())
}

fn activity(ctx: &Context) -> Result<()> {
    let request = ctx
        .request(SyncRequest::stream(ResourceKind::Post, ACTIVITY_PAGE_SIZE))
        .with_window(Some(Duration::hours(ACTIVITY_WINDOW_HOURS)));
    let Some(report) = completed(ctx.sync(&request)?, "timeline activity", None) else {
        return Ok(());
    };

    println!("Activity Check");
    println!("{}", ACTIVITY_RULE);
    if report.is_empty() {
        println!("No posts in the last 24 hours. You've been quiet.");
        println!();
        print_footer(&report);
        return Ok(());
    }

    let now = Utc::now();
    let summary = ActivitySummary::from_posts(&report.records, now);
    let latest = summary
        .latest
        .as_ref()
        .map(decode_payload::<PostPayload>)
        .transpose()?;
    print_lines(&activity_lines(&summary, latest.as_ref(), now));
    println!();
    print_footer(&report);
    Ok(())
}
