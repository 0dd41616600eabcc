use chrono::Utc;
use xwatch_app::{RecordSource, Result, SyncRequest, decode_payload, window_hours};
use xwatch_core::{MentionPayload, ResourceKind};

use super::{Context, completed, print_footer};
use crate::args::MentionsCommand;
use crate::render::mentions::{format_mention, mention_summary};
use crate::render::{RULE, cost_line};

pub fn run(ctx: &Context, command: MentionsCommand) -> Result<()> {
    match command {
        MentionsCommand::Recent {
            max,
            hours,
            context,
        } => recent(ctx, max, hours, context),
    }
}

fn recent(ctx: &Context, max: u32, hours: Option<i64>, context: bool) -> Result<()> {
    let request = ctx
        .request(SyncRequest::stream(ResourceKind::Mention, max))
        .with_window(hours.map(window_hours).transpose()?)
        .with_context(context);
    let note = context.then_some("Tip: skip --context to save ~$0.025, it only adds parent post text");
    let Some(report) = completed(ctx.sync(&request)?, "mentions recent", note) else {
        return Ok(());
    };

    if report.is_empty() {
        println!("No new mentions found.");
        print_footer(&report);
        return Ok(());
    }

    let mentions = report
        .records
        .iter()
        .map(|record| decode_payload::<MentionPayload>(record).map(|payload| (record, payload)))
        .collect::<Result<Vec<_>>>()?;

    match (report.source, hours) {
        (RecordSource::Cache, _) => {
            println!("Your Mentions (from local store, {})", mentions.len())
        }
        (RecordSource::Remote, Some(hours)) => {
            println!("Your Mentions (last {}h) ({})", hours, mentions.len())
        }
        (RecordSource::Remote, None) => println!("Your Mentions ({})", mentions.len()),
    }
    println!("{}", RULE);

    let now = Utc::now();
    for (index, (record, mention)) in mentions.iter().enumerate() {
        println!("{}", format_mention(&record.id, mention, index + 1, now));
        println!();
    }

    if report.source == RecordSource::Remote {
        let payloads: Vec<MentionPayload> =
            mentions.into_iter().map(|(_, payload)| payload).collect();
        println!("---");
        println!("{}", mention_summary(&payloads));
        println!("{}", cost_line(&report.reads, report.call_cost_usd));
        if context && report.call_cost_usd > 0.02 {
            println!("  Tip: skip --context next time to reduce cost");
        }
        println!("{}", crate::render::spend_line(report.usage.as_ref()));
    } else {
        print_footer(&report);
    }
    Ok(())
}
