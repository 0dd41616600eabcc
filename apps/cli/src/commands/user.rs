use xwatch_app::{AppError, RecordSource, Result, SyncRequest, decode_payload};
use xwatch_core::{FetchTarget, ProfilePayload, ResourceKind};

use super::{Context, completed, print_footer};
use crate::args::UserCommand;
use crate::render::user::format_profile;

pub fn run(ctx: &Context, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Me { track } => me(ctx, track),
        UserCommand::Lookup { username } => lookup(ctx, &username),
    }
}

fn me(ctx: &Context, track: bool) -> Result<()> {
    let target = FetchTarget::User(ctx.config.account.user_id.clone());
    let request = ctx.request(SyncRequest::new(ResourceKind::Profile, target, 1));
    let Some(report) = completed(ctx.sync(&request)?, "user me", None) else {
        return Ok(());
    };
    let Some(record) = report.records.first() else {
        println!("Error: Could not retrieve profile.");
        print_footer(&report);
        return Ok(());
    };
    let profile: ProfilePayload = decode_payload(record)?;

    let history = &ctx.app.services.history;
    let delta = history.follower_delta(profile.metrics.followers_count)?;
    println!("{}", format_profile(&profile, delta));

    if track && report.source == RecordSource::Remote && history.track(&profile)? {
        println!();
        println!("(Follower history updated)");
    }
    println!();
    print_footer(&report);
    Ok(())
}

fn lookup(ctx: &Context, username: &str) -> Result<()> {
    let username = username.trim_start_matches('@');
    if username.is_empty() {
        return Err(AppError::InvalidInput("username is empty".to_string()));
    }
    let request = ctx.request(SyncRequest::new(
        ResourceKind::Profile,
        FetchTarget::Username(username.to_string()),
        1,
    ));
    let command = format!("user lookup {}", username);
    let Some(report) = completed(ctx.sync(&request)?, &command, None) else {
        return Ok(());
    };
    let Some(record) = report.records.first() else {
        println!("Error: User @{} not found.", username);
        print_footer(&report);
        return Ok(());
    };
    let profile: ProfilePayload = decode_payload(record)?;
    println!("{}", format_profile(&profile, None));
    println!();
    print_footer(&report);
    Ok(())
}
