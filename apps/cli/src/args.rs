use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xwatch", version, about = "Metered local cache for X mentions, posts and profiles")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct GlobalArgs {
    /// Ignore the daily budget for this call
    #[arg(long, global = true)]
    pub force: bool,
    /// Skip the local store: no cursor floor and no cached fallback
    #[arg(long, global = true)]
    pub no_cache: bool,
    /// Show the estimated cost without calling the API
    #[arg(long, global = true)]
    pub dry_run: bool,
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replies, quotes and mentions of your account
    #[command(subcommand)]
    Mentions(MentionsCommand),
    /// Your own posts and their metrics
    #[command(subcommand)]
    Timeline(TimelineCommand),
    /// Profile stats
    #[command(subcommand)]
    User(UserCommand),
    /// Metered reads and spend per day
    Usage {
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum MentionsCommand {
    Recent {
        #[arg(long, default_value_t = 20)]
        max: u32,
        /// Only mentions from the last N hours
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        hours: Option<i64>,
        /// Fetch the parent post of up to 5 replies (one read each)
        #[arg(long)]
        context: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum TimelineCommand {
    Recent {
        #[arg(long, default_value_t = 10)]
        max: u32,
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        hours: Option<i64>,
    },
    /// Best posts from the local store, no API calls
    Top {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(1..))]
        days: i64,
        #[arg(long, default_value_t = 10)]
        max: usize,
    },
    /// Re-fetch the metrics of one post
    Refresh { post_id: String },
    /// How much have you posted lately
    Activity,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Me {
        /// Save today's follower count for delta tracking
        #[arg(long)]
        track: bool,
    },
    Lookup { username: String },
}
