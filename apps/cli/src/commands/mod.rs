mod mentions;
mod timeline;
mod usage;
mod user;

use std::time::Duration;

use tracing::debug;
use x_api::{XClient, XClientConfig};
use xwatch_app::{
    AppPaths, AppState, Result, SyncOutcome, SyncReport, SyncRequest, XwatchConfig,
    ensure_app_data_dir,
};

use crate::args::{Command, GlobalArgs};
use crate::render;

/// Everything a command needs for one invocation.
pub struct Context {
    pub app: AppState,
    pub config: XwatchConfig,
    pub global: GlobalArgs,
}

impl Context {
    pub fn new(paths: &AppPaths, config: XwatchConfig, global: GlobalArgs) -> Result<Self> {
        ensure_app_data_dir(paths)?;
        let app = AppState::new(
            paths.db_path.clone(),
            config.budget_policy(),
            config.unit_prices(),
        );
        app.setup_db()?;
        debug!(db = %paths.db_path.display(), "store ready");
        Ok(Self {
            app,
            config,
            global,
        })
    }

    pub fn client(&self) -> Result<XClient> {
        let mut client_config = XClientConfig::new(
            self.config.account.bearer_token.clone(),
            self.config.account.user_id.clone(),
        );
        if let Some(base_url) = &self.config.api.base_url {
            client_config.base_url = base_url.clone();
        }
        if let Some(secs) = self.config.api.timeout_secs {
            client_config.timeout = Duration::from_secs(secs);
        }
        Ok(XClient::new(client_config)?)
    }

    /// Applies the global flags to a request.
    pub fn request(&self, request: SyncRequest) -> SyncRequest {
        request.with_flags(self.global.force, self.global.no_cache, self.global.dry_run)
    }

    pub fn sync(&self, request: &SyncRequest) -> Result<SyncOutcome> {
        let client = self.client()?;
        self.app.services.sync.run(&client, request)
    }

    pub fn handle(&self) -> &str {
        &self.config.account.handle
    }
}

pub fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Mentions(command) => mentions::run(ctx, command),
        Command::Timeline(command) => timeline::run(ctx, command),
        Command::User(command) => user::run(ctx, command),
        Command::Usage { days } => usage::run(ctx, days),
    }
}

/// Prints the preview or denial of a gated sync and returns the report when
/// the sync completed. The post-operation budget band is printed first.
pub(crate) fn completed(
    outcome: SyncOutcome,
    command: &str,
    note: Option<&str>,
) -> Option<SyncReport> {
    match outcome {
        SyncOutcome::Previewed(preview) => {
            render::print_lines(&render::preview_lines(command, &preview, note));
            None
        }
        SyncOutcome::Denied(status) => {
            render::print_lines(&render::denied_lines(&status));
            None
        }
        SyncOutcome::Completed(report) => {
            if let Some(line) = report.status.as_ref().and_then(render::budget_line) {
                println!("{}", line);
            }
            Some(report)
        }
    }
}

/// Footer shared by every report that touched the API.
pub(crate) fn print_footer(report: &SyncReport) {
    println!("---");
    match report.source {
        xwatch_app::RecordSource::Cache => println!("{}", render::CACHE_FOOTER),
        xwatch_app::RecordSource::Remote => {
            println!("{}", render::cost_line(&report.reads, report.call_cost_usd))
        }
    }
    println!("{}", render::spend_line(report.usage.as_ref()));
}
