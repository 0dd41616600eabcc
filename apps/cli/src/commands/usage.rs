use xwatch_app::Result;

use super::Context;
use crate::render::{CACHE_FOOTER, RULE, budget_line, reads_label};

pub fn run(ctx: &Context, days: usize) -> Result<()> {
    let budget = &ctx.app.services.budget;
    let history = budget.history(days)?;
    let limit = ctx.app.config.policy.daily_limit_usd;

    println!("Usage (last {} days)", days);
    println!("{}", RULE);
    if history.is_empty() {
        println!("No metered reads recorded yet.");
    }
    for day in &history {
        println!(
            "{}  ${:.3}  {}",
            day.date,
            day.estimated_cost(),
            reads_label(&day.reads)
        );
    }
    println!("---");
    if ctx.app.config.policy.is_enabled() {
        println!("Daily budget: ${:.2}", limit);
    } else {
        println!("Daily budget: disabled");
    }
    if let Some(line) = budget.status()?.as_ref().and_then(budget_line) {
        println!("{}", line);
    }
    println!("{}", CACHE_FOOTER);
    Ok(())
}
