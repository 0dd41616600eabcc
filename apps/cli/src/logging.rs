use tracing_subscriber::EnvFilter;

const CRATES: [&str; 4] = ["xwatch_cli", "xwatch_app", "xwatch_db", "x_api"];

/// `RUST_LOG` wins, then `-v`, then the configured level, then `warn`.
/// Logs go to stderr so reports on stdout stay clean.
pub fn init_tracing(config_level: Option<&str>, verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => config_level.unwrap_or("warn"),
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(directives(level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn directives(level: &str) -> String {
    let mut parts: Vec<String> = CRATES
        .iter()
        .map(|name| format!("{}={}", name, level))
        .collect();
    parts.push("warn".to_string());
    parts.join(",")
}
