use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives that replace `--log-level`.
pub const LOG_ENV: &str = "RECORDKIT_LOG";

/// Crates whose events follow `--log-level`; everything else stays at `warn`.
const WORKSPACE_TARGETS: [&str; 3] = ["recordkit", "recordkit_core", "recordkit_codec"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// `warn` globally, `level` for the workspace crates.
fn directives(level: LogLevel) -> String {
    let global = match level {
        LogLevel::Error => "error",
        _ => "warn",
    };
    WORKSPACE_TARGETS
        .iter()
        .fold(global.to_string(), |mut out, target| {
            out.push_str(&format!(",{target}={}", level.directive()));
            out
        })
}

fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(directives(level)))
}

/// Install the stderr subscriber. Targets stay visible so rule events from
/// `recordkit_core` and decode events from `recordkit_codec` can be told apart.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(level))
        .with_ansi(false)
        .with_target(true);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
