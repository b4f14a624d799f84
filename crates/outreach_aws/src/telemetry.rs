use clap::ValueEnum;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Logs always go to stderr so operator prompts on stdout stay clean.
pub fn init_tracing(format: LogFormat, default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            // CloudWatch stamps ingestion time already.
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_current_span(false)
                .without_time()
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "outreach_aws=info,intake=info,enrichment_lambda=info",
        1 => "outreach_aws=debug,intake=debug,enrichment_lambda=debug",
        _ => "trace",
    }
}
