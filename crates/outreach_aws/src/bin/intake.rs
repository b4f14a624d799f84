use std::io;
use std::process::ExitCode;

use aws_config::Region;
use clap::Parser;
use color_eyre::eyre::Result;
use outreach_aws::adapters::console::ConsolePrompter;
use outreach_aws::adapters::dynamodb::DynamoCustomerStore;
use outreach_aws::handlers::intake::{submit_customer, IntakeError, SubmissionOutcome};
use outreach_aws::telemetry::{default_filter, init_tracing, LogFormat};
use outreach_core::config::{
    IntakeConfig, DEFAULT_INTAKE_REGION, DEFAULT_INTAKE_TABLE, DEFAULT_MAX_ATTEMPTS,
};

/// Interactively records a prospective customer in the customer table.
#[derive(Parser)]
#[command(name = "intake", about = "Add a prospective customer record")]
struct Cli {
    /// Customer table name
    #[arg(long, env = "INTAKE_TABLE", default_value = DEFAULT_INTAKE_TABLE)]
    table: String,
    /// AWS region hosting the table
    #[arg(long, env = "INTAKE_REGION", default_value = DEFAULT_INTAKE_REGION)]
    region: String,
    /// Candidates accepted before giving up on a unique customer ID
    #[arg(long, env = "INTAKE_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const ABANDONED_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_format, default_filter(cli.verbose));

    let config = IntakeConfig {
        table_name: cli.table,
        region: cli.region,
        max_attempts: cli.max_attempts,
    }
    .validate()?;

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;
    let store = DynamoCustomerStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );

    let stdin = io::stdin();
    let mut prompter = ConsolePrompter::new(stdin.lock(), io::stdout());

    match submit_customer(&mut prompter, &store, config.max_attempts) {
        Ok(SubmissionOutcome::Inserted { customer_id, .. }) => {
            println!("Customer {customer_id} added.");
            Ok(ExitCode::SUCCESS)
        }
        Ok(SubmissionOutcome::Abandoned { attempts }) => {
            eprintln!("No unique customer ID after {attempts} attempts; nothing was saved.");
            Ok(ExitCode::from(ABANDONED_EXIT_CODE))
        }
        Err(IntakeError::Store(error)) => {
            tracing::error!(
                component = "intake",
                event = "store_failure",
                error = %error,
                "customer was not saved"
            );
            eprintln!("ERROR: {error}");
            Ok(ExitCode::FAILURE)
        }
        Err(error) => Err(error.into()),
    }
}
