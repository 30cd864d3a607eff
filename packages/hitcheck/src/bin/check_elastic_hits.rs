// Monitoring plugin entry point
//
// stdout carries exactly one status line for the supervisor; logs go to stderr.

use std::process::ExitCode;

use clap::error::ErrorKind;
use elastic_client::ElasticClient;
use hitcheck::cli::Cli;
use hitcheck::verdict::unknown_line;
use hitcheck::{probe, Outcome, Severity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            println!("{}: invalid command line arguments", Severity::Unknown);
            return exit_code(Severity::Unknown.exit_code());
        }
    };

    init_logging(cli.verbose);

    let settings = cli.settings();
    let outcome = probe::run(&settings, || Ok(ElasticClient::new(cli.elastic_config()?)?)).await;

    match outcome {
        Ok(Outcome::Reset) => {
            tracing::info!("Event handler reset the counter");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Verdict(verdict)) => {
            println!("{}", verdict);
            exit_code(verdict.exit_code())
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Probe failed");
            println!("{}", unknown_line(&e));
            exit_code(Severity::Unknown.exit_code())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(3))
}
