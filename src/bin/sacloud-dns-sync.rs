mod cli;
mod executor;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use log::{debug, error, info};

use sacloud_dns_sync::provider::{Provider, SakuraCloudProvider};

use cli::{Cli, Command};
use executor::{read_changes, Executor};

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new().filter_level(cli.loglevel.into()).init();

    if cli.dry_run {
        info!("Running in dry-run mode, no changes to the DNS zones will be made");
    }

    let provider =
        match SakuraCloudProvider::from_config(&cli.provider_config(), cli.domain_filter(), cli.dry_run) {
            Ok(p) => p,
            Err(e) => {
                error!("Unable to create provider: {}", e);
                return ExitCode::FAILURE;
            }
        };
    if provider.domain_filter().is_configured() {
        debug!("Using domain filter {:?}", provider.domain_filter());
    }

    match run(&cli, &provider) {
        Ok(_) => {
            info!("Completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, provider: &dyn Provider) -> Result<(), executor::ExecutorError> {
    let executor = Executor::new(provider);

    match &cli.command {
        Command::Records => {
            let records = executor.records()?;
            let out = serde_json::to_string_pretty(&records)
                .map_err(|e| executor::ExecutorError::Output(e.to_string()))?;
            println!("{}", out);
        }
        Command::Apply { changes } => {
            let changes = read_changes(changes)?;
            let result = executor.apply(&changes)?;
            info!(
                "Applied {} creations, {} updates and {} deletions",
                result.create, result.update, result.delete
            );
        }
    }
    Ok(())
}
