use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use pkg_retention::config::{ActionConfig, DEFAULT_PROBE_URL};
use pkg_retention::repository::PackagecloudRepository;
use pkg_retention::repository::probe::check_connectivity;
use pkg_retention::{action, logging};

/// Exit status when some planned deletions failed
const EXIT_DELETION_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "pkg-retention")]
#[command(version, about = "Delete old package versions from a Packagecloud repository")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a URL can be reached, then exit
    Test {
        #[arg(long, default_value = DEFAULT_PROBE_URL)]
        url: String,
    },
}

async fn probe(url: &str) -> ExitCode {
    match check_connectivity(url).await {
        Ok(status) => {
            info!("Response code is {}", status);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error during test sequence: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cleanup() -> anyhow::Result<ExitCode> {
    let config = match ActionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let repository =
        PackagecloudRepository::packagecloud(&config.username, &config.repository, &config.token)
            .with_package_type(config.package_type.clone());

    let summary = action::run(&config, &repository, &mut std::io::stdout()).await?;

    if summary.execution.has_failures() {
        return Ok(ExitCode::from(EXIT_DELETION_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.json);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Command::Test { url }) => Ok(runtime.block_on(probe(&url))),
        None => runtime.block_on(cleanup()),
    }
}
