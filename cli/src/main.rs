mod commands;
mod terminal;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use hmdlink_common::config::Config;
use hmdlink_common::error::HmdError;
use tracing::{error, warn};

use commands::{CommandLine, Commands, connect, device, logs, screen, status};
use terminal::{logging, print};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let commands = match CommandLine::try_parse() {
        Ok(commands) => commands,
        // Usage errors exit 1 like every other failure; help and version exit 0.
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    logging::init_logging(commands.verbose, commands.quiet);
    let cfg = commands.config();

    let Some(command) = commands.command else {
        let _ = CommandLine::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(command, &cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, cfg: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Connect { team, subnet } => connect::connect(team, subnet, cfg).await,
        Commands::StopWireless => device::stop_wireless(cfg).await,
        Commands::Setup => device::setup(cfg).await,
        Commands::Restart => device::restart(cfg).await,
        Commands::Redeploy { apk } => device::redeploy(&apk, cfg).await,
        Commands::Screen => screen::screen(cfg).await,
        Commands::Reboot => device::reboot(cfg).await,
        Commands::Shutdown => device::shutdown(cfg).await,
        Commands::Status => status::status(cfg).await,
        Commands::Logs { filter } => logs::logs(filter.as_deref(), cfg).await,
    }
}

/// Connection problems are printed as warnings, everything else as errors.
fn report(err: &anyhow::Error) {
    let Some(hmd) = err.downcast_ref::<HmdError>() else {
        error!("{err:#}");
        return;
    };

    if hmd.is_transient() {
        warn!("{hmd}");
    } else {
        error!("{hmd}");
    }
    if let Some(hint) = hmd.hint() {
        print::print_status(hint);
    }
}
