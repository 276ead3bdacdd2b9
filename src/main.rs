use std::process::ExitCode;

use clap::Parser;
use genesweep::runtime;
use genesweep::runtime::Commands;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    // trace, debug, info, warn, error or off. RUST_LOG overrides
    #[arg(long = "log-level", global = true, env = "GENESWEEP_LOG_LEVEL", default_value = "info")]
    log_level: runtime::LogLevel,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    runtime::Config::init(cli.log_level);
    log::debug!("Running {:?}", cli.command);

    let result = match cli.command {
        Commands::Run(mut cmd) => cmd.try_execute(),
        Commands::Resolve(mut cmd) => cmd.try_execute().map(|_| 0),
        Commands::Script(mut cmd) => cmd.try_execute().map(|_| 0),
        Commands::Submit(mut cmd) => cmd.try_execute().map(|_| 0),
        Commands::Accounting(mut cmd) => cmd.try_execute().map(|_| 0),
    };

    match result {
        Ok(code) => ExitCode::from((code & 0xff) as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
