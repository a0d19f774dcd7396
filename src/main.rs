use clap::Parser;
use std::process::ExitCode;

use sqlkv::cli::{Cli, Command};
use sqlkv::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Kv(action) => {
            logging::init_logging("warn", cli.log_json);
            commands::kv::execute(&cli.path, action)
        },
        Command::Serve(args) => {
            logging::init_logging("info", cli.log_json);
            tokio::runtime::Runtime::new()
                .map_err(anyhow::Error::from)
                .and_then(|rt| rt.block_on(commands::serve::execute(args)))
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
