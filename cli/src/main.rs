use crate::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let _guard = logging::init(&cli.log_options());
    cli.run().await
}
