use std::io;
use std::process::ExitCode;

use api_smoke_driver::{Cli, SmokeDriver};
use clap::Parser;
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    pretty_env_logger::formatted_builder()
        .parse_filters(&cli.log_level)
        .init();

    let mut driver = SmokeDriver::new(cli.into_settings(), io::stdout().lock());
    if let Err(err) = driver.run().await {
        error!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
