use clap::Parser;

use run_lambda::cli::Cli;
use run_lambda::{invoke, logger};

#[tokio::main]
async fn main() {
    logger::init();
    let cli = Cli::parse();

    if let Err(err) = invoke::run(cli).await {
        log::error!("{err}");
        std::process::exit(err.exit_code());
    }
}
