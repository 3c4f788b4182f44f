use env_logger::Env;
use log::error;

use disaster_etl::cli::{CliOutcome, USAGE, parse_cli_to_app_config};
use disaster_etl::orchestrator::run_pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = match parse_cli_to_app_config(std::env::args_os()) {
        CliOutcome::Run(cfg) => cfg,
        CliOutcome::Usage => {
            println!("{}", USAGE);
            return;
        }
    };

    if let Err(e) = run_pipeline(&cfg).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
