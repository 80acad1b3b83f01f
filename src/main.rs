mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod history;
mod output;
mod pricing;
mod provider;
mod thinking;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::Config;

/// stderr logging; `RUST_LOG` wins over `--debug`
fn init_tracing(debug: bool) {
    let default = if debug { "mmcost=debug" } else { "mmcost=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let loaded = Config::load();
    let cli = Cli::parse().with_config(&loaded.config);
    init_tracing(cli.debug);
    loaded.report();

    let result = App::new(cli, loaded.config).and_then(|app| app.run());
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
