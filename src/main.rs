mod annotations;
mod app;
mod capture;
mod clipboard;
mod config;
mod countdown;
mod domain;
mod output;
mod render;
mod session;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = app::Cli::parse();
    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("snipmark: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
