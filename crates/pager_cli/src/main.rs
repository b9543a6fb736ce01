mod app;
mod commands;
mod config;
mod effects;
mod movie;
mod render;

use std::process::ExitCode;

use pager_logging::{pager_error, LevelFilter};

use crate::config::{AppConfig, CliArgs};

fn main() -> ExitCode {
    let args = match CliArgs::parse(pico_args::Arguments::from_env()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "usage: pager [--config FILE] [--path COLLECTION] [--search TERM] [--accumulate] [--log file|terminal|both] [--log-file FILE]"
            );
            return ExitCode::from(2);
        }
    };

    pager_logging::initialize(args.log, LevelFilter::Info, &args.log_file);

    let config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            pager_error!("{}", err);
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    match app::run(config, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            pager_error!("{}", err);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
