use std::{io, process::ExitCode};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod command;
mod config;
mod data;
mod report;
mod util;

fn main() -> anyhow::Result<ExitCode> {
    // stdout carries the JSON report, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    command::run()
}
