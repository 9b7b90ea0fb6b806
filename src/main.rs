mod cli;
mod commands;
mod config;
mod error;
mod materialize;
mod prompt;
mod report;
mod runner;
mod secret;

use clap::Parser;
use cli::Cli;

fn main() {
    if let Err(err) = commands::run(Cli::parse()) {
        report::fatal(&err);
        std::process::exit(1);
    }
}
