mod create;

use anyhow::Result;
use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    create::run(cli)
}
