pub mod cli;
pub mod dispatch;
pub mod fixture;
pub mod logging;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    dispatch::run(cli)
}
