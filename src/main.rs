mod app;
mod canvas;
mod cli;
mod config;
mod input;
mod logging;
mod terminal;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    app::run(cli::Args::parse())
}
