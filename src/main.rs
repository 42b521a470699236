//! zmconf
//!
//! Resolves runtime configuration from a key/value file and the `Config`
//! table, and prints or watches the merged result.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use zmconf::cli::{Cli, Command, loader_for, open_store, show, watch};
use zmconf::logging::{LogTarget, init_tracing};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(&LogTarget::parse(&cli.log), cli.verbose)?;

    let settings = cli.settings()?;
    let loader = loader_for(&settings);

    match cli.command {
        Command::Resolve => show::run_resolve(&loader)?,
        Command::Show(ref args) => {
            let store = open_store(&settings)?;
            show::run_show(&loader, store.as_ref(), args)?;
        }
        Command::Get(ref args) => {
            let store = open_store(&settings)?;
            if !show::run_get(&loader, store.as_ref(), args)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Category(ref args) => {
            let store = open_store(&settings)?;
            show::run_category(&loader, store.as_ref(), args)?;
        }
        Command::Categories => {
            let store = open_store(&settings)?;
            show::run_categories(&loader, store.as_ref())?;
        }
        Command::Watch => {
            let store = open_store(&settings)?;
            watch::run_watch(&loader, store.as_ref()).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
