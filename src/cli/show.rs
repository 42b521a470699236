//! Read-only commands: resolve, show, get, category, categories.

use crate::config::{ConfigLoader, ConfigStore};
use crate::format::{OutputFormat, format_records_text, to_json};
use anyhow::Result;
use clap::Args;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration name
    pub name: String,
}

/// Arguments for the category subcommand
#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category name
    pub name: String,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Print the chosen config file.
pub fn run_resolve(loader: &ConfigLoader) -> Result<()> {
    let resolved = loader.resolver().resolve()?;
    println!("{} ({})", resolved.path.display(), resolved.source);
    Ok(())
}

pub fn run_show(loader: &ConfigLoader, store: &dyn ConfigStore, args: &ShowArgs) -> Result<()> {
    let registry = loader.load(store, false)?;
    match args.format {
        OutputFormat::Text => print!("{}", format_records_text(registry.records())),
        OutputFormat::Json => println!("{}", to_json(&registry)?),
    }
    Ok(())
}

/// Print one value. Returns whether the name was found.
pub fn run_get(loader: &ConfigLoader, store: &dyn ConfigStore, args: &GetArgs) -> Result<bool> {
    let registry = loader.load(store, false)?;
    let (record, found) = registry.lookup(&args.name);
    if found {
        println!("{}", record.value);
    }
    Ok(found)
}

pub fn run_category(
    loader: &ConfigLoader,
    store: &dyn ConfigStore,
    args: &CategoryArgs,
) -> Result<()> {
    let registry = loader.load(store, false)?;
    let view = registry.get_category(&args.name);
    match args.format {
        OutputFormat::Text => print!("{}", format_records_text(view.values())),
        OutputFormat::Json => println!("{}", to_json(&*view)?),
    }
    Ok(())
}

pub fn run_categories(loader: &ConfigLoader, store: &dyn ConfigStore) -> Result<()> {
    let registry = loader.load(store, false)?;
    for name in registry.category_names() {
        println!("{}", name);
    }
    Ok(())
}
