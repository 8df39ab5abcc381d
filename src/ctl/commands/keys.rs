use clap::Args;
use std::io::Write;

use crate::ctl::types::CtlError;
use crate::settings::SettingsStore;

#[derive(Args)]
pub struct KeysArgs {
    /// Only keys starting with this prefix (e.g., "Session")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Include timestamp and migration guard entries
    #[arg(long)]
    pub all: bool,
}

pub fn run(args: KeysArgs, store: &SettingsStore, out: &mut dyn Write) -> Result<(), CtlError> {
    let keys = store.keys(args.all)?;
    for key in keys
        .iter()
        .filter(|k| args.pattern.as_deref().map_or(true, |p| k.starts_with(p)))
    {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}
