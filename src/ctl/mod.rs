pub mod client;
pub mod commands;
pub mod types;

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::settings::SettingsStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct PrefCtl {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "prefstore.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List keys
    Keys(commands::keys::KeysArgs),

    /// Print a value as JSON
    Get(commands::value::GetArgs),

    /// Store a JSON value
    Set(commands::value::SetArgs),

    /// Remove a key
    Remove(commands::value::RemoveArgs),

    /// Rename keys once for a service
    Migrate(commands::migrate::MigrateArgs),
}

impl PrefCtl {
    pub fn run(self, out: &mut dyn Write) -> Result<(), types::CtlError> {
        let store = client::open_store(&self.config)?;
        self.command.run(&store, out)?;
        store.flush()?;
        Ok(())
    }
}

impl Commands {
    pub fn run(self, store: &SettingsStore, out: &mut dyn Write) -> Result<(), types::CtlError> {
        match self {
            Commands::Keys(args) => commands::keys::run(args, store, out),
            Commands::Get(args) => commands::value::get(args, store, out),
            Commands::Set(args) => commands::value::set(args, store, out),
            Commands::Remove(args) => commands::value::remove(args, store, out),
            Commands::Migrate(args) => commands::migrate::run(args, store, out),
        }
    }
}
