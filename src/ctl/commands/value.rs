use clap::Args;
use std::io::Write;

use crate::ctl::types::CtlError;
use crate::settings::{SettingsStore, Value};

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,

    /// JSON scalar or flat object, e.g. `"text"`, `42`, `{"a": 1}`
    pub value: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub key: String,
}

pub fn get(args: GetArgs, store: &SettingsStore, out: &mut dyn Write) -> Result<(), CtlError> {
    match store.get(&args.key) {
        Some(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
        None => writeln!(out, "(absent)")?,
    }
    Ok(())
}

pub fn set(args: SetArgs, store: &SettingsStore, out: &mut dyn Write) -> Result<(), CtlError> {
    let value: Value = serde_json::from_str(&args.value)?;
    store.set(&args.key, value)?;
    writeln!(out, "OK")?;
    Ok(())
}

pub fn remove(args: RemoveArgs, store: &SettingsStore, out: &mut dyn Write) -> Result<(), CtlError> {
    store.remove(&args.key)?;
    writeln!(out, "OK")?;
    Ok(())
}
