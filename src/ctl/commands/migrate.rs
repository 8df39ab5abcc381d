use clap::Args;
use std::io::Write;

use crate::ctl::types::CtlError;
use crate::settings::SettingsStore;

#[derive(Args)]
pub struct MigrateArgs {
    /// Service the migration belongs to; it runs at most once per service
    #[arg(short, long)]
    pub service: String,

    /// Renames as `old=new`
    #[arg(required = true)]
    pub pairs: Vec<String>,
}

fn parse_pair(pair: &str) -> Result<(String, String), CtlError> {
    match pair.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(CtlError::InvalidArgument(format!(
            "expected old=new, got {:?}",
            pair
        ))),
    }
}

pub fn run(args: MigrateArgs, store: &SettingsStore, out: &mut dyn Write) -> Result<(), CtlError> {
    let mapping = args
        .pairs
        .iter()
        .map(|p| parse_pair(p))
        .collect::<Result<Vec<_>, _>>()?;

    let report = store.migrate_keys(mapping, &args.service)?;
    if report.skipped {
        writeln!(out, "already migrated for {}", args.service)?;
        return Ok(());
    }
    for key in &report.moved {
        writeln!(out, "moved {}", key)?;
    }
    for key in &report.kept_existing {
        writeln!(out, "dropped {} (target already set)", key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("a=b").unwrap(),
            ("a".to_string(), "b".to_string())
        );
        assert!(matches!(parse_pair("ab"), Err(CtlError::InvalidArgument(_))));
        assert!(matches!(parse_pair("=b"), Err(CtlError::InvalidArgument(_))));
    }
}
