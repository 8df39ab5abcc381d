use clap::Parser;
use std::process;

use prefstore::ctl::PrefCtl;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = PrefCtl::parse();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = cli.run(&mut stdout) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
