//! Reads a minimum degree and keys from stdin and prints the B-tree by level.
//!
//! Logging goes to stderr; set `RUST_LOG` (default `warn`) to adjust it.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    match mwtree_levels::run(stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
