//! gscope binary entry point.

use std::process::ExitCode;

use gitscope::cli::{self, Cli};
use gitscope::ui::output::{self, Verbosity};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the level follows `--quiet`/`--debug`.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(Verbosity::from_flags(cli.quiet, cli.debug));

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
