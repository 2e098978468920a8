use std::process;

use scene_walker::cli::{Args, Command};
use tracing::Level;

fn main() {
    let args = Args::parse_args();

    init_logging(&args);

    let command = Command::from_args(args);
    process::exit(command.run());
}

/// Install the stderr log subscriber; verbosity comes straight from the
/// flags because settings are not loaded yet.
fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
