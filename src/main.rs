//! kafkalite CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. Usage errors exit with
//! status 2 (clap); any other failure is printed to stderr with status 1.

use kafkalite::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
