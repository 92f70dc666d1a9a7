//! Entry point for the `fleetroute` command-line interface.
#![forbid(unsafe_code)]

use fleetroute_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr before exiting"
)]
fn main() {
    match fleetroute_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("fleetroute: {err}");
            std::process::exit(1);
        }
    }
}
