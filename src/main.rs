use std::process::ExitCode;

use clap::Parser;

use vectorlint_action::config::Cli;
use vectorlint_action::{app, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    app::run_guarded(|| app::run(cli), logging::set_failed)
}
