use std::process::ExitCode;

fn main() -> ExitCode {
    docreg::cli::run()
}
