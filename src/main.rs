use std::process::ExitCode;

fn main() -> miette::Result<ExitCode> {
    tapline::cli::run()
}
