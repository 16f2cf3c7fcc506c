use std::process::ExitCode;

fn main() -> ExitCode {
    shopquote_cli::run()
}
