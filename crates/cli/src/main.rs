use std::process::ExitCode;

fn main() -> ExitCode {
    freightrank_cli::run()
}
