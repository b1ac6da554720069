use std::process::ExitCode;

fn main() -> ExitCode {
    shopchat_cli::run()
}
