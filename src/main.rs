use std::process::ExitCode;

fn main() -> ExitCode {
    chess_cli::run()
}
