use std::process::ExitCode;

fn main() -> ExitCode {
    chatci_cli::run()
}
