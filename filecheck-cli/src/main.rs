// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stdout/print_stderr: CLI tools are expected to print to stdout/stderr for user output.
// - exit: Calling `std::process::exit()` is how the scan status reaches the shell.
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

mod cli;
mod logging;

#[tokio::main]
async fn main() {
    let code = match cli::run().await {
        Ok(status) => status.exit_code(),
        Err(e) => {
            let code = cli::exit_code_for(&e);
            if code == cli::EXIT_CONFIG {
                eprintln!("Error: {e}");
            } else {
                eprintln!("Error: {e:?}");
            }
            code
        }
    };
    std::process::exit(code);
}
