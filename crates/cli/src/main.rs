use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    pantry_cli::run().await
}
