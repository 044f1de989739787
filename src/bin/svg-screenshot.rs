use std::process::ExitCode;

use clap::Parser;
use svgshot::cli::{self, ScreenshotArgs};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_logging();
    let args = ScreenshotArgs::parse();

    // Success is silent; the written file is the result
    match cli::screenshot(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
