use std::process::ExitCode;

use clap::Parser;
use svgshot::cli::{self, RasterizeArgs};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_logging();
    let args = RasterizeArgs::parse();

    match cli::rasterize(args).await {
        Ok(result) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
