//! DarwinSniffer build driver.
//!
//! Runs a clean `xcodebuild` of the DarwinSniffer project and exits with
//! xcodebuild's own exit code.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match darwinsniffer_release::cli::run_build().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
