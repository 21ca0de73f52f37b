//! DarwinSniffer installer packager.
//!
//! Builds `DarwinSniffer.pkg` from `./Build/DarwinSniffer`.
//! Exit code 0 guarantees the package exists.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match darwinsniffer_release::cli::run_package().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
