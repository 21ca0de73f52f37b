//! Build and packaging tooling for DarwinSniffer.
//!
//! This library provides:
//! - [`xcode`]: clean Debug/Release builds of the Xcode project via `xcodebuild`
//! - [`pkg`]: macOS installer packages via `pkgbuild` and `productbuild`
//!
//! It backs the `darwinsniffer-build` and `darwinsniffer-package` executables.

pub mod cli;
pub mod error;
pub mod pkg;
pub mod tools;
mod utils;
pub mod xcode;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
