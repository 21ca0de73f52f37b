//! External tool discovery.
//!
//! The driver and packager shell out to Apple's command line tools. Each tool is
//! configured as a bare name (searched on `PATH`) or an explicit path.

use std::path::{Path, PathBuf};

/// Default name of the Xcode build tool.
pub const XCODEBUILD: &str = "xcodebuild";

/// Default name of the component package builder.
pub const PKGBUILD: &str = "pkgbuild";

/// Default name of the product archive builder.
pub const PRODUCTBUILD: &str = "productbuild";

/// Resolves a configured tool to an executable path.
///
/// Bare names are looked up on `PATH`; values containing a path separator are
/// checked in place.
pub fn locate(tool: &Path) -> which::Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool.display(), path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found: {}", tool.display(), e);
            Err(e)
        }
    }
}
