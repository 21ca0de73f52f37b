//! Xcode build configurations.

use std::fmt;

/// Build variant passed to `xcodebuild -configuration`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Configuration {
    /// Unoptimized build with debug symbols.
    Debug,
    /// Optimized build. The default.
    #[default]
    Release,
}

impl Configuration {
    /// Picks the configuration from the `--debug` flag.
    ///
    /// `--release` is the default, so only the debug flag decides.
    pub fn from_flags(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Release }
    }

    /// Name Xcode knows the configuration by.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
