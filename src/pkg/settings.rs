//! Installer package settings and their builder.

use super::error::{Context, Error, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Version stamped on packages that don't set one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Install location handed to `pkgbuild` when none is set.
pub const DEFAULT_INSTALL_LOCATION: &str = "/";

/// Settings for one installer package.
///
/// Constructed via [`PkgSettingsBuilder`], which enforces:
/// - output path and bundle identifier are present and non-empty
/// - the identifier contains no whitespace
/// - the file structure has at least one entry
/// - every install destination is absolute and has no `..` components
///
/// # Examples
///
/// ```no_run
/// use darwinsniffer_release::pkg::PkgSettingsBuilder;
///
/// # fn example() -> darwinsniffer_release::pkg::Result<()> {
/// let settings = PkgSettingsBuilder::new()
///     .output("MyTool.pkg")
///     .identifier("com.example.mytool")
///     .file("./Build/mytool", "/usr/local/bin/mytool")
///     .title("MyTool")
///     .as_distribution(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkgSettings {
    output: PathBuf,
    identifier: String,
    version: String,
    install_location: PathBuf,
    file_structure: BTreeMap<PathBuf, PathBuf>,
    title: String,
    as_distribution: bool,
    preinstall_script: Option<PathBuf>,
    postinstall_script: Option<PathBuf>,
    welcome: Option<PathBuf>,
    readme: Option<PathBuf>,
    license: Option<PathBuf>,
    signing_identity: Option<String>,
}

impl PkgSettings {
    /// Settings for the DarwinSniffer installer.
    ///
    /// Installs `./Build/DarwinSniffer` as `/usr/local/bin/sniffme` inside a
    /// distribution-style `DarwinSniffer.pkg`. The same on every call.
    pub fn darwinsniffer() -> Result<Self> {
        PkgSettingsBuilder::new()
            .output("DarwinSniffer.pkg")
            .identifier("dev.github.oaky.darwinsniffer")
            .file("./Build/DarwinSniffer", "/usr/local/bin/sniffme")
            .title("DarwinSniffer")
            .as_distribution(true)
            .build()
    }

    /// Path of the package to produce.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Bundle identifier in reverse domain notation.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Package version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Root that payload paths are installed relative to.
    pub fn install_location(&self) -> &Path {
        &self.install_location
    }

    /// Source → install destination mapping.
    pub fn file_structure(&self) -> &BTreeMap<PathBuf, PathBuf> {
        &self.file_structure
    }

    /// Installer window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether to wrap the component package in a distribution archive.
    pub fn as_distribution(&self) -> bool {
        self.as_distribution
    }

    /// Script run by Installer before the payload is laid down.
    pub fn preinstall_script(&self) -> Option<&Path> {
        self.preinstall_script.as_deref()
    }

    /// Script run by Installer after the payload is laid down.
    pub fn postinstall_script(&self) -> Option<&Path> {
        self.postinstall_script.as_deref()
    }

    /// True when either install script is configured.
    pub fn has_scripts(&self) -> bool {
        self.preinstall_script.is_some() || self.postinstall_script.is_some()
    }

    /// Welcome document for the distribution.
    pub fn welcome(&self) -> Option<&Path> {
        self.welcome.as_deref()
    }

    /// Readme document for the distribution.
    pub fn readme(&self) -> Option<&Path> {
        self.readme.as_deref()
    }

    /// License document for the distribution.
    pub fn license(&self) -> Option<&Path> {
        self.license.as_deref()
    }

    /// True when any installer document (welcome, readme, license) is configured.
    pub fn has_resources(&self) -> bool {
        self.welcome.is_some() || self.readme.is_some() || self.license.is_some()
    }

    /// Installer signing identity passed to `--sign`.
    ///
    /// An identity of `"-"` is treated as unsigned.
    pub fn signing_identity(&self) -> Option<&str> {
        self.signing_identity.as_deref().filter(|id| *id != "-")
    }
}

/// Builder for [`PkgSettings`].
#[derive(Default)]
pub struct PkgSettingsBuilder {
    output: Option<PathBuf>,
    identifier: Option<String>,
    version: Option<String>,
    install_location: Option<PathBuf>,
    file_structure: BTreeMap<PathBuf, PathBuf>,
    title: Option<String>,
    as_distribution: bool,
    preinstall_script: Option<PathBuf>,
    postinstall_script: Option<PathBuf>,
    welcome: Option<PathBuf>,
    readme: Option<PathBuf>,
    license: Option<PathBuf>,
    signing_identity: Option<String>,
}

impl PkgSettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the package output path.
    ///
    /// # Required
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle identifier.
    ///
    /// # Required
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the package version.
    ///
    /// Default: [`DEFAULT_VERSION`]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the install location.
    ///
    /// Default: [`DEFAULT_INSTALL_LOCATION`]
    pub fn install_location<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.install_location = Some(path.as_ref().to_path_buf());
        self
    }

    /// Maps `source` on the build machine to `destination` on the target.
    ///
    /// Mapping the same source twice keeps the last destination.
    pub fn file<S: AsRef<Path>, D: AsRef<Path>>(mut self, source: S, destination: D) -> Self {
        self.file_structure.insert(
            source.as_ref().to_path_buf(),
            destination.as_ref().to_path_buf(),
        );
        self
    }

    /// Sets the installer title.
    ///
    /// Default: output file stem
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Wraps the component package in a distribution archive.
    ///
    /// Default: false
    pub fn as_distribution(mut self, as_distribution: bool) -> Self {
        self.as_distribution = as_distribution;
        self
    }

    pub fn preinstall_script<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.preinstall_script = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn postinstall_script<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.postinstall_script = Some(path.as_ref().to_path_buf());
        self
    }

    /// Welcome document shown by Installer.app (distribution only).
    pub fn welcome<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.welcome = Some(path.as_ref().to_path_buf());
        self
    }

    /// Readme document shown by Installer.app (distribution only).
    pub fn readme<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.readme = Some(path.as_ref().to_path_buf());
        self
    }

    /// License document shown by Installer.app (distribution only).
    pub fn license<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.license = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the installer signing identity.
    ///
    /// Example: "Developer ID Installer: Your Name (TEAMID)"
    pub fn signing_identity(mut self, identity: impl Into<String>) -> Self {
        self.signing_identity = Some(identity.into());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or an invariant listed on
    /// [`PkgSettings`] does not hold.
    pub fn build(self) -> Result<PkgSettings> {
        let output = self.output.context("output is required")?;
        if output.as_os_str().is_empty() {
            return Err(Error::InvalidSettings("output path is empty".into()));
        }

        let identifier = self.identifier.context("identifier is required")?;
        if identifier.is_empty() || identifier.chars().any(char::is_whitespace) {
            return Err(Error::InvalidSettings(format!(
                "bundle identifier {identifier:?} must be non-empty and contain no whitespace"
            )));
        }

        if self.file_structure.is_empty() {
            return Err(Error::InvalidSettings(
                "file structure must map at least one file".into(),
            ));
        }
        if let Some((source, destination)) = self
            .file_structure
            .iter()
            .find(|(_, destination)| !destination.has_root())
        {
            return Err(Error::InvalidSettings(format!(
                "install destination {} for {} must be absolute",
                destination.display(),
                source.display()
            )));
        }
        if let Some((source, destination)) = self.file_structure.iter().find(|(_, destination)| {
            destination
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        }) {
            return Err(Error::InvalidSettings(format!(
                "install destination {} for {} must not contain `..`",
                destination.display(),
                source.display()
            )));
        }

        let title = match self.title {
            Some(title) => title,
            None => output
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .context("output path has no file name to derive a title from")?,
        };

        Ok(PkgSettings {
            output,
            identifier,
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            install_location: self
                .install_location
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_LOCATION)),
            file_structure: self.file_structure,
            title,
            as_distribution: self.as_distribution,
            preinstall_script: self.preinstall_script,
            postinstall_script: self.postinstall_script,
            welcome: self.welcome,
            readme: self.readme,
            license: self.license,
            signing_identity: self.signing_identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PkgSettingsBuilder {
        PkgSettingsBuilder::new()
            .output("out/Tool.pkg")
            .identifier("com.example.tool")
            .file("./Build/tool", "/usr/local/bin/tool")
    }

    #[test]
    fn darwinsniffer_preset_is_fixed() {
        let settings = PkgSettings::darwinsniffer().unwrap();
        assert_eq!(settings.output(), Path::new("DarwinSniffer.pkg"));
        assert_eq!(settings.identifier(), "dev.github.oaky.darwinsniffer");
        assert_eq!(settings.title(), "DarwinSniffer");
        assert!(settings.as_distribution());
        assert_eq!(settings.version(), DEFAULT_VERSION);
        assert_eq!(settings.install_location(), Path::new("/"));

        let mapping: Vec<_> = settings.file_structure().iter().collect();
        assert_eq!(
            mapping,
            vec![(
                &PathBuf::from("./Build/DarwinSniffer"),
                &PathBuf::from("/usr/local/bin/sniffme")
            )]
        );

        assert_eq!(settings, PkgSettings::darwinsniffer().unwrap());
    }

    #[test]
    fn title_defaults_to_output_stem() {
        let settings = minimal().build().unwrap();
        assert_eq!(settings.title(), "Tool");
        assert!(!settings.as_distribution());
        assert!(!settings.has_scripts());
        assert!(!settings.has_resources());
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let err = PkgSettingsBuilder::new()
            .output("Tool.pkg")
            .file("a", "/a")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "identifier is required");
    }

    #[test]
    fn identifier_with_whitespace_is_rejected() {
        let err = minimal().identifier("com.example my tool").build().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn empty_file_structure_is_rejected() {
        let err = PkgSettingsBuilder::new()
            .output("Tool.pkg")
            .identifier("com.example.tool")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn relative_destination_is_rejected() {
        let err = minimal().file("./Build/other", "usr/bin/other").build().unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn parent_dir_destination_is_rejected() {
        let err = minimal().file("./Build/other", "/usr/../etc/other").build().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(ref msg) if msg.contains("..")));
    }

    #[test]
    fn adhoc_signing_identity_means_unsigned() {
        assert_eq!(minimal().signing_identity("-").build().unwrap().signing_identity(), None);
        assert_eq!(
            minimal()
                .signing_identity("Developer ID Installer: Example (TEAMID)")
                .build()
                .unwrap()
                .signing_identity(),
            Some("Developer ID Installer: Example (TEAMID)")
        );
    }
}
