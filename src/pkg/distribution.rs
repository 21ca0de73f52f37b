//! Distribution product archives with `productbuild`.
//!
//! A distribution package wraps the component package with Installer.app
//! metadata: window title, optional welcome/readme/license pages and a single
//! hidden choice that installs the component.

use super::{
    error::{Context, ErrorExt, Result},
    exec::run_tool,
    settings::PkgSettings,
};
use crate::utils::fs;
use handlebars::Handlebars;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DISTRIBUTION_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<installer-gui-script minSpecVersion="2">
    <title>{{title}}</title>
{{#if welcome}}    <welcome file="{{welcome}}"/>
{{/if}}{{#if readme}}    <readme file="{{readme}}"/>
{{/if}}{{#if license}}    <license file="{{license}}"/>
{{/if}}    <options customize="never" require-scripts="false" hostArchitectures="x86_64,arm64"/>
    <domains enable_localSystem="true"/>
    <choices-outline>
        <line choice="default">
            <line choice="{{identifier}}"/>
        </line>
    </choices-outline>
    <choice id="default"/>
    <choice id="{{identifier}}" visible="false">
        <pkg-ref id="{{identifier}}"/>
    </choice>
    <pkg-ref id="{{identifier}}" version="{{version}}" onConclusion="none">#{{component}}</pkg-ref>
</installer-gui-script>
"#;

#[derive(Serialize)]
struct DistributionData<'a> {
    title: &'a str,
    identifier: &'a str,
    version: &'a str,
    component: &'a str,
    welcome: Option<String>,
    readme: Option<String>,
    license: Option<String>,
}

/// File name a resource document is referenced by inside the archive.
fn resource_name(path: Option<&Path>) -> Option<String> {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Renders the `Distribution` XML for `settings`.
///
/// `component` is the file name of the component package inside the
/// `--package-path` directory. Values are XML-escaped.
pub fn render(settings: &PkgSettings, component: &str) -> Result<String> {
    let data = DistributionData {
        title: settings.title(),
        identifier: settings.identifier(),
        version: settings.version(),
        component,
        welcome: resource_name(settings.welcome()),
        readme: resource_name(settings.readme()),
        license: resource_name(settings.license()),
    };

    Ok(Handlebars::new().render_template(DISTRIBUTION_TEMPLATE, &data)?)
}

/// Copies welcome/readme/license documents into `resources_dir`.
///
/// Returns `None` when no document is configured.
pub async fn stage_resources(
    settings: &PkgSettings,
    resources_dir: &Path,
) -> Result<Option<PathBuf>> {
    if !settings.has_resources() {
        return Ok(None);
    }

    fs::create_dir_all(resources_dir, true).await?;
    for source in [settings.welcome(), settings.readme(), settings.license()]
        .into_iter()
        .flatten()
    {
        if let Some(name) = source.file_name() {
            fs::copy_file(source, &resources_dir.join(name)).await?;
        }
    }

    Ok(Some(resources_dir.to_path_buf()))
}

/// Builds the `productbuild` argument list.
pub fn productbuild_args(
    settings: &PkgSettings,
    distribution: &Path,
    package_path: &Path,
    resources: Option<&Path>,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--distribution".into(),
        distribution.into(),
        "--package-path".into(),
        package_path.into(),
    ];

    if let Some(resources) = resources {
        args.push("--resources".into());
        args.push(resources.into());
    }

    if let Some(identity) = settings.signing_identity() {
        args.push("--sign".into());
        args.push(identity.into());
    }

    args.push(output.into());
    args
}

/// Writes the distribution file and runs `productbuild`.
///
/// `component` must already exist; its directory is used as the package path.
pub async fn run(
    program: &Path,
    settings: &PkgSettings,
    component: &Path,
    work_dir: &Path,
    output: &Path,
) -> Result<()> {
    let component_name = component
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Invalid component package path: {}", component.display()))?;
    let package_path = component.parent().unwrap_or(work_dir);

    let distribution = work_dir.join("Distribution");
    let xml = render(settings, &component_name)?;
    tokio::fs::write(&distribution, xml)
        .await
        .fs_context("writing distribution file", &distribution)?;

    let resources = stage_resources(settings, &work_dir.join("Resources")).await?;

    log::info!("Running productbuild for {}...", settings.title());
    run_tool(
        "productbuild",
        program,
        &productbuild_args(
            settings,
            &distribution,
            package_path,
            resources.as_deref(),
            output,
        ),
    )
    .await?;
    log::info!("✓ Built distribution package: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::PkgSettingsBuilder;

    #[test]
    fn darwinsniffer_distribution() {
        let settings = PkgSettings::darwinsniffer().unwrap();
        let xml = render(&settings, "component.pkg").unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<title>DarwinSniffer</title>"));
        assert!(xml.contains(
            r##"<pkg-ref id="dev.github.oaky.darwinsniffer" version="1.0.0" onConclusion="none">#component.pkg</pkg-ref>"##
        ));
        assert!(xml.contains(r#"<line choice="dev.github.oaky.darwinsniffer"/>"#));
        assert!(!xml.contains("<welcome"));
        assert!(!xml.contains("<license"));
    }

    #[test]
    fn title_is_escaped() {
        let settings = PkgSettingsBuilder::new()
            .output("Tool.pkg")
            .identifier("com.example.tool")
            .file("tool", "/usr/local/bin/tool")
            .title("Tools & <Things>")
            .build()
            .unwrap();
        let xml = render(&settings, "c.pkg").unwrap();
        assert!(xml.contains("<title>Tools &amp; &lt;Things&gt;</title>"));
    }

    #[test]
    fn documents_are_referenced_by_file_name() {
        let settings = PkgSettingsBuilder::new()
            .output("Tool.pkg")
            .identifier("com.example.tool")
            .file("tool", "/usr/local/bin/tool")
            .welcome("docs/welcome.rtf")
            .license("LICENSE.txt")
            .as_distribution(true)
            .build()
            .unwrap();
        let xml = render(&settings, "c.pkg").unwrap();
        assert!(xml.contains(r#"<welcome file="welcome.rtf"/>"#));
        assert!(xml.contains(r#"<license file="LICENSE.txt"/>"#));
        assert!(!xml.contains("<readme"));
    }

    #[test]
    fn productbuild_args_order() {
        let settings = PkgSettings::darwinsniffer().unwrap();
        let args: Vec<String> = productbuild_args(
            &settings,
            Path::new("/w/Distribution"),
            Path::new("/w"),
            Some(Path::new("/w/Resources")),
            Path::new("DarwinSniffer.pkg"),
        )
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
        assert_eq!(
            args,
            vec![
                "--distribution",
                "/w/Distribution",
                "--package-path",
                "/w",
                "--resources",
                "/w/Resources",
                "DarwinSniffer.pkg",
            ]
        );
    }

    #[tokio::test]
    async fn resources_are_copied() {
        let tmp = tempfile::tempdir().unwrap();
        let readme = tmp.path().join("README.rtf");
        std::fs::write(&readme, "{\\rtf1 hi}").unwrap();

        let settings = PkgSettingsBuilder::new()
            .output("Tool.pkg")
            .identifier("com.example.tool")
            .file("tool", "/usr/local/bin/tool")
            .readme(&readme)
            .build()
            .unwrap();

        let dir = tmp.path().join("Resources");
        let staged = stage_resources(&settings, &dir).await.unwrap();
        assert_eq!(staged.as_deref(), Some(dir.as_path()));
        assert!(dir.join("README.rtf").is_file());
    }
}
