//! `airlock fetch` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use airlock_core::config::AirlockConfig;
use airlock_core::error::{AirlockError, ConfigError};
use airlock_core::types::{Request, RequestOutput};
use airlock_yarn_classic::{Prefetcher, YarnClassicConfig};

use crate::cli::FetchArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `fetch` command.
///
/// Resolves every locked dependency of the project to a provenance record,
/// populates the offline mirror under the output root, and renders the
/// resulting manifest. Fails without producing a manifest if any entry
/// cannot be classified or the install step fails.
pub async fn execute(
    args: FetchArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;

    if !config.yarn.enabled {
        return Err(CliError::Command(
            "yarn prefetcher is disabled in configuration".to_owned(),
        ));
    }

    let mut prefetch_config = YarnClassicConfig::from_core(&config.yarn);
    if let Some(command) = args.yarn_command {
        prefetch_config.yarn_command = command;
    }

    let package_dirs = if args.package_dirs.is_empty() {
        config.yarn.package_dirs.clone()
    } else {
        args.package_dirs
    };
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.general.output_dir));

    let request = Request {
        project_root: args.project_root,
        package_dirs,
        output_dir,
    };

    info!(
        project_root = %request.project_root.display(),
        output_dir = %request.output_dir.display(),
        "starting dependency prefetch"
    );

    let prefetcher = Prefetcher::builder().config(prefetch_config).build()?;
    let manifest = prefetcher.prefetch(&request).await?;

    let report = FetchReport::new(&request, &manifest);
    writer.render(&report)?;

    Ok(())
}

/// Load configuration, falling back to defaults when no file exists.
///
/// A missing config file is not an error for `fetch` -- the defaults cover
/// the common single-directory project. Any other load failure is fatal.
async fn load_config(config_path: &Path) -> Result<AirlockConfig, CliError> {
    match AirlockConfig::load(config_path).await {
        Ok(config) => Ok(config),
        Err(AirlockError::Config(ConfigError::FileNotFound { path })) => {
            debug!(path, "no configuration file, using defaults");
            Ok(AirlockConfig::default())
        }
        Err(e) => Err(CliError::Config(e.to_string())),
    }
}

/// One resolved component in the fetch report.
#[derive(Serialize)]
pub struct ComponentReport {
    /// Package name
    pub name: String,
    /// Locked version
    pub version: String,
    /// Provenance kind (registry, git, url, file, link)
    pub provenance: String,
    /// Integrity hash, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

/// Build-time environment variable in the fetch report.
#[derive(Serialize)]
pub struct EnvVarReport {
    /// Variable name
    pub name: String,
    /// Variable value (may contain the output-root placeholder)
    pub value: String,
}

/// Fetch result rendered to the user.
#[derive(Serialize)]
pub struct FetchReport {
    /// Project root that was prefetched
    pub project_root: String,
    /// Output root containing the offline mirror
    pub output_dir: String,
    /// Resolved components in lockfile order
    pub components: Vec<ComponentReport>,
    /// Environment variables a downstream build must export
    pub environment_variables: Vec<EnvVarReport>,
}

impl FetchReport {
    fn new(request: &Request, manifest: &RequestOutput) -> Self {
        Self {
            project_root: request.project_root.display().to_string(),
            output_dir: request.output_dir.display().to_string(),
            components: manifest
                .components
                .iter()
                .map(|c| ComponentReport {
                    name: c.name.clone(),
                    version: c.version.clone(),
                    provenance: c.provenance.to_string(),
                    integrity: c.integrity.clone(),
                })
                .collect(),
            environment_variables: manifest
                .environment_variables
                .iter()
                .map(|v| EnvVarReport {
                    name: v.name.clone(),
                    value: v.value.clone(),
                })
                .collect(),
        }
    }
}

impl Render for FetchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Prefetch: {}", self.project_root.bold())?;
        writeln!(w, "  Output: {}", self.output_dir)?;
        writeln!(w)?;

        writeln!(w, "Components ({}):", self.components.len())?;
        writeln!(w, "{:<40} {:<16} {:<10}", "Name", "Version", "Provenance")?;
        writeln!(w, "{}", "-".repeat(68))?;
        for component in &self.components {
            writeln!(
                w,
                "{:<40} {:<16} {:<10}",
                component.name, component.version, component.provenance
            )?;
        }

        writeln!(w)?;
        writeln!(w, "Build environment:")?;
        for var in &self.environment_variables {
            writeln!(w, "  {}={}", var.name, var.value)?;
        }

        writeln!(w)?;
        writeln!(w, "{} offline mirror populated", "✓".green().bold())?;

        Ok(())
    }
}
