//! `airlock config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use airlock_core::config::AirlockConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Attempts to load and validate the configuration file, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing fields, invalid values, parse errors).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let result = AirlockConfig::load(config_path).await;

    let report = match result {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Loads and displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if the
/// section name is invalid.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = AirlockConfig::load(config_path).await?;

    let report = if let Some(section_name) = section {
        match section_name.as_str() {
            "general" => ConfigReport {
                source: config_path.display().to_string(),
                section: Some("general".to_owned()),
                config_toml: toml::to_string_pretty(&config.general)
                    .unwrap_or_else(|e| format!("(serialization error: {})", e)),
            },
            "yarn" => ConfigReport {
                source: config_path.display().to_string(),
                section: Some("yarn".to_owned()),
                config_toml: toml::to_string_pretty(&config.yarn)
                    .unwrap_or_else(|e| format!("(serialization error: {})", e)),
            },
            _ => {
                return Err(CliError::Command(format!(
                    "unknown section: {} (expected: general, yarn)",
                    section_name
                )));
            }
        }
    } else {
        ConfigReport {
            source: config_path.display().to_string(),
            section: None,
            config_toml: toml::to_string_pretty(&config)
                .unwrap_or_else(|e| format!("(serialization error: {})", e)),
        }
    };

    writer.render(&report)?;

    Ok(())
}

/// Configuration display report.
///
/// Contains the source file path and serialized TOML configuration.
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
///
/// Contains validation result and any error messages encountered.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_report_render_text_full_config() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: None,
            config_toml: "[general]\nlog_level = \"info\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Configuration"), "should contain header");
        assert!(
            output.contains("test.toml"),
            "should contain source filename"
        );
        assert!(
            output.contains("log_level"),
            "should contain config content"
        );
    }

    #[test]
    fn test_config_report_render_text_specific_section() {
        let report = ConfigReport {
            source: "/etc/airlock.toml".to_owned(),
            section: Some("yarn".to_owned()),
            config_toml: "lockfile_name = \"yarn.lock\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[yarn]"), "should show section name");
        assert!(
            output.contains("lockfile_name"),
            "should show config content"
        );
    }

    #[test]
    fn test_config_report_json_serialization() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: Some("yarn".to_owned()),
            config_toml: "enabled = true".to_owned(),
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["source"].as_str(), Some("test.toml"));
        assert_eq!(parsed["section"].as_str(), Some("yarn"));
        // config_toml is skipped in serialization
        assert!(
            parsed.get("config_toml").is_none(),
            "config_toml should be skipped"
        );
    }

    #[test]
    fn test_config_validation_report_valid() {
        let report = ConfigValidationReport {
            source: "airlock.toml".to_owned(),
            valid: true,
            errors: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("VALID"), "should show valid status");
        assert!(!output.contains("Error:"), "should not show errors");
    }

    #[test]
    fn test_config_validation_report_invalid() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            errors: vec!["yarn.lockfile_name: must be a bare file name".to_owned()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"), "should show invalid status");
        assert!(
            output.contains("bare file name"),
            "should show error message"
        );
    }

    #[test]
    fn test_config_validation_report_json() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            errors: vec!["error message".to_owned()],
        };

        let json = serde_json::to_string(&report).expect("JSON serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        assert_eq!(parsed["valid"].as_bool(), Some(false));
        assert_eq!(
            parsed["errors"].as_array().expect("should be array").len(),
            1
        );
    }
}
