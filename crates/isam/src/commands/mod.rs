//! CLI command handlers.

pub mod config;
pub mod dsc;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use console::Style;
use isam_client::{ApplianceClient, ApplianceFacts, ReturnObject};
use isam_config::ApplianceConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, overriding the XDG location.
    pub config_path: Option<PathBuf>,
    /// Selected appliance context name.
    pub context: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Path of the config file in use.
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_path.clone().or_else(isam_config::config_path)
    }

    /// Load the appliance config.
    pub fn load_config(&self) -> Result<ApplianceConfig> {
        Ok(isam_config::load_config_from(self.config_file().as_deref())?)
    }

    /// Build a client for the named context, or the selected one.
    pub fn appliance(&self, name: Option<&str>) -> Result<ApplianceClient> {
        let config = self.load_config()?;
        let entry = config.resolve(name.or(self.context.as_deref()))?;
        let password = entry.resolve_password()?;

        let mut facts = ApplianceFacts::new(&entry.model).with_modules(entry.modules.clone());
        if let Some(version) = &entry.version {
            facts = facts.with_version(version);
        }

        let mut builder = ApplianceClient::builder()
            .hostname(&entry.hostname)
            .credentials(&entry.user, password)
            .facts(facts)
            .timeout(Duration::from_secs(config.timeout_for(entry)))
            .accept_invalid_certs(entry.accept_invalid_certs);
        if let Some(port) = entry.port {
            builder = builder.port(port);
        }

        tracing::debug!(context = %entry.name, hostname = %entry.hostname, "Connecting to appliance");
        builder
            .build()
            .with_context(|| format!("failed to build client for context '{}'", entry.name))
    }
}

/// Print a return object, as JSON or as a short summary.
///
/// Verbose output adds the return code and warning count to the summary.
pub fn print_result(ctx: &Context, result: &ReturnObject) -> Result<()> {
    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let green = Style::new().green();
    let yellow = Style::new().yellow();
    let dim = Style::new().dim();

    if result.changed {
        println!("{} changed", yellow.apply_to("●"));
    } else {
        println!("{} unchanged", green.apply_to("✓"));
    }
    if ctx.verbose {
        println!("  {} {}", dim.apply_to("rc:"), result.rc);
        println!("  {} {}", dim.apply_to("warnings:"), result.warnings.len());
    }
    for warning in &result.warnings {
        println!("{} {}", yellow.apply_to("warning:"), warning);
    }
    if !result.has_no_data() {
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("{}", serde_json::to_string_pretty(&result.data)?);
    }
    Ok(())
}
