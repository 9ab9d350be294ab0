//! Config command - appliance context management.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show configuration file path
    Path,

    /// Show the current context name
    CurrentContext,

    /// List available contexts
    GetContexts,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

/// Context listing for JSON output.
#[derive(Debug, Serialize)]
struct ContextOutput<'a> {
    name: &'a str,
    hostname: &'a str,
    model: &'a str,
    current: bool,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::CurrentContext => cmd_current_context(ctx),
        ConfigCommand::GetContexts => cmd_get_contexts(ctx),
        ConfigCommand::UseContext { name } => cmd_use_context(ctx, &name),
        ConfigCommand::DeleteContext { name } => cmd_delete_context(ctx, &name),
    }
}

fn cmd_path(ctx: &Context) -> Result<()> {
    match ctx.config_file() {
        Some(path) => println!("{}", path.display()),
        None => println!("Could not determine config directory"),
    }
    Ok(())
}

fn cmd_current_context(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match &config.current_context {
        Some(name) => println!("{}", name),
        None => {
            println!("No current context set. Use 'isam config use-context <name>' to set one.")
        }
    }

    Ok(())
}

fn cmd_get_contexts(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let current = config.current_context.as_deref();

    if ctx.json_output {
        let output: Vec<ContextOutput> = config
            .contexts
            .iter()
            .map(|c| ContextOutput {
                name: &c.name,
                hostname: &c.hostname,
                model: &c.model,
                current: current == Some(c.name.as_str()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        if let Some(path) = ctx.config_file() {
            println!("Add one to {}", path.display());
        }
        return Ok(());
    }

    println!("CURRENT   NAME            MODEL       HOSTNAME");
    for entry in &config.contexts {
        let marker = if current == Some(entry.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}         {:<15} {:<11} {}",
            marker, entry.name, entry.model, entry.hostname
        );
    }

    Ok(())
}

fn cmd_use_context(ctx: &Context, name: &str) -> Result<()> {
    let path = ctx
        .config_file()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    let mut config = ctx.load_config()?;

    config.use_context(name)?;
    isam_config::save_config_to(&config, &path)?;

    println!("Switched to context \"{}\".", name);
    Ok(())
}

fn cmd_delete_context(ctx: &Context, name: &str) -> Result<()> {
    let path = ctx
        .config_file()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    let mut config = ctx.load_config()?;

    if config.remove_context(name).is_none() {
        anyhow::bail!("context '{}' not found", name);
    }
    isam_config::save_config_to(&config, &path)?;

    println!("Deleted context \"{}\".", name);
    Ok(())
}
