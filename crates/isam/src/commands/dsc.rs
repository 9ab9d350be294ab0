//! DSC command - distributed session cache policy.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use isam_client::SequenceOrder;
use isam_client::dsc::{self, DscPolicy, DscServer, SetOptions};

use super::{Context, print_result};

/// Arguments for the dsc command.
#[derive(Args, Debug)]
pub struct DscArgs {
    #[command(subcommand)]
    pub command: DscCommand,
}

#[derive(Subcommand, Debug)]
pub enum DscCommand {
    /// Show the current DSC policy
    Get,

    /// Apply a DSC policy if it differs from the appliance's
    Set(SetArgs),

    /// Compare DSC policy with another appliance context
    Compare {
        /// Context of the appliance to compare against
        #[arg(long)]
        with: String,
    },
}

/// Arguments for `dsc set`. Every field is sent, so omitted flags mean defaults.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Port clients use to reach the cache
    #[arg(long, default_value_t = 443)]
    pub service_port: u16,

    /// Port used for replication between servers
    #[arg(long, default_value_t = 444)]
    pub replication_port: u16,

    /// Worker threads
    #[arg(long, default_value_t = 64)]
    pub worker_threads: u32,

    /// Maximum session lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    pub max_session_lifetime: u32,

    /// Client grace period in seconds
    #[arg(long, default_value_t = 600)]
    pub client_grace: u32,

    /// DSC server as IP:SERVICE_PORT:REPLICATION_PORT (repeatable)
    #[arg(long = "server", value_parser = parse_server)]
    pub servers: Vec<DscServer>,

    /// Report what would change without applying it
    #[arg(long)]
    pub check_mode: bool,

    /// Apply even if the appliance already matches
    #[arg(long)]
    pub force: bool,

    /// Treat server order as significant when comparing
    #[arg(long)]
    pub ordered_servers: bool,
}

impl SetArgs {
    fn policy(&self) -> DscPolicy {
        DscPolicy {
            service_port: self.service_port,
            replication_port: self.replication_port,
            worker_threads: self.worker_threads,
            max_session_lifetime: self.max_session_lifetime,
            client_grace: self.client_grace,
            servers: self.servers.clone(),
        }
    }

    fn options(&self) -> SetOptions {
        SetOptions {
            check_mode: self.check_mode,
            force: self.force,
            sequence_order: if self.ordered_servers {
                SequenceOrder::Ordered
            } else {
                SequenceOrder::Unordered
            },
        }
    }
}

/// Parse `IP:SERVICE_PORT:REPLICATION_PORT`.
fn parse_server(s: &str) -> Result<DscServer> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(replication), Some(service), Some(ip)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(anyhow!(
            "expected IP:SERVICE_PORT:REPLICATION_PORT, got '{}'",
            s
        ));
    };
    if ip.is_empty() {
        return Err(anyhow!("server address is empty in '{}'", s));
    }
    Ok(DscServer::new(ip, service.parse()?, replication.parse()?))
}

/// Run the dsc command.
pub async fn run(args: DscArgs, ctx: &Context) -> Result<()> {
    let appliance = ctx.appliance(None)?;

    let result = match args.command {
        DscCommand::Get => dsc::get(&appliance).await?,
        DscCommand::Set(set) => {
            let policy = set.policy();
            tracing::debug!(?policy, "Desired DSC policy");
            dsc::set(&appliance, &policy, set.options()).await?
        }
        DscCommand::Compare { with } => {
            let other = ctx.appliance(Some(&with))?;
            dsc::compare(&appliance, &other).await?
        }
    };

    print_result(ctx, &result)
}
