//! Appliance connection configuration for the isam CLI.
//!
//! Implements a kubeconfig-style file of named appliance contexts. Each context
//! bundles the management endpoint, credentials, and the facts (deployment
//! model, firmware version) used to gate API calls.

pub mod appliances;
pub mod error;
pub mod paths;

pub use appliances::{
    ApplianceConfig, ApplianceDefaults, Context, config_path, load_config, load_config_from,
    save_config, save_config_to,
};
pub use error::{ConfigError, Result};
pub use paths::xdg_config_dir;
