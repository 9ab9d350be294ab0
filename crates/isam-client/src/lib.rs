//! Client SDK for ISAM appliance management APIs.
//!
//! This crate provides an appliance handle and declarative wrappers around
//! individual configuration endpoints.
//!
//! # Example
//!
//! ```no_run
//! use isam_client::{ApplianceClient, ApplianceFacts, Result};
//! use isam_client::dsc::{self, DscPolicy, SetOptions};
//!
//! # async fn example() -> Result<()> {
//! let appliance = ApplianceClient::builder()
//!     .hostname("https://isam.example.com")
//!     .credentials("admin@local", "secret")
//!     .facts(ApplianceFacts::new("Docker"))
//!     .accept_invalid_certs(true)
//!     .build()?;
//!
//! // Only issues a PUT if the appliance differs from the desired policy
//! let policy = DscPolicy::default().with_worker_threads(128);
//! let result = dsc::set(&appliance, &policy, SetOptions::default()).await?;
//! println!("changed: {}", result.changed);
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **DSC**: Retrieve, declaratively set, and compare distributed session
//!   cache policy
//!
//! Every operation returns a [`ReturnObject`] carrying `changed`, `warnings`,
//! and `data`, whichever code path was taken.

pub mod appliance;
pub mod client;
pub mod dsc;
pub mod error;
pub mod tools;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use appliance::Appliance;
pub use client::{ApplianceClient, ClientBuilder};
pub use error::{Error, Result};
pub use tools::SequenceOrder;
pub use types::*;

#[cfg(test)]
pub use mock::{MockAppliance, MockCall};
