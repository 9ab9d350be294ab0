//! Distributed session cache (DSC) policy.
//!
//! The DSC policy is a singleton per appliance, read and replaced as a whole
//! through `/isam/dsc/config`. It is only available on the "Docker" deployment
//! model.
//!
//! [`set`] is declarative: it reads the current policy, compares it with the
//! desired one after canonicalization, and only issues a PUT when they differ.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::appliance::Appliance;
use crate::error::Result;
use crate::tools::{self, SequenceOrder};
use crate::types::{Requirements, ReturnObject, model_mismatch};

/// REST resource holding the DSC policy.
pub const URI: &str = "/isam/dsc/config";

/// Capability requirements declared by every DSC call.
pub const REQUIREMENTS: Requirements = Requirements {
    modules: None,
    version: None,
    model: Some("Docker"),
};

// ─────────────────────────────────────────────────────────────────────────────
// Policy
// ─────────────────────────────────────────────────────────────────────────────

/// A DSC server descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DscServer {
    /// Address of the DSC server.
    pub ip: String,
    /// Port clients use to reach the cache.
    pub service_port: u16,
    /// Port used for replication between servers.
    pub replication_port: u16,
    /// Any further keys the appliance reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DscServer {
    pub fn new(ip: impl Into<String>, service_port: u16, replication_port: u16) -> Self {
        Self {
            ip: ip.into(),
            service_port,
            replication_port,
            extra: Map::new(),
        }
    }
}

/// The full DSC policy record. A PUT always carries every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DscPolicy {
    pub service_port: u16,
    pub replication_port: u16,
    pub worker_threads: u32,
    /// Seconds.
    pub max_session_lifetime: u32,
    /// Seconds.
    pub client_grace: u32,
    #[serde(default)]
    pub servers: Vec<DscServer>,
}

impl Default for DscPolicy {
    fn default() -> Self {
        Self {
            service_port: 443,
            replication_port: 444,
            worker_threads: 64,
            max_session_lifetime: 3600,
            client_grace: 600,
            servers: Vec::new(),
        }
    }
}

impl DscPolicy {
    pub fn with_service_port(mut self, port: u16) -> Self {
        self.service_port = port;
        self
    }

    pub fn with_replication_port(mut self, port: u16) -> Self {
        self.replication_port = port;
        self
    }

    pub fn with_worker_threads(mut self, threads: u32) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn with_max_session_lifetime(mut self, seconds: u32) -> Self {
        self.max_session_lifetime = seconds;
        self
    }

    pub fn with_client_grace(mut self, seconds: u32) -> Self {
        self.client_grace = seconds;
        self
    }

    pub fn with_servers(mut self, servers: Vec<DscServer>) -> Self {
        self.servers = servers;
        self
    }

    /// The JSON document sent to the appliance.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Control flags for [`set`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    /// Report what would change without issuing the PUT.
    pub check_mode: bool,
    /// Skip the comparison and always apply.
    pub force: bool,
    /// Whether `servers` ordering is significant when comparing.
    pub sequence_order: SequenceOrder,
}

/// Retrieve the current distributed session cache policy.
pub async fn get<A: Appliance + ?Sized>(appliance: &A) -> Result<ReturnObject> {
    appliance
        .invoke_get(
            "Retrieve the current distributed session cache policy",
            URI,
            &REQUIREMENTS,
        )
        .await
}

/// Update the distributed session cache policy if it differs from `policy`.
pub async fn set<A: Appliance + ?Sized>(
    appliance: &A,
    policy: &DscPolicy,
    options: SetOptions,
) -> Result<ReturnObject> {
    let warnings = Vec::new();
    let desired = policy.to_json()?;

    if options.force || !check(appliance, &desired, options.sequence_order).await? {
        if options.check_mode {
            return Ok(appliance.create_return_object(true, warnings));
        }
        return appliance
            .invoke_put(
                "Update the current distributed session cache policy",
                URI,
                &desired,
                &REQUIREMENTS,
                warnings,
            )
            .await;
    }

    Ok(appliance.create_return_object(false, warnings))
}

/// True when the appliance already holds `desired`, so no update is needed.
///
/// Appliances on an unsupported deployment model report true: the update is
/// silently skipped rather than surfaced as a warning.
pub(crate) async fn check<A: Appliance + ?Sized>(
    appliance: &A,
    desired: &Value,
    order: SequenceOrder,
) -> Result<bool> {
    let model = &appliance.facts().model;
    if let Some(required) = REQUIREMENTS.model
        && model != required
    {
        tracing::debug!("{}", model_mismatch(required, "appliance", model));
        return Ok(true);
    }

    let current = get(appliance).await?;
    let sorted_current = tools::json_sort(&current.data, order);
    let sorted_desired = tools::json_sort(desired, order);
    tracing::debug!(existing = %sorted_current, "Sorted existing DSC policy");
    tracing::debug!(desired = %sorted_desired, "Sorted desired DSC policy");

    if sorted_current != sorted_desired {
        tracing::info!("Existing and input data do not match - update needed");
        return Ok(false);
    }
    Ok(true)
}

/// Compare DSC policy between two appliances.
///
/// Both must be on the "Docker" model; otherwise the result carries a warning
/// naming the failing appliance and no comparison is made.
pub async fn compare<A, B>(appliance1: &A, appliance2: &B) -> Result<ReturnObject>
where
    A: Appliance + ?Sized,
    B: Appliance + ?Sized,
{
    if let Some(required) = REQUIREMENTS.model {
        if appliance1.facts().model != required {
            return Ok(appliance1.create_return_object(
                false,
                vec![model_mismatch(required, "appliance1", &appliance1.facts().model)],
            ));
        }
        if appliance2.facts().model != required {
            return Ok(appliance2.create_return_object(
                false,
                vec![model_mismatch(required, "appliance2", &appliance2.facts().model)],
            ));
        }
    }

    let ret_obj1 = get(appliance1).await?;
    let ret_obj2 = get(appliance2).await?;

    Ok(tools::json_compare(&ret_obj1, &ret_obj2, &[]))
}
