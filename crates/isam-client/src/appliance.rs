//! The appliance handle seam.
//!
//! API modules such as [`crate::dsc`] only talk to an appliance through this
//! trait, so they work the same against a live appliance ([`crate::ApplianceClient`])
//! and an in-memory one in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{ApplianceFacts, Requirements, ReturnObject};

/// An appliance capable of serving authenticated REST calls.
///
/// Implementations enforce `requires` before issuing a request: when the
/// appliance does not satisfy it, no request is made and the returned object
/// carries a warning instead.
#[async_trait]
pub trait Appliance: Send + Sync {
    /// Facts gathered for this appliance.
    fn facts(&self) -> &ApplianceFacts;

    /// Issue a GET and wrap the response body in a return object.
    async fn invoke_get(
        &self,
        description: &str,
        path: &str,
        requires: &Requirements,
    ) -> Result<ReturnObject>;

    /// Issue a PUT with a JSON body. A successful call reports `changed`.
    async fn invoke_put(
        &self,
        description: &str,
        path: &str,
        body: &Value,
        requires: &Requirements,
        warnings: Vec<String>,
    ) -> Result<ReturnObject>;

    /// Build a return object without talking to the appliance.
    fn create_return_object(&self, changed: bool, warnings: Vec<String>) -> ReturnObject {
        ReturnObject::new(changed, warnings)
    }
}

/// Return object for a call skipped because `requires` was not met.
pub(crate) fn skipped(warning: String, mut warnings: Vec<String>) -> ReturnObject {
    warnings.push(warning);
    ReturnObject::new(false, warnings)
}
