//! Shared types for appliance calls.
//!
//! These mirror the shape every appliance operation returns, plus the facts and
//! capability requirements used to gate individual API calls.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Return Object
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform result of an appliance operation.
///
/// Every code path (GET, PUT, dry run, skipped call) produces this shape so
/// callers can handle outcomes without caring which branch was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnObject {
    /// Return code (0 on success).
    #[serde(default)]
    pub rc: i32,
    /// Whether the operation changed (or would change) appliance state.
    #[serde(default)]
    pub changed: bool,
    /// Non-fatal warnings collected along the way.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Response payload. Empty object when there is nothing to report.
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ReturnObject {
    /// Create a return object with no data.
    pub fn new(changed: bool, warnings: Vec<String>) -> Self {
        Self {
            rc: 0,
            changed,
            warnings,
            data: empty_object(),
        }
    }

    /// Attach a data payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// True when the payload is an empty object or null.
    pub fn has_no_data(&self) -> bool {
        match &self.data {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Default for ReturnObject {
    fn default() -> Self {
        Self::new(false, Vec::new())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Facts
// ─────────────────────────────────────────────────────────────────────────────

/// Facts describing the appliance a handle talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceFacts {
    /// Deployment model (e.g. "Docker", "Appliance", "VMware").
    pub model: String,
    /// Firmware version, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Activated product modules (e.g. "wga", "mga", "federation").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activated_modules: Vec<String>,
}

impl ApplianceFacts {
    /// Facts with just a deployment model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            version: None,
            activated_modules: Vec::new(),
        }
    }

    /// Set the firmware version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the activated modules.
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activated_modules = modules.into_iter().map(Into::into).collect();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requirements
// ─────────────────────────────────────────────────────────────────────────────

/// Capability constraints an API call declares.
///
/// `None` means "no constraint". Each API module declares its requirements as
/// a constant and passes it into every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    /// At least one of these modules must be activated.
    pub modules: Option<&'static [&'static str]>,
    /// Minimum firmware version.
    pub version: Option<&'static str>,
    /// Required deployment model.
    pub model: Option<&'static str>,
}

impl Requirements {
    /// Requirements with no constraints.
    pub const NONE: Requirements = Requirements {
        modules: None,
        version: None,
        model: None,
    };

    /// Warning text for the first unmet requirement, or `None` if the
    /// appliance satisfies all of them.
    pub fn unmet(&self, facts: &ApplianceFacts) -> Option<String> {
        if let Some(model) = self.model
            && facts.model != model
        {
            return Some(model_mismatch(model, "appliance", &facts.model));
        }

        if let (Some(required), Some(actual)) = (self.version, facts.version.as_deref())
            && compare_versions(actual, required) == Ordering::Less
        {
            return Some(format!(
                "API invoked requires minimum version: {required}, appliance is of lower version: {actual}."
            ));
        }

        if let Some(modules) = self.modules
            && !facts.activated_modules.is_empty()
            && !modules
                .iter()
                .any(|m| facts.activated_modules.iter().any(|a| a == m))
        {
            return Some(format!(
                "API invoked requires one of modules: {:?}, appliance has: {:?}.",
                modules, facts.activated_modules
            ));
        }

        None
    }
}

/// Standard warning for a deployment model mismatch.
///
/// `subject` names the appliance in the message ("appliance", "appliance1", ...).
pub fn model_mismatch(required: &str, subject: &str, actual: &str) -> String {
    format!("API invoked requires model: {required}, {subject} is of deployment model: {actual}.")
}

/// Compare dotted firmware versions numerically, so "10.0.10" is newer than "10.0.9".
///
/// Missing components count as zero; non-numeric components count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
