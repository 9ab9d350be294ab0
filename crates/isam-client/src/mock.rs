//! In-memory appliance for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::appliance::{Appliance, skipped};
use crate::error::{Error, Result};
use crate::types::{ApplianceFacts, Requirements, ReturnObject};

/// A request recorded by [`MockAppliance`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Get { path: String },
    Put { path: String, body: Value },
}

/// An appliance that serves documents from memory.
///
/// A PUT replaces the document at its path, so repeated declarative calls see
/// the state left by earlier ones. Requirements are enforced the same way
/// [`crate::ApplianceClient`] enforces them: unmet calls are never recorded.
#[derive(Debug)]
pub struct MockAppliance {
    facts: ApplianceFacts,
    documents: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockAppliance {
    /// Create an empty appliance with the given deployment model.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_facts(ApplianceFacts::new(model))
    }

    /// Create an empty appliance with full facts.
    pub fn with_facts(facts: ApplianceFacts) -> Self {
        Self {
            facts,
            documents: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Seed the document served at `path`.
    pub fn with_document(self, path: impl Into<String>, document: Value) -> Self {
        self.documents.lock().unwrap().insert(path.into(), document);
        self
    }

    /// Current document at `path`.
    pub fn document(&self, path: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(path).cloned()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of GETs issued.
    pub fn get_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Get { .. }))
            .count()
    }

    /// Number of PUTs issued.
    pub fn put_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Put { .. }))
            .count()
    }
}

#[async_trait]
impl Appliance for MockAppliance {
    fn facts(&self) -> &ApplianceFacts {
        &self.facts
    }

    async fn invoke_get(
        &self,
        _description: &str,
        path: &str,
        requires: &Requirements,
    ) -> Result<ReturnObject> {
        if let Some(warning) = requires.unmet(&self.facts) {
            return Ok(skipped(warning, Vec::new()));
        }

        self.calls.lock().unwrap().push(MockCall::Get {
            path: path.to_string(),
        });

        let document = self
            .document(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        Ok(ReturnObject::new(false, Vec::new()).with_data(document))
    }

    async fn invoke_put(
        &self,
        _description: &str,
        path: &str,
        body: &Value,
        requires: &Requirements,
        warnings: Vec<String>,
    ) -> Result<ReturnObject> {
        if let Some(warning) = requires.unmet(&self.facts) {
            return Ok(skipped(warning, warnings));
        }

        self.calls.lock().unwrap().push(MockCall::Put {
            path: path.to_string(),
            body: body.clone(),
        });
        self.documents
            .lock()
            .unwrap()
            .insert(path.to_string(), body.clone());

        Ok(ReturnObject::new(true, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCKER: Requirements = Requirements {
        modules: None,
        version: None,
        model: Some("Docker"),
    };

    #[tokio::test]
    async fn test_mock_serves_and_replaces_documents() {
        let mock = MockAppliance::new("Docker").with_document("/a", json!({"v": 1}));

        let got = mock.invoke_get("get", "/a", &DOCKER).await.unwrap();
        assert_eq!(got.data, json!({"v": 1}));

        let put = mock
            .invoke_put("put", "/a", &json!({"v": 2}), &DOCKER, Vec::new())
            .await
            .unwrap();
        assert!(put.changed);
        assert_eq!(mock.document("/a"), Some(json!({"v": 2})));
        assert_eq!(mock.get_count(), 1);
        assert_eq!(mock.put_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_missing_document() {
        let mock = MockAppliance::new("Docker");
        let err = mock.invoke_get("get", "/nope", &DOCKER).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_enforces_requirements() {
        let mock = MockAppliance::new("Appliance").with_document("/a", json!({}));

        let put = mock
            .invoke_put("put", "/a", &json!({"v": 2}), &DOCKER, Vec::new())
            .await
            .unwrap();

        assert!(!put.changed);
        assert_eq!(put.warnings.len(), 1);
        assert!(mock.calls().is_empty());
        assert_eq!(mock.document("/a"), Some(json!({})));
    }
}
