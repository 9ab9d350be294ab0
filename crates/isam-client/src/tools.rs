//! JSON canonicalization and structural comparison helpers.
//!
//! Appliance APIs return documents whose key and array ordering is not stable
//! across calls or firmware versions. Declarative operations compare
//! canonicalized documents instead of raw ones.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::ReturnObject;

// ─────────────────────────────────────────────────────────────────────────────
// Canonicalization
// ─────────────────────────────────────────────────────────────────────────────

/// How sequences are treated when canonicalizing a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceOrder {
    /// Array elements are sorted, so `[b, a]` equals `[a, b]`.
    #[default]
    Unordered,
    /// Array order is significant and left untouched.
    Ordered,
}

/// Recursively sort mapping keys and, under [`SequenceOrder::Unordered`],
/// array elements.
pub fn json_sort(value: &Value, order: SequenceOrder) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, val) in entries {
                sorted.insert(key.clone(), json_sort(val, order));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => {
            let mut items: Vec<Value> = items.iter().map(|v| json_sort(v, order)).collect();
            if order == SequenceOrder::Unordered {
                items.sort_by(cmp_json);
            }
            Value::Array(items)
        }
        other => other.clone(),
    }
}

/// Total order over JSON values: by type (null, bool, number, string, array,
/// object), then by content.
pub fn cmp_json(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                match cmp_json(l, r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            let mut xs: Vec<_> = x.iter().collect();
            let mut ys: Vec<_> = y.iter().collect();
            xs.sort_by(|a, b| a.0.cmp(b.0));
            ys.sort_by(|a, b| a.0.cmp(b.0));
            for ((lk, lv), (rk, rv)) in xs.iter().zip(ys.iter()) {
                match lk.cmp(rk).then_with(|| cmp_json(lv, rv)) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            xs.len().cmp(&ys.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Remove the named keys from every object in the document, at any depth.
pub fn strip_keys(value: &Value, keys: &[&str]) -> Value {
    if keys.is_empty() {
        return value.clone();
    }
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), strip_keys(v, keys)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| strip_keys(v, keys)).collect()),
        other => other.clone(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Structural Diff
// ─────────────────────────────────────────────────────────────────────────────

/// A value present on only one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    /// JSON pointer to the value.
    pub path: String,
    pub value: Value,
}

/// A value present on both sides with different content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffChange {
    /// JSON pointer to the value.
    pub path: String,
    pub from: Value,
    pub to: Value,
}

/// Structural differences between two documents.
///
/// `added` holds values only in the second document, `removed` values only in
/// the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonDiff {
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub changed: Vec<DiffChange>,
}

impl JsonDiff {
    /// True when the documents are structurally equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of differences.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Diff two documents as given. Callers canonicalize first if ordering should
/// not matter.
///
/// Under [`SequenceOrder::Ordered`] arrays are diffed index by index. Under
/// [`SequenceOrder::Unordered`] array elements are matched by value, so an
/// inserted element is reported once as added (at its index in `right`) and a
/// dropped one once as removed (at its index in `left`), wherever it sorts.
pub fn json_diff(left: &Value, right: &Value, order: SequenceOrder) -> JsonDiff {
    let mut diff = JsonDiff::default();
    diff_into(&mut diff, String::new(), left, right, order);
    diff
}

fn diff_into(
    diff: &mut JsonDiff,
    path: String,
    left: &Value,
    right: &Value,
    order: SequenceOrder,
) {
    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            for (key, lv) in l {
                let child = format!("{}/{}", path, escape_pointer(key));
                match r.get(key) {
                    Some(rv) => diff_into(diff, child, lv, rv, order),
                    None => diff.removed.push(DiffEntry {
                        path: child,
                        value: lv.clone(),
                    }),
                }
            }
            for (key, rv) in r {
                if !l.contains_key(key) {
                    diff.added.push(DiffEntry {
                        path: format!("{}/{}", path, escape_pointer(key)),
                        value: rv.clone(),
                    });
                }
            }
        }
        (Value::Array(l), Value::Array(r)) if order == SequenceOrder::Unordered => {
            diff_unordered(diff, &path, l, r);
        }
        (Value::Array(l), Value::Array(r)) => {
            for (i, lv) in l.iter().enumerate() {
                let child = format!("{}/{}", path, i);
                match r.get(i) {
                    Some(rv) => diff_into(diff, child, lv, rv, order),
                    None => diff.removed.push(DiffEntry {
                        path: child,
                        value: lv.clone(),
                    }),
                }
            }
            for (i, rv) in r.iter().enumerate().skip(l.len()) {
                diff.added.push(DiffEntry {
                    path: format!("{}/{}", path, i),
                    value: rv.clone(),
                });
            }
        }
        _ if left != right => diff.changed.push(DiffChange {
            path: if path.is_empty() { "/".to_string() } else { path },
            from: left.clone(),
            to: right.clone(),
        }),
        _ => {}
    }
}

/// Match array elements as a multiset; leftovers on either side are reported
/// whole.
fn diff_unordered(diff: &mut JsonDiff, path: &str, left: &[Value], right: &[Value]) {
    let mut matched = vec![false; right.len()];

    for (i, lv) in left.iter().enumerate() {
        let hit = (0..right.len()).find(|&j| !matched[j] && right[j] == *lv);
        match hit {
            Some(j) => matched[j] = true,
            None => diff.removed.push(DiffEntry {
                path: format!("{}/{}", path, i),
                value: lv.clone(),
            }),
        }
    }

    for (j, rv) in right.iter().enumerate() {
        if !matched[j] {
            diff.added.push(DiffEntry {
                path: format!("{}/{}", path, j),
                value: rv.clone(),
            });
        }
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Compare the data payloads of two return objects.
///
/// Keys named in `deleted_keys` are dropped from both sides first. The result
/// carries `{"matches": bool, "differences": {...}}` and never reports a change.
pub fn json_compare(
    first: &ReturnObject,
    second: &ReturnObject,
    deleted_keys: &[&str],
) -> ReturnObject {
    let left = json_sort(&strip_keys(&first.data, deleted_keys), SequenceOrder::default());
    let right = json_sort(&strip_keys(&second.data, deleted_keys), SequenceOrder::default());
    let diff = json_diff(&left, &right, SequenceOrder::default());

    tracing::debug!(differences = diff.len(), "Compared appliance documents");

    let mut warnings = first.warnings.clone();
    warnings.extend(second.warnings.iter().cloned());

    ReturnObject::new(false, warnings).with_data(serde_json::json!({
        "matches": diff.is_empty(),
        "differences": diff,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_is_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"d": 2, "c": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"c": 3, "d": 2}, "b": 1}"#).unwrap();
        assert_eq!(
            json_sort(&a, SequenceOrder::Unordered),
            json_sort(&b, SequenceOrder::Unordered)
        );
    }

    #[test]
    fn test_unordered_sorts_arrays() {
        let a = json!({"servers": [{"ip": "10.0.0.2"}, {"ip": "10.0.0.1"}]});
        let b = json!({"servers": [{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]});
        assert_eq!(
            json_sort(&a, SequenceOrder::Unordered),
            json_sort(&b, SequenceOrder::Unordered)
        );
    }

    #[test]
    fn test_ordered_keeps_arrays() {
        let a = json!({"servers": [{"ip": "10.0.0.2"}, {"ip": "10.0.0.1"}]});
        let b = json!({"servers": [{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]});
        assert_ne!(
            json_sort(&a, SequenceOrder::Ordered),
            json_sort(&b, SequenceOrder::Ordered)
        );
    }

    #[test]
    fn test_cmp_json_mixed_types() {
        let mut values = vec![json!("x"), json!(null), json!({"a": 1}), json!(3), json!(true)];
        values.sort_by(cmp_json);
        assert_eq!(
            values,
            vec![json!(null), json!(true), json!(3), json!("x"), json!({"a": 1})]
        );
        assert_eq!(cmp_json(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(cmp_json(&json!(1.5), &json!(1)), Ordering::Greater);
    }

    #[test]
    fn test_strip_keys_nested() {
        let doc = json!({"id": 1, "name": "a", "inner": [{"id": 2, "v": true}]});
        assert_eq!(
            strip_keys(&doc, &["id"]),
            json!({"name": "a", "inner": [{"v": true}]})
        );
    }

    #[test]
    fn test_diff_reports_added_removed_changed() {
        let left = json!({"worker_threads": 64, "client_grace": 600, "servers": []});
        let right = json!({"worker_threads": 128, "servers": [{"ip": "a/b"}], "extra": 1});
        let diff = json_diff(&left, &right, SequenceOrder::Unordered);

        assert_eq!(
            diff.changed,
            vec![DiffChange {
                path: "/worker_threads".into(),
                from: json!(64),
                to: json!(128)
            }]
        );
        assert_eq!(
            diff.removed,
            vec![DiffEntry {
                path: "/client_grace".into(),
                value: json!(600)
            }]
        );
        let added: Vec<&str> = diff.added.iter().map(|e| e.path.as_str()).collect();
        assert!(added.contains(&"/servers/0"));
        assert!(added.contains(&"/extra"));
        assert_eq!(diff.len(), 4);
    }

    #[test]
    fn test_diff_root_scalar() {
        let diff = json_diff(&json!(1), &json!(2), SequenceOrder::Unordered);
        assert_eq!(diff.changed[0].path, "/");
    }

    #[test]
    fn test_unordered_diff_reports_inserted_server_once() {
        let server = |ip: &str| json!({"ip": ip, "service_port": 443, "replication_port": 444});
        let left = json_sort(
            &json!({"servers": [server("10.0.0.2"), server("10.0.0.3")]}),
            SequenceOrder::Unordered,
        );
        let right = json_sort(
            &json!({"servers": [server("10.0.0.3"), server("10.0.0.1"), server("10.0.0.2")]}),
            SequenceOrder::Unordered,
        );

        let diff = json_diff(&left, &right, SequenceOrder::Unordered);
        assert!(diff.changed.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(
            diff.added,
            vec![DiffEntry {
                path: "/servers/0".into(),
                value: server("10.0.0.1")
            }]
        );
    }

    #[test]
    fn test_ordered_diff_compares_by_index() {
        let left = json!({"servers": ["10.0.0.2", "10.0.0.3"]});
        let right = json!({"servers": ["10.0.0.1", "10.0.0.2", "10.0.0.3"]});

        let diff = json_diff(&left, &right, SequenceOrder::Ordered);
        assert_eq!(diff.changed.len(), 2);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].path, "/servers/2");
    }

    #[test]
    fn test_json_compare_identical() {
        let a = ReturnObject::default().with_data(json!({"x": [2, 1]}));
        let b = ReturnObject::default().with_data(json!({"x": [1, 2]}));
        let result = json_compare(&a, &b, &[]);

        assert!(!result.changed);
        assert_eq!(result.data["matches"], json!(true));
        assert_eq!(
            result.data["differences"],
            json!({"added": [], "removed": [], "changed": []})
        );
    }

    #[test]
    fn test_json_compare_deleted_keys() {
        let a = ReturnObject::default().with_data(json!({"uuid": "1", "port": 443}));
        let b = ReturnObject::default().with_data(json!({"uuid": "2", "port": 443}));

        assert_eq!(json_compare(&a, &b, &[]).data["matches"], json!(false));
        assert_eq!(json_compare(&a, &b, &["uuid"]).data["matches"], json!(true));
    }
}
