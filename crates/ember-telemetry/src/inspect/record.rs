// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry records and the snapshot that collects them.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Structural facts about one framework object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleTelemetry {
    /// Framework abstraction, e.g. `"Route"` or `"EmberObject"`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub own_properties: Vec<String>,
    pub own_actions: Vec<String>,
    /// Always a subset of `own_properties`.
    pub computed_properties: Vec<String>,
}

/// Serializes as `{}`. Only `{}` deserializes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyRecord {}

/// One entry of the snapshot.
///
/// `Empty` is recorded when an object's metadata has no source: the module
/// resolved, but there is nothing worth describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryRecord {
    Populated(ModuleTelemetry),
    Empty(EmptyRecord),
}

impl TelemetryRecord {
    pub fn empty() -> Self {
        TelemetryRecord::Empty(EmptyRecord {})
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TelemetryRecord::Empty(_))
    }

    pub fn telemetry(&self) -> Option<&ModuleTelemetry> {
        match self {
            TelemetryRecord::Populated(t) => Some(t),
            TelemetryRecord::Empty(_) => None,
        }
    }
}

/// Module path to telemetry record, in registry enumeration order.
///
/// Serializes as a JSON object whose key order matches insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(String, TelemetryRecord)>,
    /// Path to position in `entries`.
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`. Returns `false` and keeps the first record when the
    /// path is already present.
    pub(crate) fn insert(&mut self, path: impl Into<String>, record: TelemetryRecord) -> bool {
        let path = path.into();
        if self.index.contains_key(&path) {
            return false;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, record));
        true
    }

    pub fn get(&self, path: &str) -> Option<&TelemetryRecord> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TelemetryRecord)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, record) in &self.entries {
            map.serialize_entry(path, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of module paths to telemetry records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Snapshot, A::Error> {
                let mut snapshot = Snapshot::new();
                while let Some((path, record)) = access.next_entry::<String, TelemetryRecord>()? {
                    if !snapshot.insert(path.clone(), record) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate module path: {path}"
                        )));
                    }
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route() -> TelemetryRecord {
        TelemetryRecord::Populated(ModuleTelemetry {
            type_name: "Route".to_string(),
            own_properties: vec!["model".to_string()],
            own_actions: vec![],
            computed_properties: vec![],
        })
    }

    #[test]
    fn test_empty_record_serializes_as_empty_object() {
        let json = serde_json::to_value(TelemetryRecord::empty()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn test_populated_record_field_names() {
        let json = serde_json::to_value(route()).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "Route",
                "ownProperties": ["model"],
                "ownActions": [],
                "computedProperties": []
            })
        );
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("app/routes/zeta", route());
        snapshot.insert("app/routes/alpha", TelemetryRecord::empty());

        let text = serde_json::to_string(&snapshot).unwrap();
        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        assert!(zeta < alpha);

        let back: Snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, snapshot);
        assert!(back.get("app/routes/alpha").unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_rejects_duplicates() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.insert("a", route()));
        assert!(!snapshot.insert("a", TelemetryRecord::empty()));
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.get("a").unwrap().is_empty());
    }

    #[test]
    fn test_partial_record_is_not_read_as_empty() {
        let err = serde_json::from_str::<Snapshot>(r#"{"a":{"type":"Route"}}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<Snapshot>(
            r#"{"app/routes/a":{"type":"Route","ownProperties":["x"]}}"#,
        );
        assert!(err.is_err());

        let err = serde_json::from_str::<Snapshot>(
            r#"{"a":{"type":"Route","ownProperties":[],"ownActions":[],"computedProperties":[],"extra":1}}"#,
        );
        assert!(err.is_err());

        let ok: Snapshot = serde_json::from_str(r#"{"a":{}}"#).unwrap();
        assert!(ok.get("a").unwrap().is_empty());
    }

    #[test]
    fn test_lookup_by_path() {
        let mut snapshot = Snapshot::new();
        for i in 0..100 {
            snapshot.insert(format!("app/routes/r{i}"), route());
        }
        assert!(snapshot.contains("app/routes/r57"));
        assert!(!snapshot.contains("app/routes/r100"));
        assert_eq!(snapshot.paths().nth(57), Some("app/routes/r57"));
        assert!(snapshot.get("app/routes/r99").is_some());
    }
}
