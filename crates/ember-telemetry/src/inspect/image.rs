// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Registry image: the page probe's serialized view of the module registry.
//!
//! Nothing but a JSON string crosses the page boundary, so the probe resolves
//! modules inside the page and flattens each one into plain reflection facts.
//! The image then backs the [`ModuleRegistry`] seam on the host side.

use super::classify::{TypeRegistry, TAXONOMY};
use super::error::InspectError;
use super::reflect::{MetaContainer, ModuleRegistry, PropertyDescriptor, ReflectedSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every registry key the probe saw, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryImage {
    /// Taxonomy types the page's framework namespace exposes.
    #[serde(default)]
    pub exposed_types: Vec<String>,
    pub entries: Vec<ImageEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub path: String,
    #[serde(flatten)]
    pub state: ModuleState,
}

/// Where in the page a module failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePhase {
    #[default]
    Resolve,
    Reflect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ModuleState {
    /// On the skip list; the probe never resolved it.
    Skipped,
    /// Resolved, but the default export has no `proto` factory.
    NoProto,
    /// Resolution or reflection threw inside the page.
    Failed {
        #[serde(default)]
        phase: FailurePhase,
        message: String,
    },
    /// A framework object and its reflection facts.
    Object {
        #[serde(default)]
        meta: Option<ProbedMeta>,
    },
}

/// Reflection metadata container as seen by the probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbedMeta {
    #[serde(default)]
    pub source: Option<ProbedSource>,
    /// `None` when the container had no `forEachDescriptors`.
    #[serde(default)]
    pub descriptors: Option<Vec<ProbedDescriptor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbedSource {
    #[serde(default)]
    pub own_keys: Vec<String>,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
    /// Exposed taxonomy types the object passed `instanceof` for.
    #[serde(default)]
    pub instance_of: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbedDescriptor {
    pub name: String,
    #[serde(default)]
    pub enumerable: bool,
    #[serde(default)]
    pub constructor_name: Option<String>,
    #[serde(default)]
    pub computed: Option<bool>,
}

/// A resolved framework object inside the image.
pub type ProbedObject = Option<ProbedMeta>;

impl RegistryImage {
    pub fn new(exposed_types: Vec<String>, entries: Vec<ImageEntry>) -> Self {
        let mut image = Self {
            exposed_types,
            entries,
            index: HashMap::new(),
        };
        image.reindex();
        image
    }

    /// Decode the probe's JSON text.
    pub fn from_json(text: &str) -> Result<Self, InspectError> {
        let mut image: RegistryImage = serde_json::from_str(text)?;
        image.reindex();
        Ok(image)
    }

    /// Type registry answering instance checks from the probe's `instanceOf`
    /// lists, exposing only what the page exposed.
    pub fn type_registry(&self) -> TypeRegistry<ProbedSource> {
        TAXONOMY
            .iter()
            .copied()
            .filter(|name| self.exposed_types.iter().any(|t| t == name))
            .fold(TypeRegistry::new(), |registry, name| {
                registry.register(name, move |source: &ProbedSource| {
                    source.instance_of.iter().any(|t| t == name)
                })
            })
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            // First occurrence wins, matching snapshot insertion.
            self.index.entry(entry.path.clone()).or_insert(i);
        }
    }

    fn entry(&self, path: &str) -> Option<&ImageEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }
}

impl ModuleRegistry for RegistryImage {
    type Object = ProbedObject;
    type Meta = ProbedMeta;

    fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    fn resolve(&self, path: &str) -> Result<Option<&ProbedObject>, InspectError> {
        let entry = self.entry(path).ok_or_else(|| InspectError::ModuleResolution {
            path: path.to_string(),
            message: "not present in registry image".to_string(),
        })?;

        match &entry.state {
            ModuleState::Object { meta } => Ok(Some(meta)),
            ModuleState::Skipped | ModuleState::NoProto => Ok(None),
            ModuleState::Failed { message, .. } => Err(InspectError::ModuleResolution {
                path: path.to_string(),
                message: message.clone(),
            }),
        }
    }

    fn meta_for<'a>(&'a self, object: &'a ProbedObject) -> Option<&'a ProbedMeta> {
        object.as_ref()
    }
}

impl MetaContainer for ProbedMeta {
    type Source = ProbedSource;

    fn source(&self) -> Option<&ProbedSource> {
        self.source.as_ref()
    }

    fn for_each_descriptor(
        &self,
        visit: &mut dyn FnMut(&str, &PropertyDescriptor),
    ) -> Result<(), InspectError> {
        let descriptors = self.descriptors.as_ref().ok_or_else(|| {
            InspectError::MalformedMeta("metadata has no forEachDescriptors".to_string())
        })?;
        for probed in descriptors {
            let descriptor = PropertyDescriptor {
                enumerable: probed.enumerable,
                constructor_name: probed.constructor_name.clone(),
                computed: probed.computed,
            };
            visit(&probed.name, &descriptor);
        }
        Ok(())
    }
}

impl ReflectedSource for ProbedSource {
    fn own_enumerable_keys(&self) -> Vec<String> {
        self.own_keys.clone()
    }

    fn action_names(&self) -> Option<Vec<String>> {
        self.actions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::classify::Classifier;

    const SAMPLE: &str = r#"{
        "exposedTypes": ["Application", "Route", "Component", "Service"],
        "entries": [
            {"path": "app/app", "state": "object", "meta": {
                "source": {"ownKeys": ["modulePrefix"], "actions": null, "instanceOf": ["Application"]},
                "descriptors": []
            }},
            {"path": "app/utils/format", "state": "noProto"},
            {"path": "app/routes/broken", "state": "failed", "phase": "reflect", "message": "boom"},
            {"path": "ember-qunit/index", "state": "skipped"},
            {"path": "app/routes/index", "state": "object", "meta": {
                "source": {"ownKeys": ["model"], "instanceOf": ["Route"]},
                "descriptors": [{"name": "model", "enumerable": true, "constructorName": "ComputedProperty"}]
            }}
        ]
    }"#;

    #[test]
    fn test_decode_sample() {
        let image = RegistryImage::from_json(SAMPLE).unwrap();
        assert_eq!(image.entries.len(), 5);
        assert_eq!(
            image.paths(),
            vec![
                "app/app",
                "app/utils/format",
                "app/routes/broken",
                "ember-qunit/index",
                "app/routes/index"
            ]
        );
        assert_eq!(
            image.entries[2].state,
            ModuleState::Failed {
                phase: FailurePhase::Reflect,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_states() {
        let image = RegistryImage::from_json(SAMPLE).unwrap();
        assert!(image.resolve("app/app").unwrap().is_some());
        assert!(image.resolve("app/utils/format").unwrap().is_none());
        assert!(image.resolve("ember-qunit/index").unwrap().is_none());

        let err = image.resolve("app/routes/broken").unwrap_err();
        assert_eq!(err.diagnostic_message(), "boom");

        assert!(image.resolve("app/missing").is_err());
    }

    #[test]
    fn test_type_registry_follows_exposed_types() {
        let image = RegistryImage::from_json(SAMPLE).unwrap();
        let registry = image.type_registry();
        assert!(registry.exposes("Route"));
        assert!(!registry.exposes("Engine"));

        let classifier = Classifier::new(registry);
        let engine = ProbedSource {
            instance_of: vec!["Engine".to_string()],
            ..Default::default()
        };
        assert_eq!(classifier.classify(&engine), "EmberObject");
    }

    #[test]
    fn test_object_without_meta() {
        let image = RegistryImage::from_json(
            r#"{"entries": [{"path": "app/x", "state": "object", "meta": null}]}"#,
        )
        .unwrap();
        let object = image.resolve("app/x").unwrap().unwrap();
        assert!(image.meta_for(object).is_none());
    }
}
