// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metadata parser: turns a reflection metadata container into a record.

use super::classify::Classifier;
use super::error::InspectError;
use super::record::{ModuleTelemetry, TelemetryRecord};
use super::reflect::{MetaContainer, ReflectedSource};

/// Own keys that are framework plumbing, not properties of the object.
pub const RESERVED_KEYS: [&str; 2] = ["_super", "actions"];

/// Summarize a metadata container.
///
/// A missing container, or one without a source, yields
/// [`TelemetryRecord::Empty`]: the object is not worth recording, which is not
/// an error.
pub fn parse_meta<M: MetaContainer>(
    meta: Option<&M>,
    classifier: &Classifier<M::Source>,
) -> Result<TelemetryRecord, InspectError> {
    let Some(meta) = meta else {
        return Ok(TelemetryRecord::empty());
    };
    let Some(source) = meta.source() else {
        return Ok(TelemetryRecord::empty());
    };

    let type_name = classifier.classify(source).to_string();

    let own_properties: Vec<String> = source
        .own_enumerable_keys()
        .into_iter()
        .filter(|key| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();

    let own_actions = source.action_names().unwrap_or_default();

    let mut computed_properties = Vec::new();
    meta.for_each_descriptor(&mut |name, descriptor| {
        if descriptor.enumerable
            && descriptor.is_computed()
            && own_properties.iter().any(|p| p == name)
            && !computed_properties.iter().any(|c| c == name)
        {
            computed_properties.push(name.to_string());
        }
    })?;

    Ok(TelemetryRecord::Populated(ModuleTelemetry {
        type_name,
        own_properties,
        own_actions,
        computed_properties,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::classify::TypeRegistry;
    use crate::inspect::reflect::PropertyDescriptor;

    #[derive(Default)]
    struct FakeSource {
        keys: Vec<&'static str>,
        actions: Option<Vec<&'static str>>,
        route: bool,
    }

    impl ReflectedSource for FakeSource {
        fn own_enumerable_keys(&self) -> Vec<String> {
            self.keys.iter().map(|k| k.to_string()).collect()
        }
        fn action_names(&self) -> Option<Vec<String>> {
            self.actions
                .as_ref()
                .map(|a| a.iter().map(|k| k.to_string()).collect())
        }
    }

    #[derive(Default)]
    struct FakeMeta {
        source: Option<FakeSource>,
        descriptors: Option<Vec<(&'static str, PropertyDescriptor)>>,
    }

    impl MetaContainer for FakeMeta {
        type Source = FakeSource;

        fn source(&self) -> Option<&FakeSource> {
            self.source.as_ref()
        }

        fn for_each_descriptor(
            &self,
            visit: &mut dyn FnMut(&str, &PropertyDescriptor),
        ) -> Result<(), InspectError> {
            let descriptors = self
                .descriptors
                .as_ref()
                .ok_or_else(|| InspectError::MalformedMeta("no forEachDescriptors".into()))?;
            for (name, desc) in descriptors {
                visit(name, desc);
            }
            Ok(())
        }
    }

    fn classifier() -> Classifier<FakeSource> {
        Classifier::new(TypeRegistry::new().register("Route", |s: &FakeSource| s.route))
    }

    fn computed() -> PropertyDescriptor {
        PropertyDescriptor {
            enumerable: true,
            constructor_name: Some("ComputedProperty".to_string()),
            computed: None,
        }
    }

    fn plain() -> PropertyDescriptor {
        PropertyDescriptor {
            enumerable: true,
            constructor_name: Some("Object".to_string()),
            computed: None,
        }
    }

    #[test]
    fn test_absent_meta_is_empty() {
        let record = parse_meta::<FakeMeta>(None, &classifier()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_meta_without_source_is_empty() {
        let record = parse_meta(Some(&FakeMeta::default()), &classifier()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_reserved_keys_and_actions() {
        let meta = FakeMeta {
            source: Some(FakeSource {
                keys: vec!["_super", "actions", "foo", "bar"],
                actions: Some(vec!["save", "cancel"]),
                route: false,
            }),
            descriptors: Some(vec![]),
        };
        let record = parse_meta(Some(&meta), &classifier()).unwrap();
        let t = record.telemetry().unwrap();
        assert_eq!(t.type_name, "EmberObject");
        assert_eq!(t.own_properties, vec!["foo", "bar"]);
        assert_eq!(t.own_actions, vec!["save", "cancel"]);
        assert!(t.computed_properties.is_empty());
    }

    #[test]
    fn test_computed_properties_subset_of_own() {
        let meta = FakeMeta {
            source: Some(FakeSource {
                keys: vec!["fullName", "firstName", "_super"],
                actions: None,
                route: true,
            }),
            descriptors: Some(vec![
                ("fullName", computed()),
                ("firstName", plain()),
                // Inherited computed: not an own property.
                ("session", computed()),
                // Reserved keys never count, even if computed.
                ("_super", computed()),
            ]),
        };
        let record = parse_meta(Some(&meta), &classifier()).unwrap();
        let t = record.telemetry().unwrap();
        assert_eq!(t.type_name, "Route");
        assert_eq!(t.computed_properties, vec!["fullName"]);
        assert!(t.own_actions.is_empty());
        for name in &t.computed_properties {
            assert!(t.own_properties.contains(name));
        }
    }

    #[test]
    fn test_non_enumerable_computed_is_ignored() {
        let hidden = PropertyDescriptor {
            enumerable: false,
            ..computed()
        };
        let meta = FakeMeta {
            source: Some(FakeSource {
                keys: vec!["secret"],
                ..Default::default()
            }),
            descriptors: Some(vec![("secret", hidden)]),
        };
        let record = parse_meta(Some(&meta), &classifier()).unwrap();
        assert!(record.telemetry().unwrap().computed_properties.is_empty());
    }

    #[test]
    fn test_explicit_flag_marks_computed() {
        let flagged = PropertyDescriptor {
            enumerable: true,
            constructor_name: None,
            computed: Some(true),
        };
        let meta = FakeMeta {
            source: Some(FakeSource {
                keys: vec!["total"],
                ..Default::default()
            }),
            descriptors: Some(vec![("total", flagged)]),
        };
        let record = parse_meta(Some(&meta), &classifier()).unwrap();
        assert_eq!(record.telemetry().unwrap().computed_properties, vec!["total"]);
    }

    #[test]
    fn test_missing_enumeration_primitive_is_an_error() {
        let meta = FakeMeta {
            source: Some(FakeSource {
                keys: vec!["foo"],
                ..Default::default()
            }),
            descriptors: None,
        };
        let err = parse_meta(Some(&meta), &classifier()).unwrap_err();
        assert!(matches!(err, InspectError::MalformedMeta(_)));
    }
}
