// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reflection classifier: which framework abstraction an object is.
//!
//! Objects can satisfy several instance checks at once (a subclass chain),
//! so the taxonomy is walked in a fixed order and the first match wins.

use std::collections::HashMap;
use std::fmt;

/// Candidate abstractions in priority order.
pub const TAXONOMY: [&str; 8] = [
    "Application",
    "Controller",
    "Helper",
    "Route",
    "Component",
    "Service",
    "Router",
    "Engine",
];

/// Type reported when nothing in [`TAXONOMY`] matches.
pub const FALLBACK_TYPE: &str = "EmberObject";

type InstanceCheck<S> = Box<dyn Fn(&S) -> bool + Send + Sync>;

/// Type-name to instance-check mapping, standing in for the framework's
/// global namespace of type constructors.
///
/// A type that is not registered counts as not exposed and is skipped by the
/// classifier even if it appears in [`TAXONOMY`].
pub struct TypeRegistry<S: ?Sized> {
    checks: HashMap<String, InstanceCheck<S>>,
}

impl<S: ?Sized> TypeRegistry<S> {
    /// An empty registry. Everything classifies as [`FALLBACK_TYPE`].
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Expose `name` with the given instance check.
    pub fn register<F>(mut self, name: &str, check: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.checks.insert(name.to_string(), Box::new(check));
        self
    }

    /// Whether the registry exposes a constructor for `name`.
    pub fn exposes(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    fn is_instance(&self, name: &str, object: &S) -> Option<bool> {
        self.checks.get(name).map(|check| check(object))
    }
}

impl<S: ?Sized> Default for TypeRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for TypeRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut exposed: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        exposed.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("exposed", &exposed)
            .finish()
    }
}

/// Classifies framework objects against [`TAXONOMY`].
#[derive(Debug)]
pub struct Classifier<S: ?Sized> {
    registry: TypeRegistry<S>,
}

impl<S: ?Sized> Classifier<S> {
    pub fn new(registry: TypeRegistry<S>) -> Self {
        Self { registry }
    }

    /// Return the first taxonomy type the object is an instance of, or
    /// [`FALLBACK_TYPE`].
    pub fn classify(&self, object: &S) -> &'static str {
        TAXONOMY
            .iter()
            .copied()
            .find(|name| self.registry.is_instance(name, object) == Some(true))
            .unwrap_or(FALLBACK_TYPE)
    }

    pub fn registry(&self) -> &TypeRegistry<S> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake object: the list of type names it is an instance of.
    struct Fake(Vec<&'static str>);

    fn full_registry() -> TypeRegistry<Fake> {
        TAXONOMY.iter().fold(TypeRegistry::new(), |registry, name| {
            let name = *name;
            registry.register(name, move |obj: &Fake| obj.0.contains(&name))
        })
    }

    #[test]
    fn test_route_wins_over_component() {
        let classifier = Classifier::new(full_registry());
        assert_eq!(classifier.classify(&Fake(vec!["Component", "Route"])), "Route");
    }

    #[test]
    fn test_application_has_top_priority() {
        let classifier = Classifier::new(full_registry());
        let obj = Fake(vec!["Engine", "Application"]);
        assert_eq!(classifier.classify(&obj), "Application");
    }

    #[test]
    fn test_no_match_falls_back() {
        let classifier = Classifier::new(full_registry());
        assert_eq!(classifier.classify(&Fake(vec![])), "EmberObject");
        assert_eq!(classifier.classify(&Fake(vec!["Model"])), "EmberObject");
    }

    #[test]
    fn test_unexposed_type_is_skipped() {
        let registry = TypeRegistry::new()
            .register("Service", |obj: &Fake| obj.0.contains(&"Service"));
        let classifier = Classifier::new(registry);

        // Engine is in the taxonomy, but this registry does not expose it.
        assert_eq!(classifier.classify(&Fake(vec!["Engine"])), "EmberObject");
        assert_eq!(classifier.classify(&Fake(vec!["Engine", "Service"])), "Service");
        assert!(!classifier.registry().exposes("Engine"));
    }

    #[test]
    fn test_empty_registry() {
        let classifier: Classifier<Fake> = Classifier::new(TypeRegistry::default());
        assert_eq!(classifier.classify(&Fake(vec!["Route"])), FALLBACK_TYPE);
    }
}
