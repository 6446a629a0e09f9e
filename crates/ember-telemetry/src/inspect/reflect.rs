// Copyright 2026 Ember Telemetry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reflection seams between the inspection core and whatever backs it.
//!
//! The walker and parser never touch the page directly. They see a
//! [`ModuleRegistry`] that resolves paths to framework objects, a
//! [`MetaContainer`] per object, and the [`ReflectedSource`] the container
//! points at. The probed registry image implements all three; tests plug in
//! hand-built fakes.

use super::error::InspectError;

/// Constructor name the framework gives to computed-property descriptors.
pub const COMPUTED_SENTINEL: &str = "ComputedProperty";

/// What the reflection API reports about one own property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Whether the descriptor is enumerable.
    pub enumerable: bool,
    /// Name of the constructor found on the descriptor's prototype, if any.
    pub constructor_name: Option<String>,
    /// Explicit computed-capability flag. Takes precedence over the
    /// constructor name when present.
    pub computed: Option<bool>,
}

impl PropertyDescriptor {
    /// Whether this descriptor defines a computed property.
    pub fn is_computed(&self) -> bool {
        match self.computed {
            Some(flag) => flag,
            None => self.constructor_name.as_deref() == Some(COMPUTED_SENTINEL),
        }
    }
}

/// The object a metadata container describes.
pub trait ReflectedSource {
    /// Own enumerable keys, in definition order.
    fn own_enumerable_keys(&self) -> Vec<String>;
    /// Keys of the `actions` sub-object, or `None` when there is none.
    fn action_names(&self) -> Option<Vec<String>>;
}

/// A framework object's reflection metadata.
pub trait MetaContainer {
    type Source: ReflectedSource;

    /// The object this container is attached to.
    fn source(&self) -> Option<&Self::Source>;

    /// Visit every own property descriptor.
    ///
    /// Fails with [`InspectError::MalformedMeta`] when the container has no
    /// enumeration primitive.
    fn for_each_descriptor(
        &self,
        visit: &mut dyn FnMut(&str, &PropertyDescriptor),
    ) -> Result<(), InspectError>;
}

/// The application's module registry, read-only.
pub trait ModuleRegistry {
    /// A resolved framework object.
    type Object;
    /// The metadata container attached to [`Self::Object`].
    type Meta: MetaContainer;

    /// Registry keys in enumeration order.
    fn paths(&self) -> Vec<String>;

    /// Resolve a module to its framework object.
    ///
    /// `Ok(None)` means the module has no `default.proto` factory and is not
    /// a framework object; it is not an error.
    fn resolve(&self, path: &str) -> Result<Option<&Self::Object>, InspectError>;

    /// Fetch the metadata container for a resolved object.
    fn meta_for<'a>(&'a self, object: &'a Self::Object) -> Option<&'a Self::Meta>;
}
