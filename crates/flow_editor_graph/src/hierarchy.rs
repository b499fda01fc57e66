// SPDX-License-Identifier: MIT OR Apache-2.0
//! Type ancestry, authoritative redirection and struct conversions.
//!
//! The compatibility engine never inspects types on its own. It asks a
//! [`TypeHierarchy`] about ancestry and a [`StructConversions`] table about
//! registered conversions. [`TypeCatalog`] implements both from explicit
//! tables maintained by the editor integration layer.

use crate::types::{TypeDescriptor, TypePath};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ancestry queries over type descriptors
pub trait TypeHierarchy {
    /// Look up a descriptor by path
    fn describe(&self, path: &TypePath) -> Option<&TypeDescriptor>;

    /// Follow redirects from a possibly stale path to the current one
    fn authoritative_path<'a>(&'a self, path: &'a TypePath) -> &'a TypePath;

    /// Resolve a descriptor to its current authoritative version.
    ///
    /// Returns the descriptor itself when it has not been superseded or the
    /// current version is not known.
    fn resolve_authoritative<'a>(&'a self, descriptor: &'a TypeDescriptor) -> &'a TypeDescriptor {
        let current = self.authoritative_path(&descriptor.path);
        if current == &descriptor.path {
            return descriptor;
        }
        self.describe(current).unwrap_or(descriptor)
    }

    /// Check whether `child` is `parent` or one of its descendants.
    ///
    /// Both sides are resolved through their authoritative versions first.
    fn is_child_of(&self, child: &TypeDescriptor, parent: &TypeDescriptor) -> bool {
        let child = self.resolve_authoritative(child);
        let target = self.authoritative_path(&self.resolve_authoritative(parent).path);

        let mut visited = HashSet::new();
        let mut current = Some(self.authoritative_path(&child.path));
        let mut next_parent = child.parent.as_ref();

        while let Some(path) = current {
            if path == target {
                return true;
            }
            if !visited.insert(path) {
                tracing::error!("Cycle in type ancestry at {path}");
                return false;
            }
            current = next_parent.map(|p| self.authoritative_path(p));
            next_parent = current
                .and_then(|p| self.describe(p))
                .and_then(|d| d.parent.as_ref());
        }
        false
    }
}

/// Lookup of registered struct-to-struct conversion functions
pub trait StructConversions {
    /// Check if a conversion from `from` to `to` exists.
    ///
    /// `context` is the declaring class of the node asking; conversions
    /// scoped to a class only apply within that class.
    fn has_conversion(&self, from: &TypePath, to: &TypePath, context: Option<&TypePath>) -> bool;
}

/// A registered struct conversion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructConversion {
    /// Source struct
    pub from: TypePath,
    /// Target struct
    pub to: TypePath,
    /// Class the conversion is declared on; `None` for global conversions
    #[serde(default)]
    pub context: Option<TypePath>,
}

impl StructConversion {
    /// Create a global conversion
    pub fn new(from: impl Into<TypePath>, to: impl Into<TypePath>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            context: None,
        }
    }

    /// Scope the conversion to a declaring class
    pub fn in_context(mut self, context: impl Into<TypePath>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Explicit catalog of known types, redirects and conversions
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    /// Known descriptors by path
    descriptors: IndexMap<TypePath, TypeDescriptor>,
    /// Stale path to current path
    redirects: IndexMap<TypePath, TypePath>,
    /// Registered struct conversions
    conversions: IndexSet<StructConversion>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any with the same path
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.descriptors.insert(descriptor.path.clone(), descriptor);
    }

    /// Builder form of [`Self::register`]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Record that `stale` has been superseded by `current`
    pub fn redirect(&mut self, stale: impl Into<TypePath>, current: impl Into<TypePath>) {
        let stale = stale.into();
        let current = current.into();
        tracing::debug!("Redirecting type {stale} to {current}");
        self.redirects.insert(stale, current);
    }

    /// Register a struct conversion
    pub fn add_conversion(&mut self, conversion: StructConversion) {
        self.conversions.insert(conversion);
    }

    /// Get all descriptors
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }

    /// Get all redirects
    pub fn redirects(&self) -> impl Iterator<Item = (&TypePath, &TypePath)> {
        self.redirects.iter()
    }

    /// Get all conversions
    pub fn conversions(&self) -> impl Iterator<Item = &StructConversion> {
        self.conversions.iter()
    }
}

impl TypeHierarchy for TypeCatalog {
    fn describe(&self, path: &TypePath) -> Option<&TypeDescriptor> {
        self.descriptors.get(path)
    }

    fn authoritative_path<'a>(&'a self, path: &'a TypePath) -> &'a TypePath {
        let mut current = path;
        // Redirect chains are short; the bound only guards against cycles.
        for _ in 0..=self.redirects.len() {
            match self.redirects.get(current) {
                Some(next) => current = next,
                None => return current,
            }
        }
        tracing::error!("Cyclic type redirect starting at {path}");
        path
    }
}

impl StructConversions for TypeCatalog {
    fn has_conversion(&self, from: &TypePath, to: &TypePath, context: Option<&TypePath>) -> bool {
        let from = self.authoritative_path(from);
        let to = self.authoritative_path(to);

        self.conversions.iter().any(|conversion| {
            self.authoritative_path(&conversion.from) == from
                && self.authoritative_path(&conversion.to) == to
                && match (&conversion.context, context) {
                    (None, _) => true,
                    (Some(scope), Some(asking)) => self.path_is_child_of(asking, scope),
                    (Some(_), None) => false,
                }
        })
    }
}

impl TypeCatalog {
    fn path_is_child_of(&self, child: &TypePath, parent: &TypePath) -> bool {
        let found = (
            self.describe(self.authoritative_path(child)),
            self.describe(self.authoritative_path(parent)),
        );
        match found {
            (Some(child), Some(parent)) => self.is_child_of(child, parent),
            _ => self.authoritative_path(child) == self.authoritative_path(parent),
        }
    }
}
