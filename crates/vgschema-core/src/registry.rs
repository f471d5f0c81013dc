//! # Fragment Registry
//!
//! Two name → fragment mappings: `refs` (fragments used by reference, may be
//! forward-referenced and mutually recursive) and `defs` (top-level
//! fragments usable directly).
//!
//! ## Invariant
//!
//! Every reference anywhere in the graph resolves to an entry of the
//! namespace it points into. [`RegistryBuilder::build`] enforces this, so a
//! [`Registry`] value is complete by construction. A registry is never
//! mutated after it is built and can be shared freely across threads.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::fragment::{Fragment, Space};

/// One outgoing reference: the fragment that contains it and its target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceEdge {
    pub from_space: Space,
    pub from_name: String,
    pub to_space: Space,
    pub to_name: String,
}

/// Collects named fragments before the completeness check.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    refs: BTreeMap<String, Fragment>,
    defs: BTreeMap<String, Fragment>,
}

impl RegistryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fragment` under `name` in `space`.
    ///
    /// Registering an identical fragment twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateFragment`] if `name` already holds a
    /// different fragment.
    pub fn add(
        &mut self,
        space: Space,
        name: impl Into<String>,
        fragment: Fragment,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        let table = match space {
            Space::Refs => &mut self.refs,
            Space::Defs => &mut self.defs,
        };
        if let Some(existing) = table.get(&name) {
            if *existing == fragment {
                return Ok(());
            }
            return Err(SchemaError::DuplicateFragment { space, name });
        }
        tracing::debug!(space = %space, name = %name, "registered schema fragment");
        table.insert(name, fragment);
        Ok(())
    }

    /// Register `name` in the `refs` namespace.
    pub fn add_ref(&mut self, name: impl Into<String>, fragment: Fragment) -> Result<(), SchemaError> {
        self.add(Space::Refs, name, fragment)
    }

    /// Register `name` in the `defs` namespace.
    pub fn add_def(&mut self, name: impl Into<String>, fragment: Fragment) -> Result<(), SchemaError> {
        self.add(Space::Defs, name, fragment)
    }

    /// Fold every entry of an already-built registry into this builder.
    pub fn merge(&mut self, other: Registry) -> Result<(), SchemaError> {
        for (name, fragment) in other.refs {
            self.add_ref(name, fragment)?;
        }
        for (name, fragment) in other.defs {
            self.add_def(name, fragment)?;
        }
        Ok(())
    }

    /// Run the completeness check and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DanglingReference`] for the first reference
    /// (in name order) whose target is not registered.
    pub fn build(self) -> Result<Registry, SchemaError> {
        let registry = Registry {
            refs: self.refs,
            defs: self.defs,
        };
        let edges = registry.references();
        if let Some(edge) = edges
            .iter()
            .find(|e| registry.get(e.to_space, &e.to_name).is_none())
        {
            return Err(SchemaError::DanglingReference {
                space: edge.to_space,
                name: edge.to_name.clone(),
                referenced_from: edge.from_space.qualify(&edge.from_name),
            });
        }
        tracing::debug!(
            refs = registry.refs.len(),
            defs = registry.defs.len(),
            references = edges.len(),
            "schema registry complete"
        );
        Ok(registry)
    }
}

/// A complete, immutable set of named fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    refs: BTreeMap<String, Fragment>,
    defs: BTreeMap<String, Fragment>,
}

impl Registry {
    /// Look up `name` in `space`.
    pub fn get(&self, space: Space, name: &str) -> Option<&Fragment> {
        match space {
            Space::Refs => self.refs.get(name),
            Space::Defs => self.defs.get(name),
        }
    }

    /// Look up `name` in `refs`.
    pub fn get_ref(&self, name: &str) -> Option<&Fragment> {
        self.refs.get(name)
    }

    /// Look up `name` in `defs`.
    pub fn get_def(&self, name: &str) -> Option<&Fragment> {
        self.defs.get(name)
    }

    /// True if `name` is registered in `space`.
    pub fn contains(&self, space: Space, name: &str) -> bool {
        self.get(space, name).is_some()
    }

    /// `refs` entries in name order.
    pub fn refs(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.refs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `defs` entries in name order.
    pub fn defs(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.defs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every registered name, qualified by namespace, `refs` first.
    pub fn names(&self) -> Vec<(Space, &str)> {
        self.refs
            .keys()
            .map(|k| (Space::Refs, k.as_str()))
            .chain(self.defs.keys().map(|k| (Space::Defs, k.as_str())))
            .collect()
    }

    /// Total number of named fragments across both namespaces.
    pub fn len(&self) -> usize {
        self.refs.len() + self.defs.len()
    }

    /// True if neither namespace holds a fragment.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty() && self.defs.is_empty()
    }

    /// Every outgoing reference of every registered fragment, sorted.
    pub fn references(&self) -> Vec<ReferenceEdge> {
        let mut edges = Vec::new();
        for (from_space, table) in [(Space::Refs, &self.refs), (Space::Defs, &self.defs)] {
            for (from_name, fragment) in table {
                fragment.visit_references(&mut |to_space, to_name| {
                    edges.push(ReferenceEdge {
                        from_space,
                        from_name: from_name.clone(),
                        to_space,
                        to_name: to_name.to_string(),
                    });
                });
            }
        }
        edges.sort();
        edges.dedup();
        edges
    }

    /// Render as `{"refs": {...}, "defs": {...}}`.
    pub fn to_json(&self) -> Value {
        let render = |table: &BTreeMap<String, Fragment>| -> Value {
            Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            )
        };
        let mut out = Map::new();
        out.insert(Space::Refs.as_str().into(), render(&self.refs));
        out.insert(Space::Defs.as_str().into(), render(&self.defs));
        Value::Object(out)
    }
}

impl Serialize for Registry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{definition, number, object, one_of, reference, string};
    use serde_json::json;

    fn recursive_field() -> Fragment {
        one_of([
            string(),
            object().required("parent", reference("field")).closed(),
        ])
    }

    #[test]
    fn test_self_reference_is_complete() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("field", recursive_field()).unwrap();
        let registry = builder.build().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(Space::Refs, "field"));
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut builder = RegistryBuilder::new();
        builder.add_def("entry", reference("value")).unwrap();
        builder.add_ref("value", number()).unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut builder = RegistryBuilder::new();
        builder
            .add_ref("numberModifiers", object().optional("scale", reference("scale")).open())
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DanglingReference {
                space: Space::Refs,
                name: "scale".into(),
                referenced_from: "refs/numberModifiers".into(),
            }
        );
    }

    #[test]
    fn test_reference_into_wrong_space_is_dangling() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("rule", string()).unwrap();
        builder.add_ref("value", definition("rule")).unwrap();
        let err = builder.build().unwrap_err();
        assert!(
            matches!(err, SchemaError::DanglingReference { space: Space::Defs, .. }),
            "got: {err}"
        );
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("value", number()).unwrap();
        let err = builder.add_ref("value", string()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateFragment {
                space: Space::Refs,
                name: "value".into()
            }
        );
    }

    #[test]
    fn test_identical_duplicate_is_idempotent() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("value", number()).unwrap();
        builder.add_ref("value", number()).unwrap();
        assert_eq!(builder.build().unwrap().len(), 1);
    }

    #[test]
    fn test_same_name_in_both_spaces_is_allowed() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("rule", number()).unwrap();
        builder.add_def("rule", string()).unwrap();
        let registry = builder.build().unwrap();
        assert_eq!(registry.get_ref("rule"), Some(&number()));
        assert_eq!(registry.get_def("rule"), Some(&string()));
    }

    #[test]
    fn test_merge_detects_conflicts_across_modules() {
        let mut a = RegistryBuilder::new();
        a.add_ref("signal", string()).unwrap();
        let a = a.build().unwrap();

        let mut b = RegistryBuilder::new();
        b.add_ref("signal", number()).unwrap();
        assert!(b.merge(a).is_err());
    }

    #[test]
    fn test_references_lists_edges_with_origin() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("field", recursive_field()).unwrap();
        builder.add_def("encode", reference("field")).unwrap();
        let edges = builder.build().unwrap().references();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.to_name == "field"));
        assert!(edges
            .iter()
            .any(|e| e.from_space == Space::Defs && e.from_name == "encode"));
    }

    #[test]
    fn test_to_json_has_both_namespaces() {
        let mut builder = RegistryBuilder::new();
        builder.add_ref("n", number()).unwrap();
        builder.add_def("d", reference("n")).unwrap();
        let rendered = builder.build().unwrap().to_json();
        assert_eq!(
            rendered,
            json!({
                "refs": {"n": {"type": "number"}},
                "defs": {"d": {"$ref": "#/refs/n"}}
            })
        );
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
