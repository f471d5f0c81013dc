//! # vgschema-core — Schema Fragment Model
//!
//! The building blocks every visualization-grammar schema module is made of.
//! A schema is a graph of immutable [`Fragment`] values assembled with a
//! small set of combinators, plus a [`Registry`] that owns the named
//! fragments other fragments point at.
//!
//! ## Key Design Principles
//!
//! 1. **Fragments are plain values.** Each fragment is a tagged variant
//!    (primitive type test, enumeration, logical composition, keyed object,
//!    array, required-keys shorthand, or named reference). Nothing is shared
//!    by pointer; reusing a fragment means cloning it.
//!
//! 2. **Cycles live only in the naming graph.** A fragment may reference
//!    itself by name (field references nest arbitrarily), but ownership is
//!    a tree. References are resolved by name against the registry.
//!
//! 3. **Construction is a pure pass.** A [`RegistryBuilder`] collects named
//!    fragments and [`RegistryBuilder::build`] rejects the graph if any
//!    reference dangles. The resulting [`Registry`] is read-only.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vgschema-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fragment;
pub mod registry;

pub use error::SchemaError;
pub use fragment::{
    all_of, any_of, array, array_bounded, boolean, definition, enums, null, number, object,
    one_of, pattern, primitive, primitive_with_default, reference, required, string,
    Additional, ArrayShape, Fragment, ObjectBuilder, ObjectKeys, ObjectShape, PrimitiveType,
    Property, Space,
};
pub use registry::{Registry, RegistryBuilder, ReferenceEdge};
