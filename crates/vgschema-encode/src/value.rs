//! # Value-Schema Generator
//!
//! Produces, from one parameterized template, the schema describing every
//! legal way to supply a value for a channel of a given datatype.
//!
//! A generated value schema accepts either a single value entry or an
//! ordered rule list whose items are value entries guarded by an optional
//! `test` expression (first match wins). A value entry is an object that:
//!
//! - satisfies the modifier set for its [`ValueKind`], and
//! - is exactly one of: a signal reference, `{value: <literal>}`,
//!   `{field: <field ref>}`, `{range: <number|boolean>}`; or instead carries
//!   one of the shorthand key sets `{scale, value}`, `{scale, band}`,
//!   `{offset}`.
//!
//! The modifier set is chosen by the [`ValueKind`] tag carried on the
//! [`BaseType`]: numeric types get `numberModifiers`, every other type gets
//! `stringModifiers`.

use std::collections::BTreeSet;

use serde_json::Value;
use vgschema_core::{
    all_of, any_of, array, boolean, definition, enums, null, number, object, one_of,
    primitive, reference, required, Fragment, PrimitiveType, SchemaError,
};

use crate::field::{FIELD, RULE, SIGNAL};

/// Selects which modifier set applies to a value entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `exponent`, `mult`, `offset`, `round`, `band`, `extra`, `scale`.
    Numeric,
    /// `scale` only.
    Textual,
}

impl ValueKind {
    /// Name of the registered modifier fragment for this kind.
    pub fn modifiers_ref(&self) -> &'static str {
        match self {
            Self::Numeric => crate::field::NUMBER_MODIFIERS,
            Self::Textual => crate::field::STRING_MODIFIERS,
        }
    }
}

/// Whether a literal `null` is accepted in the `value` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullability {
    #[default]
    NonNull,
    Nullable,
}

/// The datatype a value schema is generated for.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    /// No datatype constraint: any literal passes.
    Any,
    Primitive { ty: PrimitiveType, kind: ValueKind },
    /// A closed set of scalar literals.
    Enum { values: Vec<Value>, kind: ValueKind },
}

impl BaseType {
    /// Unconstrained literal, used by pass-through channels like `tooltip`.
    pub fn any() -> Self {
        Self::Any
    }

    /// A primitive datatype. Only `number` selects the numeric modifiers.
    pub fn primitive(ty: PrimitiveType) -> Self {
        let kind = match ty {
            PrimitiveType::Number => ValueKind::Numeric,
            _ => ValueKind::Textual,
        };
        Self::Primitive { ty, kind }
    }

    /// An enumeration of scalar literals using the string modifier set.
    ///
    /// # Errors
    ///
    /// Rejects an empty list, array/object members, and repeated members.
    pub fn enumeration(values: impl IntoIterator<Item = Value>) -> Result<Self, SchemaError> {
        let values = checked_members(values)?;
        Ok(Self::Enum {
            values,
            kind: ValueKind::Textual,
        })
    }

    /// An enumeration of numbers using the numeric modifier set.
    ///
    /// # Errors
    ///
    /// As [`BaseType::enumeration`], plus [`SchemaError::AmbiguousEnumKind`]
    /// if any member is not a number.
    pub fn numeric_enumeration(
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, SchemaError> {
        let values = checked_members(values)?;
        if let Some(bad) = values.iter().find(|v| !v.is_number()) {
            return Err(SchemaError::AmbiguousEnumKind { value: bad.clone() });
        }
        Ok(Self::Enum {
            values,
            kind: ValueKind::Numeric,
        })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Any => ValueKind::Textual,
            Self::Primitive { kind, .. } | Self::Enum { kind, .. } => *kind,
        }
    }

    /// Fragment matching a literal of this type.
    pub fn literal(&self, nullable: Nullability) -> Fragment {
        let base = match self {
            // Already admits null.
            Self::Any => return Fragment::Any,
            Self::Primitive { ty, .. } => primitive(*ty),
            Self::Enum { values, .. } => enums(values.iter().cloned()),
        };
        match nullable {
            Nullability::NonNull => base,
            Nullability::Nullable => one_of([base, null()]),
        }
    }
}

fn checked_members(values: impl IntoIterator<Item = Value>) -> Result<Vec<Value>, SchemaError> {
    let values: Vec<Value> = values.into_iter().collect();
    if values.is_empty() {
        return Err(SchemaError::EmptyEnumeration);
    }
    let mut seen = BTreeSet::new();
    for (index, value) in values.iter().enumerate() {
        if value.is_array() || value.is_object() {
            return Err(SchemaError::NonScalarEnumMember {
                index,
                value: value.clone(),
            });
        }
        // Value has no Ord; its canonical text distinguishes "100" from 100.
        if !seen.insert(value.to_string()) {
            return Err(SchemaError::DuplicateEnumMember {
                value: value.clone(),
            });
        }
    }
    Ok(values)
}

/// A single value entry: modifiers intersected with the value forms.
pub fn value_entry(base: &BaseType, nullable: Nullability) -> Fragment {
    all_of([
        reference(base.kind().modifiers_ref()),
        any_of([
            one_of([
                reference(SIGNAL),
                object().required("value", base.literal(nullable)).open(),
                object().required("field", reference(FIELD)).open(),
                object()
                    .required("range", one_of([number(), boolean()]))
                    .open(),
            ]),
            required(["scale", "value"]),
            required(["scale", "band"]),
            required(["offset"]),
        ]),
    ])
}

/// The complete value schema for `base`: a single value entry, or an
/// ordered list of rule-guarded value entries.
pub fn value_schema(base: &BaseType, nullable: Nullability) -> Fragment {
    let entry = value_entry(base, nullable);
    one_of([array(all_of([definition(RULE), entry.clone()])), entry])
}
