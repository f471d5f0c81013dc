//! # Error Types
//!
//! Every error in this crate is a construction-time defect in a schema
//! graph. None of them can occur once a [`Registry`](crate::Registry) has
//! been built.

use serde_json::Value;
use thiserror::Error;

use crate::fragment::Space;

/// Structural defect detected while assembling a schema graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The same name was registered twice with different fragments.
    #[error("{space} fragment '{name}' registered twice with conflicting definitions")]
    DuplicateFragment {
        /// Namespace the name was registered in.
        space: Space,
        /// The conflicting name.
        name: String,
    },

    /// A reference names a fragment that was never registered.
    #[error("dangling reference to {space} '{name}' from '{referenced_from}'")]
    DanglingReference {
        /// Namespace the reference points into.
        space: Space,
        /// The unresolved name.
        name: String,
        /// Qualified name (`refs/<name>` or `defs/<name>`) of the fragment
        /// containing the reference.
        referenced_from: String,
    },

    /// An enumeration was given no members.
    #[error("enumeration must list at least one value")]
    EmptyEnumeration,

    /// An enumeration member is an array or object.
    #[error("enumeration member {index} is not a scalar: {value}")]
    NonScalarEnumMember {
        /// Position of the member in the supplied list.
        index: usize,
        /// The offending member.
        value: Value,
    },

    /// An enumeration lists the same member twice.
    #[error("enumeration lists {value} more than once")]
    DuplicateEnumMember {
        /// The repeated member.
        value: Value,
    },

    /// A numeric enumeration contains a member that is not a number, so the
    /// numeric modifier set cannot be selected unambiguously.
    #[error("numeric enumeration contains non-numeric member {value}")]
    AmbiguousEnumKind {
        /// The first non-numeric member.
        value: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dangling_reference_display_names_origin() {
        let err = SchemaError::DanglingReference {
            space: Space::Refs,
            name: "scale".to_string(),
            referenced_from: "refs/numberModifiers".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("refs 'scale'"), "got: {msg}");
        assert!(msg.contains("refs/numberModifiers"), "got: {msg}");
    }

    #[test]
    fn test_non_scalar_member_display() {
        let err = SchemaError::NonScalarEnumMember {
            index: 2,
            value: json!({"a": 1}),
        };
        assert_eq!(
            err.to_string(),
            r#"enumeration member 2 is not a scalar: {"a":1}"#
        );
    }
}
