//! # Field, Scale, Signal, and Modifier Fragments
//!
//! Field references name where a value is read from: a field of the current
//! datum, a field of an enclosing group or parent scope (at a given nesting
//! level), or a signal. The `datum`/`group`/`parent` forms hold another
//! field reference, so lookups nest to any depth through the `field` name.

use serde_json::json;
use vgschema_core::{
    boolean, number, object, one_of, primitive_with_default, reference, string, Fragment,
    PrimitiveType,
};

pub const SIGNAL: &str = "signal";
pub const FIELD: &str = "field";
pub const SCALE: &str = "scale";
pub const RULE: &str = "rule";
pub const STRING_MODIFIERS: &str = "stringModifiers";
pub const NUMBER_MODIFIERS: &str = "numberModifiers";

/// `{signal: <name>}`.
pub fn signal() -> Fragment {
    object().required("signal", string()).closed()
}

/// A number, or a signal reference evaluating to one.
pub fn number_or_signal() -> Fragment {
    one_of([number(), reference(SIGNAL)])
}

pub fn field() -> Fragment {
    one_of([
        string(),
        reference(SIGNAL),
        object().required("datum", reference(FIELD)).closed(),
        object()
            .required("group", reference(FIELD))
            .optional("level", number())
            .closed(),
        object()
            .required("parent", reference(FIELD))
            .optional("level", number())
            .closed(),
    ])
}

/// Scales are named the same way fields are.
pub fn scale() -> Fragment {
    reference(FIELD)
}

/// Guard of one item in a rule list. `test` is optional so the final item
/// can act as the fallback.
pub fn rule() -> Fragment {
    object().optional("test", string()).open()
}

pub fn string_modifiers() -> Fragment {
    object().optional("scale", reference(SCALE)).open()
}

pub fn number_modifiers() -> Fragment {
    object()
        .optional("exponent", number_or_signal())
        .optional("mult", number_or_signal())
        .optional("offset", number_or_signal())
        .optional(
            "round",
            primitive_with_default(PrimitiveType::Boolean, json!(false)),
        )
        .optional("scale", reference(SCALE))
        .optional("band", one_of([number(), boolean()]))
        .optional("extra", boolean())
        .open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgschema_core::{Additional, Fragment, ObjectShape};

    fn additional(fragment: &Fragment) -> Additional {
        match fragment {
            Fragment::Object(ObjectShape { additional, .. }) => *additional,
            other => panic!("not an object: {other:?}"),
        }
    }

    #[test]
    fn test_field_nests_through_its_own_name() {
        let mut targets = Vec::new();
        field().visit_references(&mut |_, name| targets.push(name.to_string()));
        assert_eq!(targets, vec!["signal", "field", "field", "field"]);
    }

    #[test]
    fn test_modifiers_tolerate_other_keys() {
        assert_eq!(additional(&string_modifiers()), Additional::Allowed);
        assert_eq!(additional(&number_modifiers()), Additional::Allowed);
        assert_eq!(additional(&rule()), Additional::Allowed);
        assert_eq!(additional(&signal()), Additional::Forbidden);
    }

    #[test]
    fn test_number_modifiers_keys() {
        let modifiers = number_modifiers();
        for key in ["exponent", "mult", "offset", "round", "scale", "band", "extra"] {
            let prop = modifiers
                .property(key)
                .unwrap_or_else(|| panic!("missing modifier {key}"));
            assert!(!prop.required, "{key} should be optional");
        }
        assert_eq!(
            modifiers.property("round").unwrap().fragment.to_json(),
            json!({"type": "boolean", "default": false})
        );
    }

    #[test]
    fn test_string_modifiers_only_scale() {
        let rendered = string_modifiers().to_json();
        let keys: Vec<&String> = rendered["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["scale"]);
    }

    #[test]
    fn test_scale_aliases_field() {
        assert_eq!(scale(), reference(FIELD));
    }
}
