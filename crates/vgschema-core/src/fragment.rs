//! # Schema Fragments and Combinators
//!
//! A [`Fragment`] is one node of a schema graph. Fragments are built with
//! the free-function combinators in this module and rendered to standard
//! JSON Schema with [`Fragment::to_json`].
//!
//! ## Rendering
//!
//! | Variant | JSON Schema |
//! |---------|-------------|
//! | `Any` | `{}` |
//! | `Primitive` | `{"type": ..., "default"?: ...}` |
//! | `Enum` | `{"enum": [...]}` |
//! | `AllOf` / `AnyOf` / `OneOf` | `{"allOf": [...]}` etc. |
//! | `Object` (fixed keys) | `properties`, `required`, `additionalProperties` |
//! | `Object` (pattern keys) | `patternProperties`, `additionalProperties` |
//! | `Array` | `{"type": "array", "items": ..., "minItems"?, "maxItems"?}` |
//! | `Required` | `{"required": [...]}` |
//! | `Reference` | `{"$ref": "#/refs/<name>"}` or `{"$ref": "#/defs/<name>"}` |
//!
//! `additionalProperties` is only emitted when forbidden; an open object
//! leaves the keyword out.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Registry namespace a named fragment lives in.
///
/// `Refs` holds fragments that are only meant to be used by reference;
/// `Defs` holds top-level fragments other grammar modules use directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Space {
    Refs,
    Defs,
}

impl Space {
    /// Key of this namespace in the rendered registry document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refs => "refs",
            Self::Defs => "defs",
        }
    }

    /// JSON Pointer fragment (`#/refs/<name>`) addressing `name` in this namespace.
    pub fn pointer(&self, name: &str) -> String {
        format!("#/{}/{name}", self.as_str())
    }

    /// Qualified `<space>/<name>` label used in diagnostics.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}/{name}", self.as_str())
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl PrimitiveType {
    /// JSON Schema `type` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an object accepts keys beyond the ones it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Additional {
    Allowed,
    Forbidden,
}

/// A declared object key.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub fragment: Fragment,
    pub required: bool,
}

/// How an object declares its keys.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKeys {
    /// A fixed list of named keys, in declaration order.
    Fixed(Vec<Property>),
    /// Regex key patterns, each mapped to the fragment matching keys that
    /// satisfy it.
    Pattern(Vec<(String, Fragment)>),
}

/// Keys plus the extra-key policy of an object fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectShape {
    pub keys: ObjectKeys,
    pub additional: Additional,
}

/// Item schema and optional length bounds of an array fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayShape {
    pub items: Box<Fragment>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// One immutable node of a schema graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Accepts any value.
    Any,
    /// A primitive type test, optionally annotated with a default.
    Primitive {
        ty: PrimitiveType,
        default: Option<Value>,
    },
    /// A closed set of literal values.
    Enum(Vec<Value>),
    /// Every child must match.
    AllOf(Vec<Fragment>),
    /// At least one child must match.
    AnyOf(Vec<Fragment>),
    /// Exactly one child must match.
    OneOf(Vec<Fragment>),
    Object(ObjectShape),
    Array(ArrayShape),
    /// Shorthand that only demands the listed keys be present.
    Required(Vec<String>),
    /// A named fragment resolved against a registry.
    Reference { space: Space, name: String },
}

impl Fragment {
    /// Render this fragment as a JSON Schema value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Any => json!({}),
            Self::Primitive { ty, default } => {
                let mut out = Map::new();
                out.insert("type".into(), Value::String(ty.as_str().into()));
                if let Some(default) = default {
                    out.insert("default".into(), default.clone());
                }
                Value::Object(out)
            }
            Self::Enum(values) => json!({ "enum": values }),
            Self::AllOf(children) => composition("allOf", children),
            Self::AnyOf(children) => composition("anyOf", children),
            Self::OneOf(children) => composition("oneOf", children),
            Self::Object(shape) => object_json(shape),
            Self::Array(shape) => {
                let mut out = Map::new();
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), shape.items.to_json());
                if let Some(min) = shape.min_items {
                    out.insert("minItems".into(), json!(min));
                }
                if let Some(max) = shape.max_items {
                    out.insert("maxItems".into(), json!(max));
                }
                Value::Object(out)
            }
            Self::Required(keys) => json!({ "required": keys }),
            Self::Reference { space, name } => json!({ "$ref": space.pointer(name) }),
        }
    }

    /// Call `visit` for every named reference reachable from this fragment
    /// without crossing a reference (references are not followed).
    pub fn visit_references<'a>(&'a self, visit: &mut impl FnMut(Space, &'a str)) {
        match self {
            Self::Any | Self::Primitive { .. } | Self::Enum(_) | Self::Required(_) => {}
            Self::AllOf(children) | Self::AnyOf(children) | Self::OneOf(children) => {
                for child in children {
                    child.visit_references(visit);
                }
            }
            Self::Object(shape) => match &shape.keys {
                ObjectKeys::Fixed(props) => {
                    for prop in props {
                        prop.fragment.visit_references(visit);
                    }
                }
                ObjectKeys::Pattern(entries) => {
                    for (_, fragment) in entries {
                        fragment.visit_references(visit);
                    }
                }
            },
            Self::Array(shape) => shape.items.visit_references(visit),
            Self::Reference { space, name } => visit(*space, name),
        }
    }

    /// Returns the fixed-key property named `name`, if this is an object
    /// declaring it.
    pub fn property(&self, name: &str) -> Option<&Property> {
        match self {
            Self::Object(ObjectShape {
                keys: ObjectKeys::Fixed(props),
                ..
            }) => props.iter().find(|p| p.name == name),
            _ => None,
        }
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn composition(keyword: &str, children: &[Fragment]) -> Value {
    let items: Vec<Value> = children.iter().map(Fragment::to_json).collect();
    let mut out = Map::new();
    out.insert(keyword.into(), Value::Array(items));
    Value::Object(out)
}

fn object_json(shape: &ObjectShape) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    match &shape.keys {
        ObjectKeys::Fixed(props) => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for prop in props {
                properties.insert(prop.name.clone(), prop.fragment.to_json());
                if prop.required {
                    required.push(Value::String(prop.name.clone()));
                }
            }
            out.insert("properties".into(), Value::Object(properties));
            if !required.is_empty() {
                out.insert("required".into(), Value::Array(required));
            }
        }
        ObjectKeys::Pattern(entries) => {
            let patterns: Map<String, Value> = entries
                .iter()
                .map(|(key, fragment)| (key.clone(), fragment.to_json()))
                .collect();
            out.insert("patternProperties".into(), Value::Object(patterns));
        }
    }
    if shape.additional == Additional::Forbidden {
        out.insert("additionalProperties".into(), Value::Bool(false));
    }
    Value::Object(out)
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// A bare primitive type test.
pub fn primitive(ty: PrimitiveType) -> Fragment {
    Fragment::Primitive { ty, default: None }
}

/// A primitive type test carrying a `default` annotation.
pub fn primitive_with_default(ty: PrimitiveType, default: Value) -> Fragment {
    Fragment::Primitive {
        ty,
        default: Some(default),
    }
}

/// Matches only `null`.
pub fn null() -> Fragment {
    primitive(PrimitiveType::Null)
}

/// Matches `true` or `false`.
pub fn boolean() -> Fragment {
    primitive(PrimitiveType::Boolean)
}

/// Matches any JSON number.
pub fn number() -> Fragment {
    primitive(PrimitiveType::Number)
}

/// Matches any JSON string.
pub fn string() -> Fragment {
    primitive(PrimitiveType::String)
}

/// A closed set of literal values.
///
/// No checking happens here; callers that accept enumerations from outside
/// validate them first (see `vgschema-encode`'s `BaseType::enumeration`).
pub fn enums<I, V>(values: I) -> Fragment
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Fragment::Enum(values.into_iter().map(Into::into).collect())
}

/// Exactly one child must match.
pub fn one_of(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::OneOf(children.into_iter().collect())
}

/// At least one child must match.
pub fn any_of(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::AnyOf(children.into_iter().collect())
}

/// Every child must match.
pub fn all_of(children: impl IntoIterator<Item = Fragment>) -> Fragment {
    Fragment::AllOf(children.into_iter().collect())
}

/// Reference to a fragment in the `refs` namespace.
pub fn reference(name: impl Into<String>) -> Fragment {
    Fragment::Reference {
        space: Space::Refs,
        name: name.into(),
    }
}

/// Reference to a top-level fragment in the `defs` namespace.
pub fn definition(name: impl Into<String>) -> Fragment {
    Fragment::Reference {
        space: Space::Defs,
        name: name.into(),
    }
}

/// Require the listed keys without constraining their values.
pub fn required<I, S>(keys: I) -> Fragment
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Fragment::Required(keys.into_iter().map(Into::into).collect())
}

/// Array whose every item matches `items`.
pub fn array(items: Fragment) -> Fragment {
    Fragment::Array(ArrayShape {
        items: Box::new(items),
        min_items: None,
        max_items: None,
    })
}

/// Array with an inclusive length range.
pub fn array_bounded(items: Fragment, min_items: usize, max_items: usize) -> Fragment {
    Fragment::Array(ArrayShape {
        items: Box::new(items),
        min_items: Some(min_items),
        max_items: Some(max_items),
    })
}

/// Start a fixed-key object. Finish with [`ObjectBuilder::closed`] or
/// [`ObjectBuilder::open`].
pub fn object() -> ObjectBuilder {
    ObjectBuilder { props: Vec::new() }
}

/// Object whose keys are matched by regex patterns. Keys matching none of
/// the patterns are rejected.
pub fn pattern<I, K>(entries: I) -> Fragment
where
    I: IntoIterator<Item = (K, Fragment)>,
    K: Into<String>,
{
    Fragment::Object(ObjectShape {
        keys: ObjectKeys::Pattern(entries.into_iter().map(|(k, f)| (k.into(), f)).collect()),
        additional: Additional::Forbidden,
    })
}

/// Builder for fixed-key object fragments.
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    props: Vec<Property>,
}

impl ObjectBuilder {
    /// Declare a key that must be present.
    pub fn required(mut self, name: impl Into<String>, fragment: Fragment) -> Self {
        self.props.push(Property {
            name: name.into(),
            fragment,
            required: true,
        });
        self
    }

    /// Declare a key that may be omitted.
    pub fn optional(mut self, name: impl Into<String>, fragment: Fragment) -> Self {
        self.props.push(Property {
            name: name.into(),
            fragment,
            required: false,
        });
        self
    }

    /// Finish, rejecting undeclared keys.
    pub fn closed(self) -> Fragment {
        self.finish(Additional::Forbidden)
    }

    /// Finish, tolerating undeclared keys.
    pub fn open(self) -> Fragment {
        self.finish(Additional::Allowed)
    }

    fn finish(self, additional: Additional) -> Fragment {
        Fragment::Object(ObjectShape {
            keys: ObjectKeys::Fixed(self.props),
            additional,
        })
    }
}
