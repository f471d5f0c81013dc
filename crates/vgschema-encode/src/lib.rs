//! # vgschema-encode — Encode-Block Schema
//!
//! Declares the schema for the `encode` block of a mark: which visual
//! channels a mark can bind and the ways each channel's value may be
//! written (literal, signal, field, scale-transformed, range, or an ordered
//! rule list of any of these).
//!
//! [`encode_registry`] is the single entry point. It is a pure function:
//! every call builds the same complete [`Registry`], and nothing in this
//! crate holds global state.
//!
//! ## Registered names
//!
//! | Namespace | Names |
//! |-----------|-------|
//! | `refs` | `signal`, `field`, `scale`, `stringModifiers`, `numberModifiers`, the value schemas (`anyValue`, `numberValue`, `stringValue`, `booleanValue`, `arrayValue`, `nullableStringValue`, one per [`Vocabulary`]), `colorRGB`/`colorHSL`/`colorLAB`/`colorHCL`, `colorValue`, `gradientStops`, `linearGradient`, `radialGradient` |
//! | `defs` | `rule`, `encodeEntry`, `encode` |

pub mod color;
pub mod entry;
pub mod field;
pub mod value;
pub mod vocab;

use vgschema_core::{PrimitiveType, Registry, RegistryBuilder, SchemaError};

pub use color::ColorSpace;
pub use entry::{find_channel, Channel, ChannelValue, CHANNELS};
pub use value::{value_entry, value_schema, BaseType, Nullability, ValueKind};
pub use vocab::Vocabulary;

pub const ANY_VALUE: &str = "anyValue";
pub const NUMBER_VALUE: &str = "numberValue";
pub const STRING_VALUE: &str = "stringValue";
pub const BOOLEAN_VALUE: &str = "booleanValue";
pub const ARRAY_VALUE: &str = "arrayValue";
pub const NULLABLE_STRING_VALUE: &str = "nullableStringValue";
pub const COLOR_VALUE: &str = "colorValue";

/// Build the complete encode registry.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the fragment graph is malformed: a
/// vocabulary that is not a valid enumeration, a name registered twice
/// with different fragments, or a reference that does not resolve.
pub fn encode_registry() -> Result<Registry, SchemaError> {
    tracing::debug!(channels = CHANNELS.len(), "building encode registry");
    let mut builder = RegistryBuilder::new();

    builder.add_ref(field::SIGNAL, field::signal())?;
    builder.add_ref(field::FIELD, field::field())?;
    builder.add_ref(field::SCALE, field::scale())?;
    builder.add_ref(field::STRING_MODIFIERS, field::string_modifiers())?;
    builder.add_ref(field::NUMBER_MODIFIERS, field::number_modifiers())?;

    let primitives = [
        (NUMBER_VALUE, PrimitiveType::Number, Nullability::NonNull),
        (STRING_VALUE, PrimitiveType::String, Nullability::NonNull),
        (BOOLEAN_VALUE, PrimitiveType::Boolean, Nullability::NonNull),
        (ARRAY_VALUE, PrimitiveType::Array, Nullability::NonNull),
        (NULLABLE_STRING_VALUE, PrimitiveType::String, Nullability::Nullable),
    ];
    builder.add_ref(ANY_VALUE, value_schema(&BaseType::any(), Nullability::NonNull))?;
    for (name, ty, nullable) in primitives {
        builder.add_ref(name, value_schema(&BaseType::primitive(ty), nullable))?;
    }
    for vocab in Vocabulary::all() {
        let base = BaseType::enumeration(vocab.values())?;
        builder.add_ref(vocab.value_ref(), value_schema(&base, Nullability::NonNull))?;
    }

    for space in ColorSpace::all() {
        builder.add_ref(space.ref_name(), color::color_space(*space))?;
    }
    builder.add_ref(COLOR_VALUE, color::color_value())?;
    builder.add_ref(color::GRADIENT_STOPS, color::gradient_stops())?;
    builder.add_ref(color::LINEAR_GRADIENT, color::linear_gradient())?;
    builder.add_ref(color::RADIAL_GRADIENT, color::radial_gradient())?;

    builder.add_def(field::RULE, field::rule())?;
    builder.add_def(entry::ENCODE_ENTRY, entry::encode_entry())?;
    builder.add_def(entry::ENCODE, entry::encode())?;

    builder.build()
}
