//! # Channel Catalog and Encode Blocks
//!
//! [`CHANNELS`] binds every visual channel a mark can encode to the value
//! schema it accepts. The catalog only grows: channels are appended as
//! marks gain properties, never removed or rebound.
//!
//! `encodeEntry` is a closed object over the catalog; `encode` maps any
//! non-empty state name (`enter`, `update`, `exit`, `hover`, ...) to an
//! `encodeEntry`.

use vgschema_core::{definition, object, pattern, reference, Fragment};

use crate::vocab::Vocabulary;

use ChannelValue as V;

pub const ENCODE_ENTRY: &str = "encodeEntry";
pub const ENCODE: &str = "encode";

/// Pattern matching every encode-set name.
pub const STATE_KEY_PATTERN: &str = "^.+$";

/// Value schema variant a channel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelValue {
    Number,
    Color,
    String,
    Boolean,
    Array,
    Any,
    Vocab(Vocabulary),
}

impl ChannelValue {
    /// Name of the registered value schema for this variant.
    pub fn ref_name(&self) -> &'static str {
        match self {
            Self::Number => crate::NUMBER_VALUE,
            Self::Color => crate::COLOR_VALUE,
            Self::String => crate::STRING_VALUE,
            Self::Boolean => crate::BOOLEAN_VALUE,
            Self::Array => crate::ARRAY_VALUE,
            Self::Any => crate::ANY_VALUE,
            Self::Vocab(vocab) => vocab.value_ref(),
        }
    }
}

/// A named visual channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub name: &'static str,
    pub value: ChannelValue,
}

const fn channel(name: &'static str, value: ChannelValue) -> Channel {
    Channel { name, value }
}

pub const CHANNELS: &[Channel] = &[
    // Common properties
    channel("x", V::Number),
    channel("x2", V::Number),
    channel("xc", V::Number),
    channel("width", V::Number),
    channel("y", V::Number),
    channel("y2", V::Number),
    channel("yc", V::Number),
    channel("height", V::Number),
    channel("opacity", V::Number),
    channel("fill", V::Color),
    channel("fillOpacity", V::Number),
    channel("stroke", V::Color),
    channel("strokeOpacity", V::Number),
    channel("strokeWidth", V::Number),
    channel("strokeCap", V::Vocab(Vocabulary::StrokeCap)),
    channel("strokeDash", V::Array),
    channel("strokeDashOffset", V::Number),
    channel("strokeJoin", V::Vocab(Vocabulary::StrokeJoin)),
    channel("strokeMiterLimit", V::Number),
    channel("cursor", V::String),
    channel("tooltip", V::Any),
    channel("zindex", V::Number),
    // Group
    channel("clip", V::Boolean),
    // Symbol and text
    channel("angle", V::Number),
    // Symbol
    channel("size", V::Number),
    channel("shape", V::String),
    // Path
    channel("path", V::String),
    // Arc
    channel("innerRadius", V::Number),
    channel("outerRadius", V::Number),
    channel("startAngle", V::Number),
    channel("endAngle", V::Number),
    // Area and line
    channel("interpolate", V::String),
    channel("tension", V::Number),
    channel("orient", V::Vocab(Vocabulary::Direction)),
    // Image
    channel("url", V::String),
    channel("align", V::Vocab(Vocabulary::Align)),
    channel("baseline", V::Vocab(Vocabulary::Baseline)),
    // Text
    channel("text", V::String),
    channel("dir", V::String),
    channel("ellipsis", V::String),
    channel("limit", V::Number),
    channel("dx", V::Number),
    channel("dy", V::Number),
    channel("radius", V::Number),
    channel("theta", V::Number),
    channel("font", V::String),
    channel("fontSize", V::Number),
    channel("fontWeight", V::Vocab(Vocabulary::FontWeight)),
    channel("fontStyle", V::String),
];

/// Look up a channel by name.
pub fn find_channel(name: &str) -> Option<&'static Channel> {
    CHANNELS.iter().find(|c| c.name == name)
}

/// Closed object binding each catalog channel to its value schema.
pub fn encode_entry() -> Fragment {
    CHANNELS
        .iter()
        .fold(object(), |obj, c| obj.optional(c.name, reference(c.value.ref_name())))
        .closed()
}

pub fn encode() -> Fragment {
    pattern([(STATE_KEY_PATTERN, definition(ENCODE_ENTRY))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_channel_names_are_unique() {
        let names: HashSet<&str> = CHANNELS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CHANNELS.len());
    }

    #[test]
    fn test_orient_channel_uses_direction_vocabulary() {
        let orient = find_channel("orient").unwrap();
        assert_eq!(orient.value.ref_name(), "directionValue");
    }

    #[test]
    fn test_tooltip_is_pass_through() {
        assert_eq!(find_channel("tooltip").unwrap().value, ChannelValue::Any);
        assert!(find_channel("foo").is_none());
    }

    #[test]
    fn test_encode_entry_is_closed_and_optional() {
        let rendered = encode_entry().to_json();
        assert_eq!(rendered["additionalProperties"], false);
        assert!(rendered.get("required").is_none());
        let props = rendered["properties"].as_object().unwrap();
        assert_eq!(props.len(), CHANNELS.len());
        assert_eq!(props["fill"], serde_json::json!({"$ref": "#/refs/colorValue"}));
    }

    #[test]
    fn test_encode_maps_any_state_to_entry() {
        assert_eq!(
            encode().to_json(),
            serde_json::json!({
                "type": "object",
                "patternProperties": {"^.+$": {"$ref": "#/defs/encodeEntry"}},
                "additionalProperties": false
            })
        );
    }
}
