//! # Closed Vocabularies
//!
//! Fixed literal sets that constrain specific channels (font weight, text
//! alignment, stroke caps, ...). Each vocabulary is instantiated once as a
//! specialized value schema registered under [`Vocabulary::value_ref`].

use serde_json::{json, Value};

pub const ALIGN: &[&str] = &["left", "right", "center"];
pub const BASELINE: &[&str] = &["top", "middle", "bottom", "alphabetic"];
pub const ANCHOR: &[&str] = &["start", "middle", "end"];
pub const ORIENT: &[&str] = &["left", "right", "top", "bottom"];
pub const DIRECTION: &[&str] = &["horizontal", "vertical"];
pub const STROKE_CAP: &[&str] = &["butt", "round", "square"];
pub const STROKE_JOIN: &[&str] = &["miter", "round", "bevel"];

/// Named font weights, string digit weights, and numeric weights.
const FONT_WEIGHT_NAMES: &[&str] = &[
    "normal", "bold", "lighter", "bolder", "100", "200", "300", "400", "500", "600", "700",
    "800", "900",
];
const FONT_WEIGHT_NUMBERS: &[u64] = &[100, 200, 300, 400, 500, 600, 700, 800, 900];

/// Every closed vocabulary a channel can be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    FontWeight,
    Anchor,
    Align,
    Baseline,
    Direction,
    Orient,
    StrokeCap,
    StrokeJoin,
}

impl Vocabulary {
    pub fn all() -> &'static [Vocabulary] {
        &[
            Self::FontWeight,
            Self::Anchor,
            Self::Align,
            Self::Baseline,
            Self::Direction,
            Self::Orient,
            Self::StrokeCap,
            Self::StrokeJoin,
        ]
    }

    /// The literal members, in declaration order.
    ///
    /// Font weight is the only mixed vocabulary: it admits `null`, keyword
    /// and digit strings, and the numeric weights 100 through 900.
    pub fn values(&self) -> Vec<Value> {
        let words = match self {
            Self::FontWeight => {
                let mut values = vec![Value::Null];
                values.extend(FONT_WEIGHT_NAMES.iter().map(|w| json!(w)));
                values.extend(FONT_WEIGHT_NUMBERS.iter().map(|w| json!(w)));
                return values;
            }
            Self::Anchor => ANCHOR,
            Self::Align => ALIGN,
            Self::Baseline => BASELINE,
            Self::Direction => DIRECTION,
            Self::Orient => ORIENT,
            Self::StrokeCap => STROKE_CAP,
            Self::StrokeJoin => STROKE_JOIN,
        };
        words.iter().map(|w| json!(w)).collect()
    }

    /// Name of the value schema registered for this vocabulary.
    pub fn value_ref(&self) -> &'static str {
        match self {
            Self::FontWeight => "fontWeightValue",
            Self::Anchor => "anchorValue",
            Self::Align => "alignValue",
            Self::Baseline => "baselineValue",
            Self::Direction => "directionValue",
            Self::Orient => "orientValue",
            Self::StrokeCap => "strokeCapValue",
            Self::StrokeJoin => "strokeJoinValue",
        }
    }
}
