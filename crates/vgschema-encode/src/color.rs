//! # Color and Gradient Fragments
//!
//! A color channel accepts a nullable string value, a literal linear or
//! radial gradient wrapped in `{value: ...}`, a scale-driven gradient
//! shorthand, or an explicit color-space object whose three components are
//! each a number value schema.
//!
//! Gradient stop offsets are not checked for ordering or range; only the
//! `{offset: number, color: string}` shape of each stop is.

use vgschema_core::{
    array, array_bounded, enums, number, object, one_of, reference, string, Fragment,
};

use crate::field::SCALE;

pub const COLOR_RGB: &str = "colorRGB";
pub const COLOR_HSL: &str = "colorHSL";
pub const COLOR_LAB: &str = "colorLAB";
pub const COLOR_HCL: &str = "colorHCL";
pub const GRADIENT_STOPS: &str = "gradientStops";
pub const LINEAR_GRADIENT: &str = "linearGradient";
pub const RADIAL_GRADIENT: &str = "radialGradient";

/// A color space and the component keys its objects use, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgb,
    Hsl,
    Lab,
    Hcl,
}

impl ColorSpace {
    pub fn all() -> &'static [ColorSpace] {
        &[Self::Rgb, Self::Hsl, Self::Lab, Self::Hcl]
    }

    pub fn components(&self) -> [&'static str; 3] {
        match self {
            Self::Rgb => ["r", "g", "b"],
            Self::Hsl => ["h", "s", "l"],
            Self::Lab => ["l", "a", "b"],
            Self::Hcl => ["h", "c", "l"],
        }
    }

    pub fn ref_name(&self) -> &'static str {
        match self {
            Self::Rgb => COLOR_RGB,
            Self::Hsl => COLOR_HSL,
            Self::Lab => COLOR_LAB,
            Self::Hcl => COLOR_HCL,
        }
    }
}

/// Object with every component of `space` required, each a number value.
/// Extra keys are tolerated.
pub fn color_space(space: ColorSpace) -> Fragment {
    space
        .components()
        .into_iter()
        .fold(object(), |obj, key| {
            obj.required(key, reference(crate::NUMBER_VALUE))
        })
        .open()
}

pub fn gradient_stops() -> Fragment {
    array(
        object()
            .required("offset", number())
            .required("color", string())
            .closed(),
    )
}

pub fn linear_gradient() -> Fragment {
    object()
        .required("gradient", enums(["linear"]))
        .required("id", string())
        .required("x1", number())
        .required("y1", number())
        .required("x2", number())
        .required("y2", number())
        .required("stops", reference(GRADIENT_STOPS))
        .closed()
}

pub fn radial_gradient() -> Fragment {
    object()
        .required("gradient", enums(["radial"]))
        .required("id", string())
        .required("x1", number())
        .required("y1", number())
        .required("r1", number())
        .required("x2", number())
        .required("y2", number())
        .required("r2", number())
        .required("stops", reference(GRADIENT_STOPS))
        .closed()
}

/// Scale-driven gradient: sample `count` colors from a scale between the
/// `start` and `stop` coordinates.
fn scale_gradient() -> Fragment {
    object()
        .required("gradient", reference(SCALE))
        .optional("start", array_bounded(number(), 2, 2))
        .optional("stop", array_bounded(number(), 2, 2))
        .optional("count", number())
        .closed()
}

pub fn color_value() -> Fragment {
    one_of([
        reference(crate::NULLABLE_STRING_VALUE),
        object()
            .required("value", reference(LINEAR_GRADIENT))
            .closed(),
        object()
            .required("value", reference(RADIAL_GRADIENT))
            .closed(),
        scale_gradient(),
        object()
            .required(
                "color",
                one_of(ColorSpace::all().iter().map(|s| reference(s.ref_name()))),
            )
            .closed(),
    ])
}
