//! Per-field chart configuration: declared category order and display
//! colors, shared by aggregation and presentation.

use serde::Serialize;

use crate::palette::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    #[serde(rename = "Subscription Status")]
    SubscriptionStatus,
    Color,
    Season,
    Size,
}

/// Where a field's per-category display colors come from.
#[derive(Debug, Clone, Copy)]
pub enum Palette {
    Fixed(&'static [(&'static str, Rgb)]),
    /// The color map derived from the loaded dataset.
    Dataset,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// `None` means categories are ordered by descending count.
    pub order: Option<&'static [&'static str]>,
    pub palette: Palette,
}

const SUBSCRIPTION_ORDER: &[&str] = &["Yes", "No"];
const SEASON_ORDER: &[&str] = &["Spring", "Summer", "Fall", "Winter"];
const SIZE_ORDER: &[&str] = &["S", "M", "L", "XL"];

const SUBSCRIPTION_COLORS: &[(&str, Rgb)] = &[
    ("Yes", Rgb::new(0, 163, 108)),
    ("No", Rgb::new(215, 0, 64)),
];

const SEASON_COLORS: &[(&str, Rgb)] = &[
    ("Spring", Rgb::new(163, 212, 104)),
    ("Summer", Rgb::new(249, 214, 46)),
    ("Fall", Rgb::new(195, 103, 40)),
    ("Winter", Rgb::new(165, 193, 253)),
];

impl Field {
    pub const ALL: [Field; 4] = [
        Field::SubscriptionStatus,
        Field::Color,
        Field::Season,
        Field::Size,
    ];

    pub fn spec(self) -> FieldSpec {
        match self {
            Field::SubscriptionStatus => FieldSpec {
                order: Some(SUBSCRIPTION_ORDER),
                palette: Palette::Fixed(SUBSCRIPTION_COLORS),
            },
            Field::Color => FieldSpec {
                order: None,
                palette: Palette::Dataset,
            },
            Field::Season => FieldSpec {
                order: Some(SEASON_ORDER),
                palette: Palette::Fixed(SEASON_COLORS),
            },
            Field::Size => FieldSpec {
                order: Some(SIZE_ORDER),
                palette: Palette::None,
            },
        }
    }
}
