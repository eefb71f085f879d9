//! Chart specifications handed to whichever front-end draws them.

use serde::Serialize;

use crate::aggregator::{self, Aggregation};
use crate::dataset::Dataset;
use crate::field::{Field, Palette};
use crate::palette::Rgb;
use crate::selector::SelectorState;

pub const DONUT_HOLE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    Pie { hole: f64 },
    Bar { x_title: &'static str, y_title: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: u64,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub field: Field,
    pub kind: ChartKind,
    pub slices: Vec<Slice>,
}

struct ChartLayout {
    id: &'static str,
    title: &'static str,
    field: Field,
    kind: ChartKind,
}

const LAYOUT: [ChartLayout; 4] = [
    ChartLayout {
        id: "graph1",
        title: "Subscription Status",
        field: Field::SubscriptionStatus,
        kind: ChartKind::Pie { hole: DONUT_HOLE },
    },
    ChartLayout {
        id: "graph2",
        title: "Most Common Colors Purchased",
        field: Field::Color,
        kind: ChartKind::Bar { x_title: "Color", y_title: "Frequency" },
    },
    ChartLayout {
        id: "graph3",
        title: "Most Visited Seasons",
        field: Field::Season,
        kind: ChartKind::Pie { hole: DONUT_HOLE },
    },
    ChartLayout {
        id: "graph4",
        title: "Most Common Sizes Purchased",
        field: Field::Size,
        kind: ChartKind::Bar { x_title: "Size", y_title: "Frequency" },
    },
];

impl ChartSpec {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.slices.iter().map(|s| s.count).max().unwrap_or(0)
    }
}

/// Computes all four charts for one selector. Each chart runs its own
/// filter-and-aggregate pass.
pub fn render(dataset: &Dataset, selector: &SelectorState) -> Vec<ChartSpec> {
    LAYOUT
        .iter()
        .map(|layout| {
            let aggregation = aggregator::aggregate(dataset, layout.field, selector);
            ChartSpec {
                id: layout.id,
                title: layout.title,
                field: layout.field,
                kind: layout.kind,
                slices: slices(dataset, aggregation),
            }
        })
        .collect()
}

fn slices(dataset: &Dataset, aggregation: Aggregation) -> Vec<Slice> {
    let palette = aggregation.field.spec().palette;
    aggregation
        .counts
        .into_iter()
        .map(|c| {
            let color = match palette {
                Palette::Fixed(colors) => colors
                    .iter()
                    .find(|(name, _)| *name == c.label)
                    .map(|(_, rgb)| *rgb),
                Palette::Dataset => dataset.color_for(&c.label),
                Palette::None => None,
            };
            Slice {
                label: c.label,
                count: c.count,
                color,
            }
        })
        .collect()
}
