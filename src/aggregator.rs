use std::collections::HashMap;

use serde::Serialize;

use crate::csv_reader::Record;
use crate::dataset::Dataset;
use crate::field::Field;
use crate::selector::SelectorState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Value counts of one field under one selector, in display order.
/// Categories with no matching record are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub field: Field,
    pub counts: Vec<CategoryCount>,
}

impl Aggregation {
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count_of(&self, label: &str) -> Option<u64> {
        self.counts.iter().find(|c| c.label == label).map(|c| c.count)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.counts.iter().map(|c| c.label.as_str()).collect()
    }
}

pub fn filter<'a>(
    dataset: &'a Dataset,
    selector: &'a SelectorState,
) -> impl Iterator<Item = &'a Record> + 'a {
    dataset.records().iter().filter(move |record| selector.matches(record))
}

pub fn aggregate(dataset: &Dataset, field: Field, selector: &SelectorState) -> Aggregation {
    let mut tally = HashMap::<&str, u64>::new();
    for record in filter(dataset, selector) {
        *tally.entry(record.category(field)).or_insert(0) += 1;
    }

    let counts = match field.spec().order {
        Some(order) => order
            .iter()
            .filter_map(|label| {
                tally.get(label).map(|count| CategoryCount {
                    label: label.to_string(),
                    count: *count,
                })
            })
            .collect(),
        None => {
            let mut counts = tally
                .into_iter()
                .map(|(label, count)| CategoryCount {
                    label: label.to_string(),
                    count,
                })
                .collect::<Vec<_>>();
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
            counts
        }
    };

    Aggregation { field, counts }
}
