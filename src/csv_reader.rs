use std::fs::File;
use std::io;
use std::path::Path;

use crate::age_range::AgeRange;
use crate::category::{Gender, Season, Size, SubscriptionStatus};
use crate::error::{DashboardError, Result};
use crate::field::Field;

/// Columns the dashboard reads. Everything else in the export is ignored.
pub const COLUMNS: &[&str] = &[
    "Age",
    "Gender",
    "Age Range",
    "Subscription Status",
    "Color",
    "Season",
    "Size",
];

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Record {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Age Range")]
    pub age_range: Option<AgeRange>,
    #[serde(rename = "Subscription Status")]
    pub subscription_status: SubscriptionStatus,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Season")]
    pub season: Season,
    #[serde(rename = "Size")]
    pub size: Size,
}

impl Record {
    /// The category this record falls into for `field`.
    pub fn category(&self, field: Field) -> &str {
        match field {
            Field::SubscriptionStatus => self.subscription_status.label(),
            Field::Color => &self.color,
            Field::Season => self.season.label(),
            Field::Size => self.size.label(),
        }
    }
}

/// Fields are trimmed so padded cells parse the same way the
/// preprocessor read them.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?;
    if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(DashboardError::MissingColumn(missing.to_string()));
    }
    let mut records = Vec::<Record>::new();
    for result in rdr.deserialize() {
        let record: Record = result?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_data(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    read_records(file)
}
