//! Age bucketing and the one-off preprocessing pass that writes the
//! `Age Range` column into the survey export.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::StringRecord;

use crate::category::label_enum;
use crate::error::{DashboardError, Result};

pub const AGE_COLUMN: &str = "Age";
pub const AGE_RANGE_COLUMN: &str = "Age Range";

/// Bin edges, left-inclusive and right-exclusive.
pub const AGE_BIN_EDGES: [i64; 7] = [18, 28, 38, 48, 58, 68, 78];

label_enum! {
    pub enum AgeRange {
        From18To27 => "18-27",
        From28To37 => "28-37",
        From38To47 => "38-47",
        From48To57 => "48-57",
        From58To67 => "58-67",
        From68To77 => "68-77",
    }
}

impl AgeRange {
    /// Ages outside `[18, 78)` have no range.
    pub fn from_age(age: i64) -> Option<Self> {
        AGE_BIN_EDGES
            .windows(2)
            .position(|edge| age >= edge[0] && age < edge[1])
            .map(|pos| Self::ALL[pos])
    }
}

impl FromStr for AgeRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AgeRange::from_label(s.trim())
            .ok_or_else(|| DashboardError::UnknownAgeRange(s.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub rows: usize,
    pub out_of_range: usize,
}

/// Copies every row from `input` to `output`, appending an `Age Range`
/// column. An existing `Age Range` column is recomputed in place.
pub fn add_age_ranges<R: io::Read, W: io::Write>(
    input: R,
    output: W,
) -> Result<PreprocessSummary> {
    let mut rdr = csv::Reader::from_reader(input);
    let mut headers = rdr.headers()?.clone();
    let age_idx = headers
        .iter()
        .position(|h| h == AGE_COLUMN)
        .ok_or_else(|| DashboardError::MissingColumn(AGE_COLUMN.to_string()))?;
    let range_idx = headers.iter().position(|h| h == AGE_RANGE_COLUMN);
    if range_idx.is_none() {
        headers.push_field(AGE_RANGE_COLUMN);
    }

    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(&headers)?;

    let mut summary = PreprocessSummary::default();
    for (pos, result) in rdr.records().enumerate() {
        let record = result?;
        let raw_age = record.get(age_idx).unwrap_or_default();
        let age = raw_age.trim().parse::<i64>().map_err(|_| DashboardError::InvalidAge {
            row: pos + 1,
            value: raw_age.to_string(),
        })?;
        let label = match AgeRange::from_age(age) {
            Some(range) => range.label(),
            None => {
                summary.out_of_range += 1;
                ""
            }
        };

        let row = match range_idx {
            Some(idx) => record
                .iter()
                .enumerate()
                .map(|(i, field)| if i == idx { label } else { field })
                .collect::<StringRecord>(),
            None => {
                let mut row = record.clone();
                row.push_field(label);
                row
            }
        };
        wtr.write_record(&row)?;
        summary.rows += 1;
    }
    wtr.flush()?;
    Ok(summary)
}

/// File-level wrapper around [`add_age_ranges`]. Never touches `input`.
///
/// Rows go to a sibling `.partial` file that replaces `output` only once
/// every row has been written, so a failed run leaves `output` as it was.
pub fn preprocess_file(input: &Path, output: &Path) -> Result<PreprocessSummary> {
    let source = input.canonicalize()?;
    if output.canonicalize().map(|dest| dest == source).unwrap_or(false) {
        return Err(DashboardError::SameInputOutput(output.to_path_buf()));
    }
    let reader = File::open(&source)?;

    let mut partial = output.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let result = File::create(&partial)
        .map_err(DashboardError::from)
        .and_then(|writer| add_age_ranges(reader, writer));
    match result {
        Ok(summary) => {
            fs::rename(&partial, output)?;
            Ok(summary)
        }
        Err(err) => {
            let _ = fs::remove_file(&partial); // may never have been created
            Err(err)
        }
    }
}
