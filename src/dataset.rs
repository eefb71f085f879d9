use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::age_range::AgeRange;
use crate::category::Gender;
use crate::csv_reader::{self, Record};
use crate::error::{DashboardError, Result};
use crate::palette::{self, Rgb};

/// The survey, loaded once and never mutated afterwards.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<Record>,
    genders: Vec<Gender>,
    age_ranges: Vec<AgeRange>,
    color_map: BTreeMap<String, Rgb>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let records = csv_reader::read_data(path)?;
        let dataset = Dataset::from_records(records)?;
        info!(
            "loaded {} records from {} (genders: {:?}, age ranges: {:?}, {} colors)",
            dataset.len(),
            path.display(),
            dataset.genders,
            dataset.age_ranges,
            dataset.color_map.len()
        );
        Ok(dataset)
    }

    /// Derives the selector options and the color map. Fails on the first
    /// color name with no display color.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut genders = Vec::new();
        let mut age_ranges = Vec::new();
        let mut color_map = BTreeMap::new();

        for record in &records {
            if !genders.contains(&record.gender) {
                genders.push(record.gender);
            }
            if let Some(range) = record.age_range {
                if !age_ranges.contains(&range) {
                    age_ranges.push(range);
                }
            }
            if !color_map.contains_key(&record.color) {
                let rgb = palette::resolve(&record.color)
                    .ok_or_else(|| DashboardError::UnknownColor(record.color.clone()))?;
                color_map.insert(record.color.clone(), rgb);
            }
        }
        age_ranges.sort();

        Ok(Dataset {
            records,
            genders,
            age_ranges,
            color_map,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct genders in first-seen order.
    pub fn genders(&self) -> &[Gender] {
        &self.genders
    }

    /// Distinct age ranges present in the data, ascending.
    pub fn age_ranges(&self) -> &[AgeRange] {
        &self.age_ranges
    }

    pub fn color_map(&self) -> &BTreeMap<String, Rgb> {
        &self.color_map
    }

    pub fn color_for(&self, name: &str) -> Option<Rgb> {
        self.color_map.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
Age,Gender,Size,Color,Season,Subscription Status,Age Range
60,Female,M,Charcoal,Spring,No,58-67
25,Male,S,Turquoise,Winter,Yes,18-27
30,Female,L,Peach,Fall,No,28-37
90,Male,XL,Turquoise,Summer,No,
";

    fn dataset() -> Dataset {
        Dataset::from_records(csv_reader::read_records(DATA.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn derives_selector_options() {
        let dataset = dataset();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.genders(), &[Gender::Female, Gender::Male]);
        assert_eq!(
            dataset.age_ranges(),
            &[AgeRange::From18To27, AgeRange::From28To37, AgeRange::From58To67]
        );
    }

    #[test]
    fn every_color_in_the_data_has_a_display_color() {
        let dataset = dataset();
        for record in dataset.records() {
            assert!(dataset.color_for(&record.color).is_some(), "{}", record.color);
        }
        assert_eq!(dataset.color_for("Charcoal"), Some(Rgb::new(54, 69, 79)));
        assert_eq!(dataset.color_map().len(), 3);
    }

    #[test]
    fn unresolvable_color_fails_at_load() {
        let data = "Age,Gender,Size,Color,Season,Subscription Status,Age Range\n\
                    20,Male,S,Sparkle,Fall,No,18-27\n";
        let records = csv_reader::read_records(data.as_bytes()).unwrap();
        let err = Dataset::from_records(records).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownColor(ref c) if c == "Sparkle"));
    }
}
