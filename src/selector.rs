//! Selector state: the gender radio and the age-range checklist.
//!
//! Built per request (or per terminal session) and never shared.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::age_range::AgeRange;
use crate::category::Gender;
use crate::csv_reader::Record;
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderSelector {
    Only(Gender),
    #[default]
    Both,
}

impl GenderSelector {
    /// Radio options in display order.
    pub const OPTIONS: [GenderSelector; 3] = [
        GenderSelector::Only(Gender::Male),
        GenderSelector::Only(Gender::Female),
        GenderSelector::Both,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GenderSelector::Only(gender) => gender.label(),
            GenderSelector::Both => "Both",
        }
    }

    pub fn matches(self, gender: Gender) -> bool {
        match self {
            GenderSelector::Only(selected) => selected == gender,
            GenderSelector::Both => true,
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::OPTIONS.iter().position(|o| *o == self).unwrap_or(0);
        Self::OPTIONS[(pos + 1) % Self::OPTIONS.len()]
    }
}

impl fmt::Display for GenderSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GenderSelector {
    type Err = DashboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim() == "Both" {
            Ok(GenderSelector::Both)
        } else {
            s.parse::<Gender>().map(GenderSelector::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    pub gender: GenderSelector,
    pub age_ranges: BTreeSet<AgeRange>,
}

impl Default for SelectorState {
    /// Both genders, every age range.
    fn default() -> Self {
        SelectorState {
            gender: GenderSelector::Both,
            age_ranges: AgeRange::ALL.iter().copied().collect(),
        }
    }
}

impl SelectorState {
    pub fn new(gender: GenderSelector, age_ranges: impl IntoIterator<Item = AgeRange>) -> Self {
        SelectorState {
            gender,
            age_ranges: age_ranges.into_iter().collect(),
        }
    }

    /// Parses query-string style selectors. A missing `gender` means `Both`,
    /// a missing `ages` means every range, and an empty `ages` means none.
    pub fn from_query(gender: Option<&str>, ages: Option<&str>) -> Result<Self> {
        let gender = match gender {
            Some(g) => g.parse()?,
            None => GenderSelector::Both,
        };
        let age_ranges = match ages {
            Some(list) => parse_age_ranges(list)?,
            None => AgeRange::ALL.iter().copied().collect(),
        };
        Ok(SelectorState { gender, age_ranges })
    }

    /// A record without an age range never matches.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .age_range
            .map_or(false, |range| self.age_ranges.contains(&range))
            && self.gender.matches(record.gender)
    }

    pub fn toggle_age_range(&mut self, range: AgeRange) {
        if !self.age_ranges.remove(&range) {
            self.age_ranges.insert(range);
        }
    }
}

pub fn parse_age_ranges(list: &str) -> Result<BTreeSet<AgeRange>> {
    list.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::parse::<AgeRange>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Season, Size, SubscriptionStatus};

    fn record(gender: Gender, age_range: Option<AgeRange>) -> Record {
        Record {
            age: 30,
            gender,
            age_range,
            subscription_status: SubscriptionStatus::No,
            color: "Red".to_string(),
            season: Season::Fall,
            size: Size::M,
        }
    }

    #[test]
    fn default_selects_everything() {
        let state = SelectorState::default();
        assert_eq!(state.gender, GenderSelector::Both);
        assert_eq!(state.age_ranges.len(), 6);
    }

    #[test]
    fn query_defaults_and_empty_selection() {
        assert_eq!(SelectorState::from_query(None, None).unwrap(), SelectorState::default());
        let empty = SelectorState::from_query(Some("Male"), Some("")).unwrap();
        assert_eq!(empty.gender, GenderSelector::Only(Gender::Male));
        assert!(empty.age_ranges.is_empty());
    }

    #[test]
    fn query_parses_comma_separated_ranges() {
        let state = SelectorState::from_query(Some("Both"), Some("38-47, 18-27")).unwrap();
        assert_eq!(
            state.age_ranges.into_iter().collect::<Vec<_>>(),
            vec![AgeRange::From18To27, AgeRange::From38To47]
        );
    }

    #[test]
    fn unknown_gender_and_range_are_input_errors() {
        let err = SelectorState::from_query(Some("Other"), None).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownGender(_)));
        assert!(err.is_input_error());
        let err = SelectorState::from_query(None, Some("18-27,99-100")).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownAgeRange(ref r) if r == "99-100"));
    }

    #[test]
    fn filter_requires_range_membership_and_gender() {
        let state = SelectorState::new(GenderSelector::Only(Gender::Male), [AgeRange::From28To37]);
        assert!(state.matches(&record(Gender::Male, Some(AgeRange::From28To37))));
        assert!(!state.matches(&record(Gender::Female, Some(AgeRange::From28To37))));
        assert!(!state.matches(&record(Gender::Male, Some(AgeRange::From18To27))));
        assert!(!state.matches(&record(Gender::Male, None)));
    }

    #[test]
    fn gender_cycles_through_radio_options() {
        let g = GenderSelector::Both;
        assert_eq!(g.next(), GenderSelector::Only(Gender::Male));
        assert_eq!(g.next().next().next(), GenderSelector::Both);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = SelectorState::default();
        state.toggle_age_range(AgeRange::From68To77);
        assert!(!state.age_ranges.contains(&AgeRange::From68To77));
        state.toggle_age_range(AgeRange::From68To77);
        assert!(state.age_ranges.contains(&AgeRange::From68To77));
    }
}
