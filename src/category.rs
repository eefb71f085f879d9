//! Closed categorical columns of the survey.
//!
//! Each enum is declared in display order, so the derived `Ord` is the order
//! charts render the categories in.

use std::str::FromStr;

use crate::error::DashboardError;

/// Declares a unit enum whose variants (de)serialize as fixed labels.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.label() == label)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub(crate) use label_enum;

label_enum! {
    pub enum Gender {
        Male => "Male",
        Female => "Female",
    }
}

label_enum! {
    pub enum SubscriptionStatus {
        Yes => "Yes",
        No => "No",
    }
}

label_enum! {
    pub enum Season {
        Spring => "Spring",
        Summer => "Summer",
        Fall => "Fall",
        Winter => "Winter",
    }
}

label_enum! {
    pub enum Size {
        S => "S",
        M => "M",
        L => "L",
        XL => "XL",
    }
}

impl FromStr for Gender {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::from_label(s.trim())
            .ok_or_else(|| DashboardError::UnknownGender(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_order_follows_variant_order() {
        let mut seasons = vec![Season::Winter, Season::Spring, Season::Fall, Season::Summer];
        seasons.sort();
        assert_eq!(
            seasons.iter().map(|s| s.label()).collect::<Vec<_>>(),
            vec!["Spring", "Summer", "Fall", "Winter"]
        );
        assert!(Size::S < Size::XL);
        assert!(SubscriptionStatus::Yes < SubscriptionStatus::No);
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        for size in Size::ALL {
            assert_eq!(Size::from_label(size.label()), Some(*size));
        }
        assert_eq!(Size::from_label("XXL"), None);
    }

    #[test]
    fn gender_parse_rejects_unknown_values() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        let err = "Other".parse::<Gender>().unwrap_err();
        assert!(matches!(err, DashboardError::UnknownGender(ref g) if g == "Other"));
    }
}
