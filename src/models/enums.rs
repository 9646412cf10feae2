use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Interpretation {
    Normal => "Normal",
    High => "High",
    Low => "Low",
});

str_enum!(MedicationStatus {
    Active => "Active",
    Discontinued => "Discontinued",
});

str_enum!(AppointmentStatus {
    Scheduled => "Scheduled",
    Completed => "Completed",
});

impl Interpretation {
    /// Derive the interpretation from a value and its reference range.
    ///
    /// For writers that regenerate the flag. Readers trust the stored value.
    pub fn from_range(value: f64, low: Option<f64>, high: Option<f64>) -> Self {
        match (low, high) {
            (Some(low), _) if value < low => Self::Low,
            (_, Some(high)) if value > high => Self::High,
            _ => Self::Normal,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn interpretation_round_trip() {
        for (variant, s) in [
            (Interpretation::Normal, "Normal"),
            (Interpretation::High, "High"),
            (Interpretation::Low, "Low"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Interpretation::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn medication_status_round_trip() {
        for (variant, s) in [
            (MedicationStatus::Active, "Active"),
            (MedicationStatus::Discontinued, "Discontinued"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MedicationStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Interpretation::from_str("normal").is_err());
        assert!(MedicationStatus::from_str("stopped").is_err());
        assert!(AppointmentStatus::from_str("").is_err());
    }

    #[test]
    fn interpretation_from_range_respects_bounds() {
        assert_eq!(
            Interpretation::from_range(100.0, Some(70.0), Some(99.0)),
            Interpretation::High
        );
        assert_eq!(
            Interpretation::from_range(65.0, Some(70.0), Some(99.0)),
            Interpretation::Low
        );
        // Bounds are inclusive
        assert_eq!(
            Interpretation::from_range(99.0, Some(70.0), Some(99.0)),
            Interpretation::Normal
        );
        assert_eq!(Interpretation::from_range(5.0, None, None), Interpretation::Normal);
    }

    #[test]
    fn display_matches_stored_text() {
        assert_eq!(Interpretation::High.to_string(), "High");
        assert_eq!(AppointmentStatus::Completed.to_string(), "Completed");
    }
}
