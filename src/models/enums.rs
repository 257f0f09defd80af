use std::fmt;

use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The stored string doubles as the JSON wire name.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
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

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(RequestStatus {
    Initiated => "INITIATED",
    LabTestInProgress => "LAB_TEST_IN_PROGRESS",
    LabTestCompleted => "LAB_TEST_COMPLETED",
    DiagnosisInProcess => "DIAGNOSIS_IN_PROCESS",
    Completed => "COMPLETED",
});

str_enum!(TestStatus {
    Positive => "POSITIVE",
    Negative => "NEGATIVE",
});

str_enum!(DoctorSuggestion {
    NoIssues => "NO_ISSUES",
    HomeQuarantine => "HOME_QUARANTINE",
    Admit => "ADMIT",
});

str_enum!(Gender {
    Male => "MALE",
    Female => "FEMALE",
    Other => "OTHER",
});
