use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    };
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
    Unknown => "unknown",
});

impl Default for Gender {
    fn default() -> Self {
        Self::Unknown
    }
}

str_enum!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

str_enum!(HistoryStatus {
    Active => "active",
    Resolved => "resolved",
    Chronic => "chronic",
});

impl Default for HistoryStatus {
    fn default() -> Self {
        Self::Active
    }
}
