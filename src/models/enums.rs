use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef};

/// Raised when a status, priority, type or role name is outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid {} value '{}'", self.kind, self.value)
    }
}

impl std::error::Error for InvalidEnumValue {}

/// Declares a closed enumeration stored as TEXT and exchanged as its
/// SCREAMING_SNAKE_CASE name. Parsing never falls back to a default.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(into = "&'static str", try_from = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(InvalidEnumValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidEnumValue;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <String as PgHasArrayType>::array_type_info()
            }

            fn array_compatible(ty: &PgTypeInfo) -> bool {
                <String as PgHasArrayType>::array_compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let text = <&'r str as sqlx::Decode<'r, Postgres>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }

        impl sqlx::Encode<'_, Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, BoxDynError> {
                <&str as sqlx::Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    ProjectStatus {
        #[default]
        Planning => "PLANNING",
        InProgress => "IN_PROGRESS",
        OnHold => "ON_HOLD",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

text_enum! {
    TaskStatus {
        #[default]
        NotStarted => "NOT_STARTED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Delayed => "DELAYED",
        Cancelled => "CANCELLED",
    }
}

text_enum! {
    TaskPriority {
        Low => "LOW",
        #[default]
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

text_enum! {
    IssueStatus {
        #[default]
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
}

text_enum! {
    IssuePriority {
        Low => "LOW",
        #[default]
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

text_enum! {
    IssueType {
        Safety => "SAFETY",
        Quality => "QUALITY",
        Design => "DESIGN",
        Schedule => "SCHEDULE",
        Budget => "BUDGET",
        Environmental => "ENVIRONMENTAL",
        #[default]
        Other => "OTHER",
    }
}

text_enum! {
    ResourceType {
        #[default]
        Material => "MATERIAL",
        Equipment => "EQUIPMENT",
        Labor => "LABOR",
        Tool => "TOOL",
        Vehicle => "VEHICLE",
    }
}

text_enum! {
    ResourceStatus {
        #[default]
        Available => "AVAILABLE",
        InUse => "IN_USE",
        Maintenance => "MAINTENANCE",
        OutOfService => "OUT_OF_SERVICE",
        Reserved => "RESERVED",
        Depleted => "DEPLETED",
    }
}

text_enum! {
    /// Role names as stored in the `roles` table and carried in access tokens.
    ERole {
        #[default]
        User => "ROLE_USER",
        ProjectManager => "ROLE_PROJECT_MANAGER",
        Admin => "ROLE_ADMIN",
    }
}

impl ERole {
    /// Accepts either the stored name (`ROLE_ADMIN`) or the bare role
    /// (`admin`), in any letter case.
    pub fn from_name(name: &str) -> Result<Self, InvalidEnumValue> {
        let upper = name.trim().to_ascii_uppercase();
        let stored = if upper.starts_with("ROLE_") {
            upper
        } else {
            format!("ROLE_{upper}")
        };
        stored.parse().map_err(|_| InvalidEnumValue {
            kind: "ERole",
            value: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("ON_HOLD".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
        assert_eq!(
            "OUT_OF_SERVICE".parse::<ResourceStatus>(),
            Ok(ResourceStatus::OutOfService)
        );
    }

    #[test]
    fn rejects_unknown_and_miscased_values() {
        let err = "on_hold".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.kind, "ProjectStatus");
        assert_eq!(err.value, "on_hold");
        assert!("BROKEN".parse::<ResourceStatus>().is_err());
    }

    #[test]
    fn json_round_trips_through_wire_names() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"NOT_STARTED\"");
        let err = serde_json::from_str::<TaskStatus>("\"FINISHED\"").unwrap_err();
        assert!(err.to_string().contains("Invalid TaskStatus value 'FINISHED'"));
    }

    #[test]
    fn role_names_accept_bare_form() {
        assert_eq!(ERole::from_name("ADMIN"), Ok(ERole::Admin));
        assert_eq!(ERole::from_name("ROLE_PROJECT_MANAGER"), Ok(ERole::ProjectManager));
        assert_eq!(ERole::from_name("project_manager"), Ok(ERole::ProjectManager));
        assert_eq!(ERole::from_name(" role_admin "), Ok(ERole::Admin));
        let err = ERole::from_name("Engineer").unwrap_err();
        assert_eq!(err.kind, "ERole");
        assert_eq!(err.value, "Engineer");
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(ResourceStatus::ALL.len(), 6);
        assert_eq!(ERole::ALL.len(), 3);
    }
}
