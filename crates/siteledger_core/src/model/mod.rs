use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Gives a unit-only enum a lowercase label, `Display`, and a forgiving
/// `FromStr` that accepts "In Progress", "in_progress" and "in-progress".
macro_rules! labelled_enum {
    ($name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::AppError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let normalized = $crate::model::normalize_label(raw);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| {
                        let expected: Vec<&str> =
                            $name::ALL.iter().map(|value| value.as_str()).collect();
                        $crate::error::AppError::invalid_input(format!(
                            "unknown {} '{}' (expected one of: {})",
                            $kind,
                            raw.trim(),
                            expected.join(", ")
                        ))
                    })
            }
        }
    };
}

mod document;
mod money;
mod project;
mod task;
mod transaction;

pub use document::{DocumentCategory, ProjectDocument, size_label};
pub use money::Money;
pub use project::{Project, ProjectStatus};
pub use task::{DurationUnit, Task, TaskDuration, TaskStatus};
pub use transaction::{Direction, PaymentMethod, Transaction, TransactionStatus};

pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '_' => '-',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), format)
        .map_err(|_| AppError::invalid_input(format!("'{}' is not a YYYY-MM-DD date", raw.trim())))
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    date.format(format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub(crate) fn timestamp(now: OffsetDateTime) -> Result<String, AppError> {
    now.format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
