use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

///
/// JoinError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum JoinError {
    #[error("list values are empty")]
    Empty,

    #[error("unsupported list element {0}")]
    Unsupported(String),

    #[error("list elements mix {first} and {second} values")]
    Mixed {
        first: &'static str,
        second: &'static str,
    },
}

///
/// ListValues
///
/// Closed set of element kinds accepted in an `IN (...)` list.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ListValues {
    Text(Vec<String>),
    Signed(Vec<i64>),
    Unsigned(Vec<u64>),
}

impl ListValues {
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Signed(values) => values.len(),
            Self::Unsigned(values) => values.len(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<String>> for ListValues {
    fn from(values: Vec<String>) -> Self {
        Self::Text(values)
    }
}

impl From<Vec<&str>> for ListValues {
    fn from(values: Vec<&str>) -> Self {
        Self::Text(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i32>> for ListValues {
    fn from(values: Vec<i32>) -> Self {
        Self::Signed(values.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<i64>> for ListValues {
    fn from(values: Vec<i64>) -> Self {
        Self::Signed(values)
    }
}

impl From<Vec<u32>> for ListValues {
    fn from(values: Vec<u32>) -> Self {
        Self::Unsigned(values.into_iter().map(u64::from).collect())
    }
}

impl From<Vec<u64>> for ListValues {
    fn from(values: Vec<u64>) -> Self {
        Self::Unsigned(values)
    }
}

impl TryFrom<&JsonValue> for ListValues {
    type Error = JoinError;

    // Negative numbers select the signed family; a list of non-negative
    // integers stays signed unless some element exceeds i64::MAX.
    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        let items = match value {
            JsonValue::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };

        let Some(first) = items.first() else {
            return Err(JoinError::Empty);
        };

        match first {
            JsonValue::String(_) => items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => Ok(s.clone()),
                    other => Err(mixed("text", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Text),
            JsonValue::Number(_) => {
                if let Some(text) = items.iter().find(|item| item.is_string()) {
                    return Err(mixed("numeric", text));
                }

                let signed = items
                    .iter()
                    .map(|item| item.as_i64().ok_or(item))
                    .collect::<Result<Vec<_>, _>>();
                match signed {
                    Ok(values) => Ok(Self::Signed(values)),
                    Err(_) => items
                        .iter()
                        .map(|item| item.as_u64().ok_or_else(|| unsupported(item)))
                        .collect::<Result<Vec<_>, _>>()
                        .map(Self::Unsigned),
                }
            }
            other => Err(unsupported(other)),
        }
    }
}

fn unsupported(value: &JsonValue) -> JoinError {
    JoinError::Unsupported(value.to_string())
}

fn mixed(first: &'static str, value: &JsonValue) -> JoinError {
    let second = match value {
        JsonValue::Number(_) => "numeric",
        JsonValue::String(_) => "text",
        other => return unsupported(other),
    };

    JoinError::Mixed { first, second }
}

/// Render list values as a comma separated SQL list body.
///
/// Text values are single-quoted with embedded quotes doubled.
pub fn join_values(values: &ListValues) -> Result<String, JoinError> {
    if values.is_empty() {
        return Err(JoinError::Empty);
    }

    let parts: Vec<String> = match values {
        ListValues::Text(items) => items
            .iter()
            .map(|item| format!("'{}'", item.replace('\'', "''")))
            .collect(),
        ListValues::Signed(items) => items.iter().map(ToString::to_string).collect(),
        ListValues::Unsigned(items) => items.iter().map(ToString::to_string).collect(),
    };

    Ok(parts.join(","))
}

/// Parse an information-schema nullability sentinel.
///
/// The comparison is case-insensitive: `YES`, `yes` and `Yes` all mean nullable.
#[must_use]
pub fn parse_nullable(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}
