use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque server-assigned identifier.
///
/// The backend issues attachment and event ids either as JSON strings or as
/// integers. The client never interprets them; it only echoes them back in
/// request bodies and query strings, so the original shape is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl std::str::FromStr for Identifier {
    type Err = std::convert::Infallible;

    /// Parses canonical decimal integers as [`Identifier::Int`] and anything
    /// else as [`Identifier::Str`].
    ///
    /// Text that would render differently as an integer (`007`, `+5`, `-0`)
    /// stays a string, so the identifier is echoed back exactly as given.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Int(n),
            _ => Self::Str(s.to_owned()),
        })
    }
}
