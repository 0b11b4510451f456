//! Student status flags and their context-dependent priorities.
//!
//! A flag is a categorical marker carried on every record. The closed set
//! of known values is `"0"`, `"西"` (West), `"1"` and `"2"`; anything else
//! is accepted verbatim as [`Flag::Other`] and sorts after every known
//! value.
//!
//! The ordinal meaning of a flag depends on what the ordering is for:
//!
//! | flag  | [`FlagContext::Ranking`] | [`FlagContext::Elective`] |
//! |-------|--------------------------|---------------------------|
//! | `0`   | 0                        | 0                         |
//! | `西`  | 1                        | 0                         |
//! | `1`   | 2                        | 1                         |
//! | `2`   | 3                        | 2                         |
//! | other | 4                        | 3                         |

use std::fmt;

/// Canonical text of the West flag.
pub const WEST: &str = "西";

/// A student status flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Flag {
    Zero,
    West,
    One,
    Two,
    /// Any value outside the known set, kept as written. Blank flags land here.
    Other(String),
}

/// The purpose an ordering serves, which decides how flags rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagContext {
    /// Core-subject composite sequencing: `0 < 西 < 1 < 2 < other`.
    Ranking,
    /// Elective sequencing: `0 = 西 < 1 < 2 < other`.
    Elective,
}

impl Flag {
    /// Parses flag text exactly as it appears on a record.
    pub fn parse(text: &str) -> Self {
        match text {
            "0" => Flag::Zero,
            WEST | "West" => Flag::West,
            "1" => Flag::One,
            "2" => Flag::Two,
            other => Flag::Other(other.to_string()),
        }
    }

    /// Returns the flag's text. West is always rendered as `"西"`.
    pub fn as_str(&self) -> &str {
        match self {
            Flag::Zero => "0",
            Flag::West => WEST,
            Flag::One => "1",
            Flag::Two => "2",
            Flag::Other(text) => text,
        }
    }

    /// Returns `true` for values outside the known set, including blanks.
    pub fn is_other(&self) -> bool {
        matches!(self, Flag::Other(_))
    }

    /// Ordinal priority of this flag in the given context. Lower sorts first.
    pub fn priority(&self, context: FlagContext) -> u8 {
        match context {
            FlagContext::Ranking => match self {
                Flag::Zero => 0,
                Flag::West => 1,
                Flag::One => 2,
                Flag::Two => 3,
                Flag::Other(_) => 4,
            },
            FlagContext::Elective => match self {
                Flag::Zero | Flag::West => 0,
                Flag::One => 1,
                Flag::Two => 2,
                Flag::Other(_) => 3,
            },
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Other(String::new())
    }
}

impl From<&str> for Flag {
    fn from(text: &str) -> Self {
        Flag::parse(text)
    }
}

impl From<String> for Flag {
    fn from(text: String) -> Self {
        Flag::parse(&text)
    }
}

impl From<Flag> for String {
    fn from(flag: Flag) -> Self {
        flag.as_str().to_string()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
