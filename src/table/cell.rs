//! Cell Values
//!
//! Typed cell representation and the ordered key projection used for
//! duplicate detection and identifier set arithmetic.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Column type tag, fixed once at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

/// A single value in a dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Textual form used by format rules. `None` for nulls.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Number(value) => Some(Cow::Owned(value.to_string())),
            Cell::Text(text) => Some(Cow::Borrowed(text.as_str())),
        }
    }

    /// Value equality where null never matches anything, itself included
    pub fn agrees_with(&self, other: &Cell) -> bool {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a == b,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }

    pub fn key(&self) -> Key {
        match self {
            Cell::Null => Key::Null,
            Cell::Number(value) => Key::Number(*value),
            Cell::Text(text) => Key::Text(text.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("null"),
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

/// Hashable, totally ordered projection of a cell.
///
/// Null sorts first, then numbers by value, then text lexicographically.
/// Unlike [`Cell::agrees_with`], `Null == Null` here, so that repeated
/// empty rows and repeated missing identifiers are counted as duplicates.
#[derive(Debug, Clone)]
pub enum Key {
    Null,
    Number(f64),
    Text(String),
}

impl Key {
    fn rank(&self) -> u8 {
        match self {
            Key::Null => 0,
            Key::Number(_) => 1,
            Key::Text(_) => 2,
        }
    }
}

// -0.0 and 0.0 compare equal as values, so they must hash alike too
fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Number(a), Key::Number(b)) => {
                if a == b {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Key::Null => {}
            Key::Number(value) => normalized_bits(*value).hash(state),
            Key::Text(text) => text.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str("null"),
            Key::Number(value) => write!(f, "{}", value),
            Key::Text(text) => f.write_str(text),
        }
    }
}

/// Render keys as a bracketed, comma separated list
pub fn format_keys<'a>(keys: impl IntoIterator<Item = &'a Key>) -> String {
    let parts: Vec<String> = keys.into_iter().map(|k| k.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
