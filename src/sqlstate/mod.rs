pub mod conditions;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use conditions::CONDITIONS;

pub const SUCCESSFUL_COMPLETION: &str = "00000";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
pub const UNIQUE_VIOLATION: &str = "23505";
pub const INSUFFICIENT_PRIVILEGE: &str = "42501";
pub const UNDEFINED_FUNCTION: &str = "42883";
pub const UNDEFINED_TABLE: &str = "42P01";
pub const RAISE_EXCEPTION: &str = "P0001";

/// Condition name for an exact SQLSTATE code, e.g. `"unique_violation"` for `"23505"`.
///
/// `None` means the code is not in the table, which is not an error.
pub fn condition_name(code: &str) -> Option<&'static str> {
    CONDITIONS
        .binary_search_by(|(known, _)| known.as_bytes().cmp(code.as_bytes()))
        .ok()
        .and_then(|idx| CONDITIONS.get(idx))
        .map(|(_, name)| *name)
}

/// A validated five-character SQLSTATE: two-character class plus three-character subclass.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SqlState([u8; 5]);

impl SqlState {
    pub fn new(code: &str) -> Result<Self, Error> {
        let bytes: [u8; 5] = code.as_bytes().try_into().map_err(|_| Error::SqlState {
            reason: format!("expected 5 characters, got {code:?}"),
        })?;
        if let Some(bad) = bytes
            .iter()
            .find(|b| !(b.is_ascii_digit() || b.is_ascii_uppercase()))
        {
            return Err(Error::SqlState {
                reason: format!("unexpected byte {bad:#04x} in {code:?}"),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits and uppercase letters get past `new`.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn class(&self) -> &str {
        self.as_str().get(..2).unwrap_or_default()
    }

    pub fn subclass(&self) -> &str {
        self.as_str().get(2..).unwrap_or_default()
    }

    /// `true` for the generic member of a class, e.g. `08000`.
    pub fn is_class_code(&self) -> bool {
        self.subclass() == "000"
    }

    pub fn condition_name(&self) -> Option<&'static str> {
        condition_name(self.as_str())
    }
}

impl FromStr for SqlState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlState({})", self.as_str())
    }
}

impl AsRef<str> for SqlState {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl serde::Serialize for SqlState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for SqlState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
