//! Member definitions for Varlink interfaces.

use core::fmt;

use serde::Serialize;

#[cfg(feature = "idl-parse")]
use serde::Deserialize;

use super::{CustomType, Error, Method};

/// A member of a Varlink interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member<'a> {
    /// A custom type definition.
    Custom(CustomType<'a>),
    /// A method definition.
    Method(Method<'a>),
    /// An error definition.
    Error(Error<'a>),
}

impl<'a> Member<'a> {
    /// Returns the name of this member.
    pub fn name(&self) -> &'a str {
        match self {
            Member::Custom(custom) => custom.name(),
            Member::Method(method) => method.name(),
            Member::Error(error) => error.name(),
        }
    }
}

impl<'a> fmt::Display for Member<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Custom(custom) => write!(f, "{}", custom),
            Member::Method(method) => write!(f, "{}", method),
            Member::Error(error) => write!(f, "{}", error),
        }
    }
}

impl<'a> Serialize for Member<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "idl-parse")]
impl<'de, 'a> Deserialize<'de> for Member<'a>
where
    'de: 'a,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        super::parse::parse_member(s).map_err(serde::de::Error::custom)
    }
}
