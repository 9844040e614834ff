//! Interface definitions for Varlink IDL.

use core::fmt;

#[cfg(feature = "idl-parse")]
use crate::Error;

use super::List;

/// A Varlink interface definition.
#[derive(Debug, Clone, Eq)]
pub struct Interface<'a> {
    /// The name of the interface in reverse-domain notation.
    name: &'a str,
    /// The methods of the interface.
    methods: List<'a, super::Method<'a>>,
    /// The custom types of the interface.
    custom_types: List<'a, super::CustomType<'a>>,
    /// The errors of the interface.
    errors: List<'a, super::Error<'a>>,
    /// The comments associated with this interface.
    comments: List<'a, super::Comment<'a>>,
}

impl<'a> Interface<'a> {
    /// Creates a new interface with the given name, borrowed collections, and comments.
    pub const fn new(
        name: &'a str,
        methods: &'a [&'a super::Method<'a>],
        custom_types: &'a [&'a super::CustomType<'a>],
        errors: &'a [&'a super::Error<'a>],
        comments: &'a [&'a super::Comment<'a>],
    ) -> Self {
        Self {
            name,
            methods: List::Borrowed(methods),
            custom_types: List::Borrowed(custom_types),
            errors: List::Borrowed(errors),
            comments: List::Borrowed(comments),
        }
    }

    /// Creates a new interface with the given name, owned collections, and comments.
    #[cfg(feature = "std")]
    pub fn new_owned(
        name: &'a str,
        methods: Vec<super::Method<'a>>,
        custom_types: Vec<super::CustomType<'a>>,
        errors: Vec<super::Error<'a>>,
        comments: Vec<super::Comment<'a>>,
    ) -> Self {
        Self {
            name,
            methods: List::Owned(methods),
            custom_types: List::Owned(custom_types),
            errors: List::Owned(errors),
            comments: List::from(comments),
        }
    }

    /// Returns the name of the interface.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns an iterator over the methods of the interface.
    pub fn methods(&self) -> impl Iterator<Item = &super::Method<'a>> {
        self.methods.iter()
    }

    /// Returns an iterator over the custom types of the interface.
    pub fn custom_types(&self) -> impl Iterator<Item = &super::CustomType<'a>> {
        self.custom_types.iter()
    }

    /// Returns an iterator over the errors of the interface.
    pub fn errors(&self) -> impl Iterator<Item = &super::Error<'a>> {
        self.errors.iter()
    }

    /// Returns an iterator over the comments associated with this interface.
    pub fn comments(&self) -> impl Iterator<Item = &super::Comment<'a>> {
        self.comments.iter()
    }

    /// Returns true if the interface has no members.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.custom_types.is_empty() && self.errors.is_empty()
    }
}

impl<'a> fmt::Display for Interface<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.name)?;
        for custom_type in self.custom_types.iter() {
            write!(f, "\n\n{custom_type}")?;
        }
        for method in self.methods.iter() {
            write!(f, "\n\n{method}")?;
        }
        for error in self.errors.iter() {
            write!(f, "\n\n{error}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "idl-parse")]
impl<'a> TryFrom<&'a str> for Interface<'a> {
    type Error = Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        super::parse::parse_interface(value)
    }
}

impl PartialEq for Interface<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.custom_types == other.custom_types
            && self.methods == other.methods
            && self.errors == other.errors
    }
}
