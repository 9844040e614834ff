//! Type definitions for Varlink IDL.

mod type_ref;
pub use type_ref::TypeRef;

use core::fmt;

use super::{EnumVariant, Field, List};

/// Represents a type in Varlink IDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type<'a> {
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// UTF-8 string.
    String,
    /// Foreign untyped object.
    ForeignObject,
    /// Optional/nullable type.
    Optional(TypeRef<'a>),
    /// Array type.
    Array(TypeRef<'a>),
    /// Map type with string keys.
    Map(TypeRef<'a>),
    /// Custom named type reference.
    Custom(&'a str),
    /// Inline enum type.
    Enum(List<'a, EnumVariant<'a>>),
    /// Inline struct type.
    Object(List<'a, Field<'a>>),
}

impl<'a> Type<'a> {
    /// The child type if this type is optional.
    pub const fn as_optional(&self) -> Option<&TypeRef<'a>> {
        match self {
            Type::Optional(optional) => Some(optional),
            _ => None,
        }
    }

    /// The array element type if this type is an array.
    pub const fn as_array(&self) -> Option<&TypeRef<'a>> {
        match self {
            Type::Array(array) => Some(array),
            _ => None,
        }
    }

    /// The map value type if this type is a map.
    pub const fn as_map(&self) -> Option<&TypeRef<'a>> {
        match self {
            Type::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The custom type name if this type is a custom type.
    pub const fn as_custom(&self) -> Option<&'a str> {
        match self {
            Type::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    /// The enum variants if this type is an enum.
    pub const fn as_enum(&self) -> Option<&List<'a, EnumVariant<'a>>> {
        match self {
            Type::Enum(variants) => Some(variants),
            _ => None,
        }
    }

    /// The object fields if this type is an object.
    pub const fn as_object(&self) -> Option<&List<'a, Field<'a>>> {
        match self {
            Type::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl<'a> fmt::Display for Type<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::ForeignObject => write!(f, "object"),
            Type::Optional(optional) => write!(f, "?{optional}"),
            Type::Array(array) => write!(f, "[]{array}"),
            Type::Map(map) => write!(f, "[string]{map}"),
            Type::Custom(name) => write!(f, "{name}"),
            Type::Enum(variants) => {
                // Check if any variant has comments to determine formatting
                let has_variant_comments = variants.iter().any(|v| v.has_comments());

                if has_variant_comments {
                    // Multi-line format when any variant has comments
                    writeln!(f, "(")?;
                    for variant in variants.iter() {
                        // Write comments first
                        for comment in variant.comments() {
                            writeln!(f, "\t{}", comment)?;
                        }
                        // Then write the variant name
                        writeln!(f, "\t{}", variant.name())?;
                    }
                    write!(f, ")")
                } else {
                    // Single-line format when no variants have comments
                    write!(f, "(")?;
                    let mut first = true;
                    for variant in variants.iter() {
                        if !first {
                            write!(f, ", ")?;
                        }
                        first = false;
                        write!(f, "{}", variant)?;
                    }
                    write!(f, ")")
                }
            }
            Type::Object(fields) => {
                write!(f, "(")?;
                let mut first = true;
                for field in fields.iter() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<'a> PartialEq<TypeRef<'a>> for Type<'a> {
    fn eq(&self, other: &TypeRef<'a>) -> bool {
        self == other.inner()
    }
}
