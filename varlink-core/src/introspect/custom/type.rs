//! Custom type introspection trait.

use crate::idl::custom::{self as custom};

/// Custom type introspection.
///
/// This trait is similar to [`crate::introspect::Type`] but provides custom type definitions
/// that include the type name and are suitable for IDL generation. While
/// [`crate::introspect::Type`] returns inline type information, this trait returns named custom
/// type definitions.
///
/// # Examples
///
/// ```rust
/// use varlink_core::introspect::custom::Type;
/// use varlink_core::idl::{self, Field, custom::{self as custom, Object}};
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl Type for Point {
///     const TYPE: &'static custom::Type<'static> = &{
///         static FIELD_X: Field<'static> = Field::new("x", &varlink_core::idl::Type::Float);
///         static FIELD_Y: Field<'static> = Field::new("y", &varlink_core::idl::Type::Float);
///         static FIELDS: &[&Field<'static>] = &[&FIELD_X, &FIELD_Y];
///
///         custom::Type::Object(Object::new("Point", FIELDS))
///     };
/// }
/// ```
pub trait Type {
    /// The custom type information including the type name.
    const TYPE: &'static custom::Type<'static>;
}
