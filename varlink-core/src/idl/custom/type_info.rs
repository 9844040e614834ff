//! Custom type introspection trait.

use super::Type;

/// Custom type introspection.
///
/// This trait is similar to [`crate::idl::TypeInfo`] but provides custom type definitions
/// that include the type name and are suitable for IDL generation. While [`crate::idl::TypeInfo`]
/// returns inline type information, this trait returns named custom type definitions.
///
/// # Examples
///
/// ```rust
/// use varlink_core::idl::custom::{TypeInfo, Type, Object, Enum};
/// use varlink_core::idl::Field;
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl TypeInfo for Point {
///     const TYPE_INFO: &'static Type<'static> = &{
///         static FIELD_X: Field<'static> = Field::new("x", &varlink_core::idl::Type::Float);
///         static FIELD_Y: Field<'static> = Field::new("y", &varlink_core::idl::Type::Float);
///         static FIELDS: &[&Field<'static>] = &[&FIELD_X, &FIELD_Y];
///
///         Type::Object(Object::new("Point", FIELDS))
///     };
/// }
/// ```
pub trait TypeInfo {
    /// The custom type information including the type name.
    const TYPE_INFO: &'static Type<'static>;
}
