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
/// use varlink_core::introspect::CustomType;
/// use varlink_core::idl::{self, Field, CustomObject};
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl CustomType for Point {
///     const CUSTOM_TYPE: &'static idl::CustomType<'static> = &{
///         static FIELD_X: Field<'static> = Field::new("x", &varlink_core::idl::Type::Float);
///         static FIELD_Y: Field<'static> = Field::new("y", &varlink_core::idl::Type::Float);
///         static FIELDS: &[&Field<'static>] = &[&FIELD_X, &FIELD_Y];
///
///         idl::CustomType::Object(CustomObject::new("Point", FIELDS))
///     };
/// }
/// ```
pub trait CustomType {
    /// The custom type information including the type name.
    const CUSTOM_TYPE: &'static crate::idl::CustomType<'static>;
}
