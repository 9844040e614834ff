use super::{Type, TypeRef};

/// Type introspection.
pub trait TypeInfo {
    /// The type information.
    const TYPE_INFO: &'static Type<'static>;
}

/// Macro to implement TypeInfo for multiple types with the same Type variant.
macro_rules! impl_type_info {
    ($($ty:ty),* => $variant:expr) => {
        $(
            impl TypeInfo for $ty {
                const TYPE_INFO: &'static Type<'static> = &$variant;
            }
        )*
    };
}

// Implementations for primitive types.
impl_type_info!(bool => Type::Bool);
impl_type_info!(i8, i16, i32, i64, u8, u16, u32, u64 => Type::Int);
impl_type_info!(f32, f64 => Type::Float);
impl_type_info!(&str => Type::String);

#[cfg(feature = "std")]
impl_type_info!(String => Type::String);

// Optional types.
impl<T: TypeInfo> TypeInfo for Option<T> {
    const TYPE_INFO: &'static Type<'static> = &Type::Optional(TypeRef::new(T::TYPE_INFO));
}

// Array types.
#[cfg(feature = "std")]
impl<T: TypeInfo> TypeInfo for Vec<T> {
    const TYPE_INFO: &'static Type<'static> = &Type::Array(TypeRef::new(T::TYPE_INFO));
}

impl<T: TypeInfo> TypeInfo for &[T] {
    const TYPE_INFO: &'static Type<'static> = &Type::Array(TypeRef::new(T::TYPE_INFO));
}

// For raw objects.
#[cfg(feature = "std")]
impl TypeInfo for serde_json::Value {
    const TYPE_INFO: &'static Type<'static> = &Type::Object;
}
