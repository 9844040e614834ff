use crate::idl::Error;

/// Trait providing description of a interface method reply error type.
pub trait ReplyError {
    /// The list of possible errors variants.
    const VARIANTS: &'static [&'static Error<'static>];
}
