//! Types for the `org.varlink.resolver` interface.
//!
//! A resolver maps an interface name to the address of a service implementing it. Clients given
//! a bare interface name (rather than a full address) consult a resolver, by convention reachable
//! at `unix:/run/org.varlink.resolver`, before connecting to the actual service.

#[cfg(feature = "std")]
use serde::Deserialize;
use serde::Serialize;

use crate::introspect;

/// Method calls of the `org.varlink.resolver` interface.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "std", derive(Deserialize))]
#[serde(tag = "method", content = "parameters")]
pub enum Method<'a> {
    /// Resolve an interface name to the address of a service implementing it.
    #[serde(rename = "org.varlink.resolver.Resolve")]
    Resolve {
        /// The interface to resolve.
        interface: &'a str,
    },
}

/// Reply of `org.varlink.resolver.Resolve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "std", derive(Deserialize))]
#[cfg_attr(feature = "introspection", derive(introspect::Type))]
#[cfg_attr(feature = "introspection", varlink(crate = "crate"))]
pub struct Resolved<'a> {
    /// The address of the service implementing the interface.
    pub address: &'a str,
}

/// Errors that can be returned by the `org.varlink.resolver` interface.
#[derive(Debug, Clone, PartialEq, Serialize, introspect::ReplyError)]
#[varlink(crate = "crate")]
#[cfg_attr(feature = "std", derive(Deserialize))]
#[serde(tag = "error", content = "parameters")]
pub enum Error<'a> {
    /// No service is registered for the requested interface.
    #[serde(rename = "org.varlink.resolver.InterfaceNotFound")]
    InterfaceNotFound {
        /// The interface that was not found.
        interface: &'a str,
    },
}

/// Result type for `org.varlink.resolver` methods.
pub type Result<'a, T> = core::result::Result<T, Error<'a>>;

/// The description of the `org.varlink.resolver` interface.
#[cfg(feature = "introspection")]
pub const DESCRIPTION: &crate::idl::Interface<'static> = &{
    use crate::{
        idl::{Comment, Interface, Method, Parameter},
        introspect::{ReplyError, Type},
    };

    const INTERFACE_PARAM: &Parameter<'static> = &Parameter::new("interface", <&str>::TYPE, &[]);
    const METHODS: &[&Method<'static>] = &[&Method::new(
        "Resolve",
        &[INTERFACE_PARAM],
        Resolved::TYPE.as_object().unwrap().as_borrowed().unwrap(),
        &[&Comment::new(
            "Resolve an interface name to the address of a service implementing it",
        )],
    )];

    Interface::new(
        "org.varlink.resolver",
        METHODS,
        &[],
        Error::VARIANTS,
        &[&Comment::new(
            "Resolves an interface name to the varlink address that implements it",
        )],
    )
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_serialization() {
        let err = Error::InterfaceNotFound {
            interface: "com.example.missing",
        };

        #[cfg(feature = "std")]
        let json = serde_json::to_string(&err).unwrap();
        #[cfg(feature = "embedded")]
        let json = {
            use mayheap::string::String;
            let mut buffer = [0u8; 256];
            let len = serde_json_core::to_slice(&err, &mut buffer).unwrap();
            let vec = mayheap::Vec::<_, 256>::from_slice(&buffer[..len]).unwrap();
            String::<256>::from_utf8(vec).unwrap()
        };

        assert!(json.contains("org.varlink.resolver.InterfaceNotFound"));
        assert!(json.contains("com.example.missing"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn resolve_method_serialization() {
        let method = Method::Resolve {
            interface: "org.example.ftl",
        };

        let json = serde_json::to_string(&method).unwrap();
        assert!(json.contains("org.varlink.resolver.Resolve"));
        assert!(json.contains("org.example.ftl"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn resolved_round_trip() {
        let original = Resolved {
            address: "unix:/run/org.example.ftl",
        };

        let json = serde_json::to_string(&original).unwrap();
        let deserialized: Resolved<'_> = serde_json::from_str(&json).unwrap();

        assert_eq!(original, deserialized);
    }
}
