#[cfg(feature = "std")]
use serde::Deserialize;
use serde::Serialize;

use crate::introspect;

/// Errors that can be returned by the `org.varlink.service` interface.
#[derive(Debug, Clone, PartialEq, Serialize, introspect::ReplyError)]
#[varlink(crate = "crate")]
#[cfg_attr(feature = "std", derive(Deserialize))]
#[serde(tag = "error", content = "parameters")]
pub enum Error<'a> {
    /// The requested interface was not found.
    #[serde(rename = "org.varlink.service.InterfaceNotFound")]
    InterfaceNotFound {
        /// The interface that was not found.
        interface: &'a str,
    },
    /// The requested method was not found.
    #[serde(rename = "org.varlink.service.MethodNotFound")]
    MethodNotFound {
        /// The method that was not found.
        method: &'a str,
    },
    /// The interface defines the requested method, but the service does not implement it.
    #[serde(rename = "org.varlink.service.MethodNotImplemented")]
    MethodNotImplemented {
        /// The method that is not implemented.
        method: &'a str,
    },
    /// One of the passed parameters is invalid.
    #[serde(rename = "org.varlink.service.InvalidParameter")]
    InvalidParameter {
        /// The parameter that is invalid.
        parameter: &'a str,
    },
    /// Client is denied access.
    #[serde(rename = "org.varlink.service.PermissionDenied")]
    PermissionDenied,
    /// Method is expected to be called with 'more' set to true, but wasn't.
    #[serde(rename = "org.varlink.service.ExpectedMore")]
    ExpectedMore,
}

/// Result type for Varlink service methods.
pub type Result<'a, T> = core::result::Result<T, Error<'a>>;

/// Method calls of the `org.varlink.service` interface.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "std", derive(Deserialize))]
#[serde(tag = "method", content = "parameters")]
pub enum Method<'a> {
    /// Get basic information about the Varlink service.
    #[serde(rename = "org.varlink.service.GetInfo")]
    GetInfo,
    /// Get the description of an interface.
    #[serde(rename = "org.varlink.service.GetInterfaceDescription")]
    GetInterfaceDescription {
        /// The interface to describe.
        interface: &'a str,
    },
}
