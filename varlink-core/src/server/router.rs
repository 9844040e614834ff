//! Dispatch across more than one interface in a single [`crate::Server`].
//!
//! [`Service`](super::service::Service) is generic over a single, statically-known method enum.
//! A service that implements several interfaces at once (the usual case: some user interface
//! plus the built-in `org.varlink.service` and, often, `org.varlink.resolver`) instead registers
//! one [`Interface`] per varlink interface with a [`Router`], which deserializes calls generically
//! and dispatches each by its `interface.Method` name.
use alloc::{boxed::Box, string::String, vec::Vec};
use core::{future::Future, pin::Pin};

use futures_util::stream::BoxStream;
use serde::Deserialize;
use serde_json::Value;

use super::service::{MethodReply, Service};
use crate::{varlink_service, Call};

/// A method call captured generically, so a [`Router`] can dispatch it without knowing every
/// interface's method enum at compile time.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCall {
    method: String,
    #[serde(default)]
    parameters: Value,
}

impl RawCall {
    /// The full `interface.Method` name of the call.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The call's parameters, or `Value::Null` if it had none.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Split `interface.Method` into the interface name and the bare method name.
    ///
    /// Returns `None` if `method` has no `.`, which is not a valid varlink method name.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.method.rsplit_once('.')
    }
}

/// A reply to a call dispatched through a [`Router`].
pub type RouterReply = MethodReply<Value, BoxStream<'static, crate::Reply<Value>>, Value>;

/// A future returned by [`Interface::call`], boxed for object safety.
pub type CallFuture<'a> = Pin<Box<dyn Future<Output = RouterReply> + Send + 'a>>;

/// A handler for every method of a single varlink interface.
pub trait Interface: core::fmt::Debug + Send {
    /// The interface's fully-qualified name, e.g. `org.example.ftl`.
    fn name(&self) -> &str;

    /// The interface's IDL description, as returned by `org.varlink.service.GetInterfaceDescription`.
    fn description(&self) -> String;

    /// Handle one call addressed to this interface.
    ///
    /// `method` is the bare method name with the `interface.` prefix already stripped. `more`
    /// mirrors the call's `more` flag; an implementation that never streams can ignore it and
    /// always reply with [`MethodReply::Single`] or [`MethodReply::Error`].
    fn call<'a>(&'a mut self, method: &'a str, parameters: Value, more: bool) -> CallFuture<'a>;
}

/// Dispatches calls across a set of registered [`Interface`] handlers by `interface.Method` name.
///
/// A [`Router`] always answers `org.varlink.service.GetInfo` and
/// `org.varlink.service.GetInterfaceDescription` itself; other interfaces are served by whatever
/// [`Interface`]s were [`add`](Router::add)ed to it.
#[derive(Debug)]
pub struct Router {
    info: varlink_service::Info<'static>,
    interfaces: Vec<Box<dyn Interface>>,
}

impl Router {
    /// Create a router that answers `org.varlink.service.GetInfo` with `info`.
    pub fn new(info: varlink_service::Info<'static>) -> Self {
        Self {
            info,
            interfaces: Vec::new(),
        }
    }

    /// Register a handler for one interface. Replaces any previously registered handler with the
    /// same [`Interface::name`].
    pub fn add(&mut self, interface: Box<dyn Interface>) {
        self.interfaces.retain(|i| i.name() != interface.name());
        self.interfaces.push(interface);
    }

    /// The names of every interface this router serves, `org.varlink.service` included.
    pub fn interface_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interfaces.iter().map(|i| i.name()).collect();
        names.push("org.varlink.service");
        names
    }

    fn method_not_found(method: &str) -> RouterReply {
        MethodReply::Error(
            serde_json::json!({
                "error": "org.varlink.service.MethodNotFound",
                "parameters": { "method": method },
            }),
        )
    }

    async fn handle_service_call(&mut self, method: &str, parameters: Value) -> RouterReply {
        match method {
            "GetInfo" => match serde_json::to_value(&self.info) {
                Ok(value) => MethodReply::Single(Some(value)),
                Err(e) => MethodReply::Error(serde_json::json!({
                    "error": "org.varlink.service.MethodNotImplemented",
                    "parameters": { "method": alloc::format!("GetInfo: {e}") },
                })),
            },
            "GetInterfaceDescription" => {
                let interface = parameters
                    .get("interface")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if interface == "org.varlink.service" {
                    MethodReply::Single(Some(
                        serde_json::json!({ "description": service_description() }),
                    ))
                } else if let Some(handler) = self.interfaces.iter().find(|i| i.name() == interface)
                {
                    MethodReply::Single(Some(
                        serde_json::json!({ "description": handler.description() }),
                    ))
                } else {
                    MethodReply::Error(serde_json::json!({
                        "error": "org.varlink.service.InterfaceNotFound",
                        "parameters": { "interface": interface },
                    }))
                }
            }
            other => Self::method_not_found(other),
        }
    }
}

/// The IDL text of `org.varlink.service` itself.
#[cfg(feature = "introspection")]
fn service_description() -> String {
    alloc::format!("{}", varlink_service::DESCRIPTION)
}

/// The IDL text of `org.varlink.service` itself.
#[cfg(not(feature = "introspection"))]
fn service_description() -> String {
    String::from(
        "interface org.varlink.service\n\n\
         method GetInfo() -> (vendor: string, product: string, version: string, url: string, interfaces: []string)\n\n\
         method GetInterfaceDescription(interface: string) -> (description: string)\n",
    )
}

impl Service for Router {
    type MethodCall<'de> = RawCall;
    type ReplyParams<'ser> = Value;
    type ReplyStreamParams = Value;
    type ReplyStream = BoxStream<'static, crate::Reply<Value>>;
    type ReplyError<'ser> = Value;

    async fn handle<'ser>(&'ser mut self, call: Call<RawCall>) -> RouterReply {
        let more = call.more();
        let raw = call.method();
        let Some((interface, method)) = raw.split() else {
            return MethodReply::Error(serde_json::json!({
                "error": "org.varlink.service.MethodNotFound",
                "parameters": { "method": raw.method() },
            }));
        };

        if interface == "org.varlink.service" {
            let parameters = raw.parameters().clone();
            return self.handle_service_call(method, parameters).await;
        }

        let parameters = raw.parameters().clone();
        match self.interfaces.iter_mut().find(|i| i.name() == interface) {
            Some(handler) => handler.call(method, parameters, more).await,
            None => MethodReply::Error(serde_json::json!({
                "error": "org.varlink.service.InterfaceNotFound",
                "parameters": { "interface": interface },
            })),
        }
    }
}
