#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub)]
#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]

pub use varlink_core::*;
pub mod notified;
pub mod unix;
#[cfg(feature = "address")]
pub mod tcp;
#[cfg(feature = "address")]
pub mod exec;
#[cfg(feature = "address")]
pub mod pipe;
#[cfg(feature = "address")]
pub mod activation;
#[cfg(feature = "address")]
pub mod address;
