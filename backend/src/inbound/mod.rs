//! Inbound adapters translating external requests into use-case calls.
//!
//! HTTP handlers live under [`http`].

pub mod http;
