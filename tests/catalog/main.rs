//! Plant catalog integration tests.

mod support;
mod service;
mod http;

#[cfg(feature = "sled")]
mod sled_store;
