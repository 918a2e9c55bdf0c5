//! Domain layer - HANA service definitions and port expansion.
//!
//! This module contains the pure transformation logic: expanding
//! placeholder-bearing port definitions against instance numbers, and turning
//! service definitions into firewalld service documents. These types have no
//! I/O dependencies and can be tested in isolation.

mod params;
mod service;

// Re-export all domain types
pub use params::{
    GlobalParameters, GLOBAL_INSTANCE_NUMBERS_KEY, INSTANCE_NUMBER_PLACEHOLDER,
    INSTANCE_NUMBER_PLUS_ONE_PLACEHOLDER,
};
pub use service::{ServiceDefinition, SERVICE_TCP_KEY, SERVICE_UDP_KEY};
