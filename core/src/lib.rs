//! HANA Firewall Core Library
//!
//! Translates HANA network service definitions (sysconfig-style key/value
//! files) into firewalld service definition XML files. Provides
//! functionality to:
//! - Parse sysconfig documents while preserving comments and ordering
//! - Expand placeholder-bearing port definitions against HANA instance numbers
//! - Normalize display names into filesystem-safe short names
//! - Generate and write firewalld service XML documents
//!
//! # Architecture
//! - `sysconfig`: the key/value text document collaborator
//! - `domain`: pure transformation logic (expansion, service model)
//! - `firewalld`: the output document model and its XML boundary format
//! - `generator`: batch generation and file writing
//! - `config`: loading configuration from disk

pub mod config;
pub mod domain;
pub mod error;
pub mod firewalld;
pub mod generator;
pub mod sysconfig;

// Re-export domain types (primary API)
pub use domain::{GlobalParameters, ServiceDefinition};

// Re-export other commonly used types
pub use error::{Error, Result};
pub use firewalld::{FirewalldPort, FirewalldService, Protocol};
pub use generator::Firewalld;
pub use sysconfig::Sysconfig;
