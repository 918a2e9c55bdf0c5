//! Error types for the hana-firewall-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for hana-firewall operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while expanding port definitions and generating
/// firewalld service files.
#[derive(Error, Debug)]
pub enum Error {
    /// A port definition did not expand to a valid port number, or an
    /// instance number could not be parsed while applying the "+1" rule.
    #[error("port definition \"{definition}\" is malformed: {detail}")]
    MalformedPortDefinition { definition: String, detail: String },

    /// A sysconfig document contained a data line that could not be parsed.
    #[error("malformed sysconfig text at line {line}: {reason}")]
    SysconfigParse { line: usize, reason: String },

    /// A configuration file or directory could not be read.
    #[error("failed to read configuration from \"{}\": {reason}", path.display())]
    ConfigRead { path: PathBuf, reason: String },

    /// The destination directory for generated XML files is missing.
    #[error("destination directory \"{}\" does not exist or is not a directory", path.display())]
    DestinationUnavailable { path: PathBuf },

    /// A generated XML file could not be written.
    #[error("failed to write \"{}\": {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A firewalld service XML document could not be parsed.
    #[error("malformed firewalld service XML: {0}")]
    Xml(String),
}
