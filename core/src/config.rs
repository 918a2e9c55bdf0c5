//! Loading HANA firewall configuration from disk.
//!
//! The global parameters live in a single sysconfig file; service definitions
//! are one sysconfig file each inside a directory, named after the service.

use std::path::Path;

use tokio::fs;
use tracing::warn;

use crate::domain::{GlobalParameters, ServiceDefinition};
use crate::error::{Error, Result};
use crate::sysconfig::Sysconfig;

/// Default location of the global parameters file.
pub const DEFAULT_GLOBAL_CONFIG_PATH: &str = "/etc/sysconfig/hana-firewall";

/// Default directory holding one sysconfig file per HANA service definition.
pub const DEFAULT_SERVICE_DEFINITION_DIR: &str = "/etc/hana-firewall";

/// Default directory firewalld reads service XML files from.
pub const DEFAULT_FIREWALLD_SERVICE_DIR: &str = "/etc/firewalld/services";

/// Read the global parameters from a sysconfig file.
///
/// A missing file yields empty parameters, matching the create-on-first-use
/// behavior of the configuration tooling.
pub async fn load_global_parameters(path: &Path) -> Result<GlobalParameters> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
    };
    let conf = Sysconfig::parse(&text).map_err(|err| Error::ConfigRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let mut globals = GlobalParameters::default();
    globals.read_from(&conf);
    Ok(globals)
}

/// Read every service definition file in a directory, in lexical filename
/// order.
///
/// Files that cannot be read or parsed are skipped with a warning rather
/// than failing the batch; definitions without any ports are skipped
/// silently. A missing or unreadable directory is an error.
pub async fn load_service_definitions(dir: &Path) -> Result<Vec<ServiceDefinition>> {
    let read_error = |err: std::io::Error| Error::ConfigRead {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_error)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let file_type = entry.file_type().await.map_err(read_error)?;
        if file_type.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut services = Vec::with_capacity(paths.len());
    for path in paths {
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable service definition file");
                continue;
            }
        };
        let conf = match Sysconfig::parse(&text) {
            Ok(conf) => conf,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping malformed service definition file");
                continue;
            }
        };
        let base_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut def = ServiceDefinition::new(base_name);
        def.read_from(&conf);
        if !def.is_empty() {
            services.push(def);
        }
    }
    Ok(services)
}
