//! Batch generation of firewalld service documents.

use std::collections::BTreeMap;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::{GlobalParameters, ServiceDefinition};
use crate::error::{Error, Result};
use crate::firewalld::FirewalldService;

/// Turns HANA service definitions into firewalld service documents and
/// writes them out as XML files.
#[derive(Debug, Clone, Default)]
pub struct Firewalld {
    /// Global configuration shared by all service definitions.
    pub globals: GlobalParameters,
    /// The service definitions to generate documents for.
    pub services: Vec<ServiceDefinition>,
}

impl Firewalld {
    /// Generate one firewalld service document per defined service, keyed by
    /// short name.
    ///
    /// Definitions without any ports are skipped. When two display names
    /// normalize to the same short name, the later definition overwrites the
    /// earlier one. The first expansion error aborts the whole batch and no
    /// partial mapping is returned.
    pub fn generate(&self) -> Result<BTreeMap<String, FirewalldService>> {
        let mut services = BTreeMap::new();
        for def in &self.services {
            if def.is_empty() {
                continue;
            }
            let svc = def.to_firewalld_service(&self.globals)?;
            services.insert(svc.short_name.clone(), svc);
        }
        Ok(services)
    }

    /// Serialize generated service documents into XML files under the
    /// destination directory, one `<short-name>.xml` per service, mode 0600.
    ///
    /// The directory must already exist; existing files are overwritten.
    pub async fn write(
        &self,
        dest_dir: &Path,
        services: &BTreeMap<String, FirewalldService>,
    ) -> Result<()> {
        match fs::metadata(dest_dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                return Err(Error::DestinationUnavailable {
                    path: dest_dir.to_path_buf(),
                })
            }
        }
        for (short_name, svc) in services {
            let path = dest_dir.join(format!("{short_name}.xml"));
            let mut options = fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            options.mode(0o600);
            let mut file = options.open(&path).await.map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
            file.write_all(svc.to_xml().as_bytes())
                .await
                .map_err(|source| Error::Write {
                    path: path.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firewalld::{FirewalldPort, Protocol};

    fn fixture() -> Firewalld {
        Firewalld {
            globals: GlobalParameters {
                instance_numbers: vec!["00".to_string(), "01".to_string()],
            },
            services: vec![
                ServiceDefinition {
                    display_name: "Database Client".to_string(),
                    tcp: vec!["1__INST_NUM__00".to_string(), "200".to_string()],
                    udp: Vec::new(),
                },
                ServiceDefinition {
                    display_name: "B^$&VGDF#C$".to_string(),
                    tcp: Vec::new(),
                    udp: vec!["3__INST_NUM+1__00".to_string(), "400".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_generate() {
        let services = fixture().generate().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(
            services["database-client"],
            FirewalldService {
                short_name: "database-client".to_string(),
                description: "Database Client".to_string(),
                ports: vec![
                    FirewalldPort::new(200, Protocol::Tcp),
                    FirewalldPort::new(10000, Protocol::Tcp),
                    FirewalldPort::new(10100, Protocol::Tcp),
                ],
            }
        );
        assert_eq!(
            services["b---vgdf-c-"],
            FirewalldService {
                short_name: "b---vgdf-c-".to_string(),
                description: "B^$&VGDF#C$".to_string(),
                ports: vec![
                    FirewalldPort::new(400, Protocol::Udp),
                    FirewalldPort::new(30100, Protocol::Udp),
                    FirewalldPort::new(30200, Protocol::Udp),
                ],
            }
        );
    }

    #[test]
    fn test_generate_skips_empty_definitions() {
        let mut fw = fixture();
        fw.services.push(ServiceDefinition::new("no ports at all"));
        let services = fw.generate().unwrap();
        assert_eq!(services.len(), 2);
        assert!(!services.contains_key("no-ports-at-all"));
    }

    #[test]
    fn test_generate_is_fail_fast() {
        let mut fw = fixture();
        fw.services.push(ServiceDefinition {
            display_name: "broken".to_string(),
            tcp: vec!["not-a-port".to_string()],
            udp: Vec::new(),
        });
        assert!(fw.generate().is_err());
    }

    #[test]
    fn test_later_definition_wins_short_name_collision() {
        let fw = Firewalld {
            globals: GlobalParameters {
                instance_numbers: vec!["00".to_string()],
            },
            services: vec![
                ServiceDefinition {
                    display_name: "My Service".to_string(),
                    tcp: vec!["100".to_string()],
                    udp: Vec::new(),
                },
                ServiceDefinition {
                    display_name: "my service".to_string(),
                    tcp: vec!["200".to_string()],
                    udp: Vec::new(),
                },
            ],
        };
        let services = fw.generate().unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services["my-service"].description, "my service");
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let fw = fixture();
        let services = fw.generate().unwrap();
        let dest = tempfile::tempdir().unwrap();

        fw.write(dest.path(), &services).await.unwrap();

        let xml = fs::read_to_string(dest.path().join("database-client.xml"))
            .await
            .unwrap();
        assert_eq!(
            FirewalldService::from_xml(&xml).unwrap(),
            services["database-client"]
        );
        let xml = fs::read_to_string(dest.path().join("b---vgdf-c-.xml"))
            .await
            .unwrap();
        assert_eq!(
            FirewalldService::from_xml(&xml).unwrap(),
            services["b---vgdf-c-"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_written_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let fw = fixture();
        let services = fw.generate().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fw.write(dest.path(), &services).await.unwrap();

        let meta = fs::metadata(dest.path().join("database-client.xml"))
            .await
            .unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_write_requires_existing_directory() {
        let fw = fixture();
        let services = fw.generate().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let missing = dest.path().join("no-such-dir");

        let err = fw.write(&missing, &services).await.unwrap_err();
        assert!(matches!(err, Error::DestinationUnavailable { .. }));
    }
}
