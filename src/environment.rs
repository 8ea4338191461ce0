use crate::kube::types::mesh::default_excluded_namespaces;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Environment {
    /// Deadline for a single list or get call against the API server.
    pub request_timeout: Duration,
    /// Deadline for reading a non-follow pod log stream.
    pub log_timeout: Duration,
    pub mesh_excluded_namespaces: BTreeSet<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_timeout: Duration::from_secs(DEFAULT_LOG_TIMEOUT_SECS),
            mesh_excluded_namespaces: default_excluded_namespaces(),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let request_timeout = seconds(
            "KUBE_REQUEST_TIMEOUT_SECS",
            lookup("KUBE_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );
        let log_timeout = seconds(
            "POD_LOG_TIMEOUT_SECS",
            lookup("POD_LOG_TIMEOUT_SECS"),
            DEFAULT_LOG_TIMEOUT_SECS,
        );

        let mesh_excluded_namespaces = match lookup("MESH_EXCLUDED_NAMESPACES") {
            Some(list) => {
                let namespaces: BTreeSet<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|ns| !ns.is_empty())
                    .map(str::to_string)
                    .collect();
                info!("Mesh analysis excludes namespaces: {:?}", namespaces);
                namespaces
            }
            None => {
                debug!("MESH_EXCLUDED_NAMESPACES not set, using platform defaults");
                default_excluded_namespaces()
            }
        };

        Environment {
            request_timeout,
            log_timeout,
            mesh_excluded_namespaces,
        }
    }
}

fn seconds(key: &str, value: Option<String>, default: u64) -> Duration {
    match value {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => {
                debug!("{} loaded from environment: {}s", key, secs);
                Duration::from_secs(secs)
            }
            _ => {
                warn!("{} has invalid value '{}', using {}s", key, raw, default);
                Duration::from_secs(default)
            }
        },
        None => {
            debug!("{} not set, defaulting to {}s", key, default);
            Duration::from_secs(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let e = env(&[]);
        assert_eq!(e.request_timeout, Duration::from_secs(10));
        assert_eq!(e.log_timeout, Duration::from_secs(30));
        assert!(e.mesh_excluded_namespaces.contains("istio-system"));
        assert_eq!(e.mesh_excluded_namespaces.len(), 7);
    }

    #[test]
    fn overrides_are_parsed() {
        let e = env(&[
            ("KUBE_REQUEST_TIMEOUT_SECS", "3"),
            ("POD_LOG_TIMEOUT_SECS", "nope"),
            ("MESH_EXCLUDED_NAMESPACES", "kube-system, monitoring,,"),
        ]);
        assert_eq!(e.request_timeout, Duration::from_secs(3));
        assert_eq!(e.log_timeout, Duration::from_secs(30));
        assert_eq!(
            e.mesh_excluded_namespaces.iter().collect::<Vec<_>>(),
            vec!["kube-system", "monitoring"]
        );
    }
}
