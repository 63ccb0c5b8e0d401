/*!
 * Sandbox Descriptor
 * Read-only view of the sandbox fields sent to the network plugin
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Accessors the client reads when building attach/detach requests.
///
/// Implemented by [`Sandbox`]; sandbox stores with their own record type can
/// implement it directly instead of converting.
pub trait SandboxInfo {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn namespace(&self) -> &str;
    fn labels(&self) -> &HashMap<String, String>;
    fn annotations(&self) -> &HashMap<String, String>;
    /// Empty when the sandbox has no network namespace of its own
    fn netns_path(&self) -> String;
}

/// Pod metadata as supplied by the CRI request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxMetadata {
    pub name: String,
    pub uid: String,
    pub namespace: String,
    #[serde(default)]
    pub attempt: u32,
}

/// Sandbox configuration subset relevant to networking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxConfig {
    pub metadata: SandboxMetadata,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

/// Handle on a sandbox network namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetNs {
    path: PathBuf,
}

impl NetNs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sandbox record as kept by the sandbox store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sandbox {
    pub id: String,
    pub name: String,
    pub config: SandboxConfig,
    #[serde(default)]
    pub netns: Option<NetNs>,
}

impl Sandbox {
    pub fn new(id: impl Into<String>, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            config: SandboxConfig {
                metadata: SandboxMetadata {
                    name: name.clone(),
                    namespace: namespace.into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            name,
            netns: None,
        }
    }

    pub fn with_netns(mut self, path: impl Into<PathBuf>) -> Self {
        self.netns = Some(NetNs::new(path));
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.annotations.insert(key.into(), value.into());
        self
    }
}

impl SandboxInfo for Sandbox {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.config.metadata.namespace
    }

    fn labels(&self) -> &HashMap<String, String> {
        &self.config.labels
    }

    fn annotations(&self) -> &HashMap<String, String> {
        &self.config.annotations
    }

    fn netns_path(&self) -> String {
        self.netns
            .as_ref()
            .map(|ns| ns.path().to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_metadata() {
        let sandbox = Sandbox::new("abc", "web", "default")
            .with_netns("/var/run/netns/abc")
            .with_label("app", "web");

        assert_eq!(sandbox.id(), "abc");
        assert_eq!(sandbox.name(), "web");
        assert_eq!(sandbox.namespace(), "default");
        assert_eq!(sandbox.netns_path(), "/var/run/netns/abc");
        assert_eq!(sandbox.labels().get("app").map(String::as_str), Some("web"));
        assert!(sandbox.annotations().is_empty());
    }

    #[test]
    fn test_host_network_has_empty_netns_path() {
        let sandbox = Sandbox::new("host", "hostnet", "kube-system");
        assert_eq!(sandbox.netns_path(), "");
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "id": "abc",
            "name": "web",
            "config": {
                "metadata": {"name": "web", "uid": "u-1", "namespace": "default"},
                "labels": {"app": "web"}
            },
            "netns": "/var/run/netns/abc"
        }"#;
        let sandbox: Sandbox = serde_json::from_str(json).unwrap();
        assert_eq!(sandbox.namespace(), "default");
        assert_eq!(sandbox.netns_path(), "/var/run/netns/abc");
        assert_eq!(sandbox.config.metadata.attempt, 0);
    }
}
