//! Options handed to the auth-material and cluster-join collaborators.

use serde::{Deserialize, Serialize};

/// Remote locations of the TLS material the engine is started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOptions {
    pub ca_cert_remote_path: String,
    pub server_cert_remote_path: String,
    pub server_key_remote_path: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            ca_cert_remote_path: "/etc/docker/ca.pem".to_string(),
            server_cert_remote_path: "/etc/docker/server.pem".to_string(),
            server_key_remote_path: "/etc/docker/server-key.pem".to_string(),
        }
    }
}

/// Swarm membership requested for the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmOptions {
    /// Join a swarm at all.
    pub is_swarm: bool,
    /// Also run the swarm manager on this machine.
    pub master: bool,
    /// Discovery URL, e.g. `token://<id>`.
    pub discovery: String,
    /// Listen address of the manager.
    pub host: String,
    pub image: String,
    pub strategy: String,
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self {
            is_swarm: false,
            master: false,
            discovery: String::new(),
            host: "tcp://0.0.0.0:3376".to_string(),
            image: "swarm:latest".to_string(),
            strategy: "spread".to_string(),
        }
    }
}
