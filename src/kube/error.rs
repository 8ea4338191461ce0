use std::io;
use thiserror::Error;

/// Failures surfaced by the cluster client.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The API server answered 404 for the object or its resource type.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("Kubernetes API error: {0}")]
    Api(kube::Error),
    #[error("stream read error: {0}")]
    Stream(#[from] io::Error),
    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound(_))
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => ClusterError::NotFound(resp.message),
            other => ClusterError::Api(other),
        }
    }
}
