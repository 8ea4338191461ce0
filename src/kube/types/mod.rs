pub mod configmaps;
pub mod deployments;
pub mod events;
pub mod format;
pub mod logs;
pub mod mesh;
pub mod namespaces;
pub mod pod;
pub mod services;

pub use configmaps::ConfigMapListResponse;
pub use deployments::DeploymentListResponse;
pub use events::EventListResponse;
pub use logs::PodLogsResponse;
pub use mesh::MeshWorkloadsResponse;
pub use namespaces::{NamespaceDetailsResponse, NamespaceListResponse};
pub use pod::PodListResponse;
pub use services::ServiceListResponse;
