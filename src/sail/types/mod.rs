pub mod document;
pub mod health;
pub mod istio;
pub mod resource;

pub use health::{HealthCheckResult, HealthReport};
pub use istio::IstioStatusResponse;
pub use resource::{SailResource, SailResourceListResponse};
