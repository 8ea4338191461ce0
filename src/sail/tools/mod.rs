pub mod health;
pub mod istio;
pub mod resources;

pub use health::SailHealthTool;
pub use istio::IstioStatusTool;
pub use resources::ListSailResourcesTool;
