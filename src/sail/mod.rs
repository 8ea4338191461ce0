pub mod tools;
pub mod types;

use kube::api::ApiResource;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GROUP: &str = "sailoperator.io";

/// Custom resource kinds managed by the Sail Operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SailKind {
    Istio,
    IstioRevision,
    #[serde(rename = "IstioCNI")]
    IstioCni,
    ZTunnel,
}

impl SailKind {
    /// Every kind, in the order reports list them.
    pub const ALL: [SailKind; 4] = [
        SailKind::Istio,
        SailKind::IstioRevision,
        SailKind::IstioCni,
        SailKind::ZTunnel,
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            SailKind::Istio => "Istio",
            SailKind::IstioRevision => "IstioRevision",
            SailKind::IstioCni => "IstioCNI",
            SailKind::ZTunnel => "ZTunnel",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            SailKind::Istio => "istios",
            SailKind::IstioRevision => "istiorevisions",
            SailKind::IstioCni => "istiocnis",
            SailKind::ZTunnel => "ztunnels",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            SailKind::ZTunnel => "v1alpha1",
            _ => "v1",
        }
    }

    /// Lower-case name accepted by the resource filter.
    pub fn filter_name(&self) -> &'static str {
        match self {
            SailKind::Istio => "istio",
            SailKind::IstioRevision => "istiorevision",
            SailKind::IstioCni => "istiocni",
            SailKind::ZTunnel => "ztunnel",
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: GROUP.to_string(),
            version: self.version().to_string(),
            api_version: format!("{}/{}", GROUP, self.version()),
            kind: self.kind().to_string(),
            plural: self.plural().to_string(),
        }
    }

    /// Resolves a resource filter. Empty and `all` select every kind; matching
    /// is case-insensitive. Returns `None` for unknown names.
    pub fn select(filter: Option<&str>) -> Option<Vec<SailKind>> {
        let filter = filter.map(str::trim).unwrap_or_default().to_lowercase();
        if filter.is_empty() || filter == "all" {
            return Some(SailKind::ALL.to_vec());
        }
        SailKind::ALL
            .into_iter()
            .find(|k| k.filter_name() == filter)
            .map(|k| vec![k])
    }
}

impl fmt::Display for SailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
