use super::format::{format_timestamp, scope_suffix, truncate, NAME_WIDTH};
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePortInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_port: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub external_ip: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ports: Vec<ServicePortInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub selector: BTreeMap<String, String>,
    pub created_at: String,
}

impl From<&Service> for ServiceInfo {
    fn from(svc: &Service) -> Self {
        let spec = svc.spec.as_ref();

        let external_ip = svc
            .status
            .as_ref()
            .and_then(|s| s.load_balancer.as_ref())
            .and_then(|lb| lb.ingress.as_ref())
            .map(|ingress| {
                ingress
                    .iter()
                    .flat_map(|i| [i.ip.clone(), i.hostname.clone()])
                    .flatten()
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let ports = spec
            .and_then(|s| s.ports.as_ref())
            .map(|ports| {
                ports
                    .iter()
                    .map(|p| ServicePortInfo {
                        name: p.name.clone(),
                        port: p.port,
                        target_port: p.target_port.as_ref().map(|t| match t {
                            IntOrString::Int(i) => i.to_string(),
                            IntOrString::String(s) => s.clone(),
                        }),
                        protocol: p.protocol.clone().unwrap_or_else(|| "TCP".to_string()),
                        node_port: p.node_port,
                    })
                    .collect()
            })
            .unwrap_or_default();

        ServiceInfo {
            name: svc.metadata.name.clone().unwrap_or_default(),
            namespace: svc.metadata.namespace.clone().unwrap_or_default(),
            service_type: spec
                .and_then(|s| s.type_.clone())
                .unwrap_or_else(|| "ClusterIP".to_string()),
            cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
            external_ip,
            ports,
            labels: svc.metadata.labels.clone().unwrap_or_default(),
            selector: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
            created_at: format_timestamp(svc.metadata.creation_timestamp.as_ref()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub status: String,
    pub count: usize,
    pub services: Vec<ServiceInfo>,
}

impl ServiceListResponse {
    pub fn new(items: &[Service]) -> Self {
        let services: Vec<ServiceInfo> = items.iter().map(ServiceInfo::from).collect();
        ServiceListResponse {
            status: "success".to_string(),
            count: services.len(),
            services,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>, label_selector: Option<&str>) -> String {
        if self.services.is_empty() {
            return format!("No services found{}", scope_suffix(namespace, label_selector));
        }

        let mut output = format!("Found {} services:\n\n", self.count);
        output.push_str(&format!(
            "{:<30} {:<15} {:<12} {:<15} {:<20} {}\n",
            "NAME", "NAMESPACE", "TYPE", "CLUSTER-IP", "EXTERNAL-IP", "PORTS"
        ));
        output.push_str(&"-".repeat(110));
        output.push('\n');

        for svc in &self.services {
            let external_ip = if svc.external_ip.is_empty() {
                "<none>".to_string()
            } else {
                svc.external_ip.join(",")
            };
            let ports = svc
                .ports
                .iter()
                .map(|p| format!("{}/{}", p.port, p.protocol))
                .collect::<Vec<_>>()
                .join(",");

            output.push_str(&format!(
                "{:<30} {:<15} {:<12} {:<15} {:<20} {}\n",
                truncate(&svc.name, NAME_WIDTH),
                svc.namespace,
                svc.service_type,
                svc.cluster_ip.as_deref().unwrap_or("<none>"),
                truncate(&external_ip, 19),
                ports
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_balancer_ingress_and_ports_are_flattened() {
        let svc: Service = serde_json::from_value(json!({
            "metadata": { "name": "istio-ingressgateway", "namespace": "istio-system" },
            "spec": {
                "type": "LoadBalancer",
                "clusterIP": "10.96.0.12",
                "ports": [
                    { "name": "http2", "port": 80, "targetPort": 8080, "protocol": "TCP", "nodePort": 31380 },
                    { "name": "https", "port": 443, "targetPort": "https" }
                ]
            },
            "status": { "loadBalancer": { "ingress": [
                { "ip": "203.0.113.10" },
                { "hostname": "lb.example.com" }
            ] } }
        }))
        .unwrap();

        let info = ServiceInfo::from(&svc);
        assert_eq!(info.external_ip, vec!["203.0.113.10", "lb.example.com"]);
        assert_eq!(info.ports[0].target_port.as_deref(), Some("8080"));
        assert_eq!(info.ports[1].target_port.as_deref(), Some("https"));
        assert_eq!(info.ports[1].protocol, "TCP");

        let text = ServiceListResponse::new(&[svc]).as_string(None, None);
        assert!(text.contains("80/TCP,443/TCP"));
        assert!(text.starts_with("Found 1 services:"));
    }
}
