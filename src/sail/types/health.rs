use super::document::{object_id, ResourceCondition, SailDocument};
use crate::sail::SailKind;
use kube::api::DynamicObject;
use serde::Serialize;
use std::fmt;

const CRITICAL_CONDITIONS: [(&str, &str); 3] = [
    ("Ready", "is not ready"),
    ("Reconciled", "reconciliation failed"),
    ("DependenciesHealthy", "has unhealthy dependencies"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    NotInstalled,
    Error,
}

impl HealthStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✅",
            HealthStatus::Degraded => "⚠️",
            HealthStatus::Unhealthy | HealthStatus::Error => "❌",
            HealthStatus::NotInstalled => "⭕",
        }
    }

    /// Reduces healthy-out-of-total counts.
    pub fn from_counts(healthy: usize, total: usize) -> Self {
        if healthy == total {
            HealthStatus::Healthy
        } else if healthy > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::NotInstalled => "NotInstalled",
            HealthStatus::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Health of a single custom resource instance.
#[derive(Debug, Clone)]
pub struct InstanceHealth {
    pub healthy: bool,
    pub issues: Vec<String>,
    pub conditions: Vec<ResourceCondition>,
}

impl From<&DynamicObject> for InstanceHealth {
    fn from(obj: &DynamicObject) -> Self {
        let doc = SailDocument::from_object(obj);
        let id = object_id(obj);
        let mut issues = Vec::new();

        for cond in doc.conditions() {
            let failing = CRITICAL_CONDITIONS
                .iter()
                .find(|(kind, _)| *kind == cond.condition_type)
                .filter(|_| !cond.is_true());
            if let Some((_, description)) = failing {
                issues.push(format!("{} {}{}", id, description, cond.reason_suffix()));
            }
        }

        if let Some(state) = doc.state().filter(|s| *s != "Healthy") {
            issues.push(format!("{} state is {}", id, state));
        }

        InstanceHealth {
            healthy: issues.is_empty(),
            issues,
            conditions: doc.conditions().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub component: String,
    pub status: HealthStatus,
    pub reason: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
}

impl HealthCheckResult {
    fn new(kind: SailKind, status: HealthStatus, reason: String, issues: Vec<String>) -> Self {
        HealthCheckResult {
            component: kind.kind().to_string(),
            status,
            reason,
            issues,
            conditions: Vec::new(),
        }
    }

    pub fn crd_missing(kind: SailKind) -> Self {
        HealthCheckResult::new(
            kind,
            HealthStatus::NotInstalled,
            "CRD not installed".to_string(),
            vec![format!("{} CRD is not installed or not accessible", kind)],
        )
    }

    pub fn query_failed(kind: SailKind, err: impl fmt::Display) -> Self {
        HealthCheckResult::new(
            kind,
            HealthStatus::Error,
            "Query failed".to_string(),
            vec![format!("Failed to query {} resources: {}", kind, err)],
        )
    }

    /// Aggregates the instances of one kind.
    pub fn from_instances(kind: SailKind, items: &[DynamicObject]) -> Self {
        if items.is_empty() {
            return HealthCheckResult::new(
                kind,
                HealthStatus::NotInstalled,
                "No resources found".to_string(),
                vec![format!("No {} resources are installed", kind)],
            );
        }

        let instances: Vec<InstanceHealth> = items.iter().map(InstanceHealth::from).collect();
        let total = instances.len();
        let healthy = instances.iter().filter(|i| i.healthy).count();
        let status = HealthStatus::from_counts(healthy, total);

        let reason = match status {
            HealthStatus::Healthy => format!("All {} resources healthy", total),
            _ => format!("{}/{} resources healthy", healthy, total),
        };
        let mut result = HealthCheckResult::new(kind, status, reason, Vec::new());
        for instance in instances {
            result.issues.extend(instance.issues);
            result.conditions.extend(instance.conditions);
        }
        result
    }

    fn as_string(&self) -> String {
        let mut output = format!("{} {}: {}", self.status.marker(), self.component, self.status);
        if !self.reason.is_empty() {
            output.push_str(&format!(" - {}", self.reason));
        }
        output.push('\n');
        for issue in &self.issues {
            output.push_str(&format!("   🔸 {}\n", issue));
        }
        output
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub overall_health: HealthStatus,
    pub healthy_count: usize,
    pub total_count: usize,
    pub components: Vec<HealthCheckResult>,
}

impl HealthReport {
    pub fn new(components: Vec<HealthCheckResult>) -> Self {
        let total_count = components.len();
        let healthy_count = components
            .iter()
            .filter(|c| c.status == HealthStatus::Healthy)
            .count();
        HealthReport {
            status: "success".to_string(),
            overall_health: HealthStatus::from_counts(healthy_count, total_count),
            healthy_count,
            total_count,
            components,
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = "=== Summary ===\n".to_string();
        match self.overall_health {
            HealthStatus::Healthy => {
                summary.push_str("✅ All Sail Operator components are healthy and functioning properly.\n");
            }
            HealthStatus::Degraded => {
                summary.push_str("⚠️  Some Sail Operator components have issues that need attention.\n");
                summary.push_str("\nComponents with issues:\n");
                for comp in self.components.iter().filter(|c| c.status != HealthStatus::Healthy) {
                    summary.push_str(&format!("  • {}: {}", comp.component, comp.reason));
                    if let Some(first) = comp.issues.first() {
                        summary.push_str(&format!(" - {}", first));
                    }
                    summary.push('\n');
                }
            }
            _ => {
                summary.push_str("❌ Sail Operator components are experiencing significant issues.\n");
                summary.push_str("\nCritical issues found:\n");
                let critical = self.components.iter().filter(|c| {
                    matches!(c.status, HealthStatus::Unhealthy | HealthStatus::Error)
                });
                for comp in critical {
                    summary.push_str(&format!("  • {}: {}\n", comp.component, comp.reason));
                    for issue in &comp.issues {
                        summary.push_str(&format!("    - {}\n", issue));
                    }
                }
            }
        }
        summary
    }

    pub fn as_string(&self) -> String {
        let mut output = "=== Sail Operator Health Check ===\n\n".to_string();
        output.push_str(&format!(
            "Overall Health: {} ({}/{} components healthy)\n\n",
            self.overall_health, self.healthy_count, self.total_count
        ));
        for component in &self.components {
            output.push_str(&component.as_string());
        }
        output.push('\n');
        output.push_str(&self.summary());
        output
    }
}
