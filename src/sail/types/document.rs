//! Typed views over Sail Operator custom resources.
//!
//! Every field is optional and tolerant of unexpected JSON types: a value of
//! the wrong shape reads as absent instead of failing the whole document.

use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, i64>(deserializer)?.unwrap_or_default())
}

fn lenient_conditions<'de, D>(deserializer: D) -> Result<Vec<ResourceCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A status condition, copied verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCondition {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub reason: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub message: String,
}

impl ResourceCondition {
    pub fn is_true(&self) -> bool {
        self.status == "True"
    }

    /// ` (Reason)` or nothing.
    pub fn reason_suffix(&self) -> String {
        if self.reason.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.reason)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStrategy {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub strategy_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SailSpec {
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub profile: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub update_strategy: Option<UpdateStrategy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub ready: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub in_use: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SailStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub active_revision_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub revisions: Option<RevisionSummary>,
    #[serde(default, deserialize_with = "lenient_conditions")]
    pub conditions: Vec<ResourceCondition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SailDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub spec: Option<SailSpec>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<SailStatus>,
}

impl SailDocument {
    pub fn from_object(obj: &DynamicObject) -> Self {
        serde_json::from_value(obj.data.clone()).unwrap_or_default()
    }

    pub fn version(&self) -> Option<&str> {
        self.spec.as_ref()?.version.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.spec.as_ref()?.profile.as_deref()
    }

    pub fn update_strategy(&self) -> Option<&str> {
        self.spec
            .as_ref()?
            .update_strategy
            .as_ref()?
            .strategy_type
            .as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.status.as_ref()?.state.as_deref()
    }

    pub fn active_revision_name(&self) -> Option<&str> {
        self.status.as_ref()?.active_revision_name.as_deref()
    }

    pub fn revisions(&self) -> RevisionSummary {
        self.status
            .as_ref()
            .and_then(|s| s.revisions)
            .unwrap_or_default()
    }

    pub fn conditions(&self) -> &[ResourceCondition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

}

/// `namespace/name`, or just the name for cluster-scoped objects.
pub fn object_id(obj: &DynamicObject) -> String {
    let name = obj.metadata.name.clone().unwrap_or_default();
    match obj.metadata.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => format!("{}/{}", ns, name),
        _ => name,
    }
}
