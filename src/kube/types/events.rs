use super::format::{format_timestamp, truncate, NAME_WIDTH};
use k8s_openapi::api::events::v1::Event;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reason: String,
    pub message: String,
    pub count: i32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub first_seen: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub last_seen: String,
    pub involved_kind: String,
    pub involved_name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub involved_namespace: String,
}

impl EventInfo {
    /// `Kind/namespace/name`, omitting the namespace for cluster-scoped objects.
    pub fn involved(&self) -> String {
        let mut involved = self.involved_kind.clone();
        if !self.involved_namespace.is_empty() {
            involved.push('/');
            involved.push_str(&self.involved_namespace);
        }
        involved.push('/');
        involved.push_str(&self.involved_name);
        involved
    }
}

impl From<&Event> for EventInfo {
    fn from(event: &Event) -> Self {
        let regarding = event.regarding.as_ref();
        EventInfo {
            event_type: event.type_.clone().unwrap_or_default(),
            reason: event.reason.clone().unwrap_or_default(),
            message: event.note.clone().unwrap_or_default(),
            count: event
                .series
                .as_ref()
                .map(|s| s.count)
                .or(event.deprecated_count)
                .unwrap_or(0),
            first_seen: format_timestamp(event.deprecated_first_timestamp.as_ref()),
            last_seen: format_timestamp(event.deprecated_last_timestamp.as_ref()),
            involved_kind: regarding.and_then(|r| r.kind.clone()).unwrap_or_default(),
            involved_name: regarding.and_then(|r| r.name.clone()).unwrap_or_default(),
            involved_namespace: regarding
                .and_then(|r| r.namespace.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventListResponse {
    pub status: String,
    pub count: usize,
    pub events: Vec<EventInfo>,
}

impl EventListResponse {
    pub fn new(items: &[Event]) -> Self {
        let events: Vec<EventInfo> = items.iter().map(EventInfo::from).collect();
        EventListResponse {
            status: "success".to_string(),
            count: events.len(),
            events,
        }
    }

    pub fn as_string(&self) -> String {
        if self.events.is_empty() {
            return "No events found".to_string();
        }

        let mut output = format!("Found {} events:\n\n", self.count);
        output.push_str(&format!(
            "{:<8} {:<16} {:<30} {:<12} {}\n",
            "TYPE", "REASON", "INVOLVED", "COUNT", "MESSAGE"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for event in &self.events {
            output.push_str(&format!(
                "{:<8} {:<16} {:<30} {:<12} {}\n",
                event.event_type,
                event.reason,
                truncate(&event.involved(), NAME_WIDTH),
                event.count,
                truncate(&event.message, 50)
            ));
        }

        output
    }
}

/// Appends `key=value` to a comma-separated field selector.
pub fn append_field_selector(selector: &mut String, key: &str, value: &str) {
    if !selector.is_empty() {
        selector.push(',');
    }
    selector.push_str(key);
    selector.push('=');
    selector.push_str(value);
}
