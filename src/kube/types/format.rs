use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use std::collections::BTreeMap;

/// Table column width for resource names.
pub const NAME_WIDTH: usize = 29;

/// Shortens `s` to `max` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// kubectl-style age: seconds, minutes, hours, then days.
pub fn format_age(created: Option<&Time>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "<unknown>".to_string();
    };
    let elapsed = now.signed_duration_since(created.0);
    if elapsed.num_minutes() < 1 {
        format!("{}s", elapsed.num_seconds().max(0))
    } else if elapsed.num_hours() < 1 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h", elapsed.num_hours())
    } else {
        format!("{}d", elapsed.num_days())
    }
}

pub fn format_timestamp(ts: Option<&Time>) -> String {
    ts.map(|t| t.0.to_rfc3339()).unwrap_or_default()
}

/// Renders a label or annotation map as `k=v, k=v`.
pub fn format_map(map: &BTreeMap<String, String>) -> String {
    if map.is_empty() {
        return "<none>".to_string();
    }
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Suffix for empty-result messages, e.g. ` in namespace 'x' with label selector 'y'`.
pub fn scope_suffix(namespace: Option<&str>, label_selector: Option<&str>) -> String {
    let mut suffix = String::new();
    if let Some(ns) = namespace {
        suffix.push_str(&format!(" in namespace '{}'", ns));
    }
    if let Some(selector) = label_selector {
        suffix.push_str(&format!(" with label selector '{}'", selector));
    }
    suffix
}
