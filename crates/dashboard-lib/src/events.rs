//! Warning events for correlated pods

use crate::models::{EventRecord, EventSeverity, PodRecord};
use std::collections::HashSet;

/// Messages of warning events whose involved object is one of `pods`.
///
/// Events keep their input order and repeated warnings are all reported.
pub fn pods_warning_messages(events: &[EventRecord], pods: &[&PodRecord]) -> Vec<String> {
    if pods.is_empty() {
        return Vec::new();
    }

    let pod_keys: HashSet<(&str, &str)> = pods
        .iter()
        .map(|pod| (pod.meta.namespace.as_str(), pod.meta.name.as_str()))
        .collect();

    events
        .iter()
        .filter(|event| event.severity == EventSeverity::Warning)
        .filter(|event| refers_to_pod(event))
        .filter(|event| {
            let target = &event.involved_object;
            pod_keys.contains(&(target.namespace.as_str(), target.name.as_str()))
        })
        .map(|event| event.message.clone())
        .collect()
}

// An empty kind is treated as a pod reference
fn refers_to_pod(event: &EventRecord) -> bool {
    let kind = event.involved_object.kind.as_str();
    kind.is_empty() || kind == "Pod"
}
