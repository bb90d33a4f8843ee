//! Pod-to-owner correlation
//!
//! Matches pods to a workload by namespace and label selector and summarises
//! their phases.

use crate::models::{PodInfo, PodPhase, PodRecord};
use std::collections::BTreeMap;

/// Returns true if every selector key is present in `labels` with an equal
/// value. Extra labels are ignored.
pub fn selector_matches(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    selector
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}

/// Pods in `namespace` whose labels satisfy `selector`, in input order
pub fn filter_pods_by_selector<'a>(
    pods: &'a [PodRecord],
    namespace: &str,
    selector: &BTreeMap<String, String>,
) -> Vec<&'a PodRecord> {
    pods.iter()
        .filter(|pod| pod.meta.namespace == namespace)
        .filter(|pod| selector_matches(selector, &pod.meta.labels))
        .collect()
}

/// Summarise matched pods. `current` and `desired` are taken as reported by
/// the workload, not recounted from `pods`.
pub fn pod_info(current: i32, desired: i32, pods: &[&PodRecord]) -> PodInfo {
    let mut info = PodInfo {
        current,
        desired,
        ..Default::default()
    };

    for pod in pods {
        match pod.phase {
            PodPhase::Running => info.running += 1,
            PodPhase::Pending => info.pending += 1,
            PodPhase::Failed => info.failed += 1,
            PodPhase::Succeeded => info.succeeded += 1,
            PodPhase::Unknown => {}
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObjectMeta;

    fn pod(namespace: &str, name: &str, labels: &[(&str, &str)], phase: PodPhase) -> PodRecord {
        PodRecord::new(
            ObjectMeta::new(namespace, name).with_labels(labels.iter().copied()),
            phase,
        )
    }

    fn selector(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_superset_labels_match() {
        let labels = selector(&[("app", "x"), ("tier", "web"), ("pod-template-hash", "abc")]);
        assert!(selector_matches(&selector(&[("app", "x")]), &labels));
        assert!(selector_matches(&selector(&[("app", "x"), ("tier", "web")]), &labels));
    }

    #[test]
    fn test_missing_or_different_label_does_not_match() {
        let labels = selector(&[("app", "x")]);
        assert!(!selector_matches(&selector(&[("app", "x"), ("tier", "web")]), &labels));
        assert!(!selector_matches(&selector(&[("app", "y")]), &labels));
        assert!(!selector_matches(&selector(&[("app", "x")]), &BTreeMap::new()));
    }

    #[test]
    fn test_empty_selector_matches_whole_namespace() {
        let pods = vec![
            pod("ns", "a", &[], PodPhase::Running),
            pod("other", "b", &[], PodPhase::Running),
        ];
        let matched = filter_pods_by_selector(&pods, "ns", &BTreeMap::new());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].meta.name, "a");
    }

    #[test]
    fn test_namespace_must_match() {
        let pods = vec![
            pod("ns", "p1", &[("app", "x")], PodPhase::Running),
            pod("other", "p2", &[("app", "x")], PodPhase::Running),
        ];
        let matched = filter_pods_by_selector(&pods, "ns", &selector(&[("app", "x")]));
        let names: Vec<_> = matched.iter().map(|p| p.meta.name.as_str()).collect();
        assert_eq!(names, vec!["p1"]);
    }

    #[test]
    fn test_aggregate_for_workload_scenario() {
        let pods = vec![
            pod("ns", "p1", &[("app", "x")], PodPhase::Running),
            pod("ns", "p2", &[("app", "x")], PodPhase::Pending),
            pod("ns", "p3", &[("app", "y")], PodPhase::Running),
        ];
        let matched = filter_pods_by_selector(&pods, "ns", &selector(&[("app", "x")]));
        assert_eq!(matched.len(), 2);

        let info = pod_info(2, 3, &matched);
        assert_eq!(info.desired, 3);
        assert_eq!(info.current, 2);
        assert_eq!(info.running, 1);
        assert_eq!(info.pending, 1);
        assert_eq!(info.failed, 0);
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_zero_matches_keeps_reported_counts() {
        let info = pod_info(4, 5, &[]);
        assert_eq!(
            info,
            PodInfo {
                current: 4,
                desired: 5,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_phase_breakdown() {
        let pods = vec![
            pod("ns", "a", &[], PodPhase::Failed),
            pod("ns", "b", &[], PodPhase::Succeeded),
            pod("ns", "c", &[], PodPhase::Unknown),
            pod("ns", "d", &[], PodPhase::Failed),
        ];
        let refs: Vec<&PodRecord> = pods.iter().collect();
        let info = pod_info(4, 4, &refs);
        assert_eq!(info.failed, 2);
        assert_eq!(info.succeeded, 1);
        assert_eq!(info.running + info.pending, 0);
    }
}
