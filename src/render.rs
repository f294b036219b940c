//! Text rendering of a cluster snapshot.
//!
//! Presentation only; the snapshot itself carries all the data,
//! including which entries are empty because their query failed.

use std::fmt::Write;

use kubesnap_types::{ClusterSnapshot, ResourceKind};

/// Render a snapshot as an indented text listing
pub fn table(snapshot: &ClusterSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Cluster: {}", snapshot.cluster_name);
    let _ = writeln!(
        out,
        "Taken:   {}",
        snapshot.taken_at.format("%Y-%m-%dT%H:%M:%SZ")
    );

    let _ = writeln!(out, "\nNamespaces ({})", snapshot.namespaces.len());
    for namespace in &snapshot.namespaces {
        let _ = writeln!(out, "  {namespace}");
    }

    for kind in ResourceKind::ALL {
        let _ = writeln!(out, "\n{}", heading(kind));
        // Discovery order, not map order
        for namespace in &snapshot.namespaces {
            let names = snapshot
                .names(kind)
                .get(namespace)
                .map(Vec::as_slice)
                .unwrap_or_default();

            if snapshot.failed(namespace, kind) {
                let _ = writeln!(out, "  {namespace}: (query failed)");
            } else if names.is_empty() {
                let _ = writeln!(out, "  {namespace}: (none)");
            } else {
                let _ = writeln!(out, "  {namespace}:");
                for name in names {
                    let _ = writeln!(out, "    {name}");
                }
            }
        }
    }

    if snapshot.is_partial() {
        let _ = writeln!(
            out,
            "\nPartial data: {} resource queries failed",
            snapshot.errors.len()
        );
        for failure in &snapshot.errors {
            let _ = writeln!(
                out,
                "  {}/{}: {}",
                failure.namespace, failure.kind, failure.message
            );
        }
    }

    out
}

fn heading(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Pod => "Pods",
        ResourceKind::Deployment => "Deployments",
        ResourceKind::Service => "Services",
    }
}

#[cfg(test)]
mod tests {
    use kubesnap_types::QueryFailure;

    use super::*;

    #[test]
    fn test_failed_and_empty_entries_render_differently() {
        let mut snapshot = ClusterSnapshot::new(
            "prod".to_string(),
            vec!["default".to_string(), "kube-system".to_string()],
        );
        snapshot.insert(ResourceKind::Pod, "default", vec!["api-1".to_string()]);
        snapshot.record_failure(QueryFailure {
            namespace: "kube-system".to_string(),
            kind: ResourceKind::Pod,
            message: "forbidden".to_string(),
        });

        let rendered = table(&snapshot);

        assert!(rendered.contains("Cluster: prod"));
        assert!(rendered.contains("api-1"));
        assert!(rendered.contains("kube-system: (query failed)"));
        // Empty-but-successful entries say so instead
        assert!(rendered.contains("default: (none)"));
        assert!(rendered.contains("Partial data: 1 resource queries failed"));
    }

    #[test]
    fn test_complete_snapshot_has_no_partial_note() {
        let mut snapshot = ClusterSnapshot::new("prod".to_string(), vec!["default".to_string()]);
        snapshot.insert(ResourceKind::Service, "default", vec!["api-svc".to_string()]);

        let rendered = table(&snapshot);
        assert!(!rendered.contains("Partial data"));
        assert!(rendered.contains("api-svc"));
    }
}
