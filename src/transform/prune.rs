//! Removal of endpoints that are not part of the SDK surface.

use crate::document::Document;
use serde::Serialize;

/// PruneReport records which requested endpoints were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub removed: Vec<String>,
    /// Requested endpoints that were not in the document.
    pub skipped: Vec<String>,
}

/// Deletes each named endpoint from the document.
///
/// Missing endpoints are recorded as skipped. A document without a `paths`
/// map is left untouched and every name is skipped.
pub fn prune_endpoints<I, S>(doc: &mut Document, endpoints: I) -> PruneReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = PruneReport::default();

    let Some(paths) = doc.paths_mut() else {
        tracing::warn!("document has no paths section, nothing to prune");
        report.skipped = endpoints.into_iter().map(|e| e.as_ref().to_string()).collect();
        return report;
    };

    for endpoint in endpoints {
        let endpoint = endpoint.as_ref();
        if paths.delete(endpoint).is_some() {
            tracing::debug!(endpoint, "removed endpoint");
            report.removed.push(endpoint.to_string());
        } else {
            tracing::debug!(endpoint, "endpoint not found, skipping");
            report.skipped.push(endpoint.to_string());
        }
    }

    tracing::info!(
        removed = report.removed.len(),
        skipped = report.skipped.len(),
        "pruned endpoints"
    );
    report
}
