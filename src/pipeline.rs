//! The full processing run: merge, prune, nullability, property maps.

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::merge::merge_all;
use crate::transform::{
    convert_single_property_objects, normalize_nullability, prune_endpoints, MapConversion,
    PruneReport,
};
use serde::Serialize;

/// Stage names a point in the run after which a snapshot can be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Merged,
    Pruned,
    Nullable,
}

impl Stage {
    /// Returns the suffix used when a snapshot is written next to the output.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Stage::Merged => "merged_only",
            Stage::Pruned => "cleaned_only",
            Stage::Nullable => "nullable_only",
        }
    }
}

/// PipelineReport summarizes what each pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub path_count: usize,
    pub pruned: PruneReport,
    pub nullable_count: usize,
    pub conversions: Vec<MapConversion>,
    #[serde(skip)]
    pub snapshots: Vec<(Stage, Document)>,
}

/// Pipeline runs every pass in order over a base document and its overlays.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
    keep_intermediate: bool,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Pipeline {
            config,
            keep_intermediate: false,
        }
    }

    /// Records a copy of the document after each intermediate stage.
    pub fn keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }

    /// Merges `overlays` into `base` in order, then prunes, normalizes and
    /// converts the result.
    ///
    /// Fails only if the merged document has no `paths` map.
    pub fn run<'a>(
        &self,
        base: Document,
        overlays: impl IntoIterator<Item = &'a Document>,
    ) -> Result<(Document, PipelineReport)> {
        let mut report = PipelineReport::default();

        let mut doc = merge_all(base, overlays);
        self.snapshot(&mut report, Stage::Merged, &doc);

        report.pruned = prune_endpoints(&mut doc, &self.config.exclusions.excluded_endpoints);
        self.snapshot(&mut report, Stage::Pruned, &doc);

        report.nullable_count = normalize_nullability(&mut doc);
        self.snapshot(&mut report, Stage::Nullable, &doc);

        report.conversions = convert_single_property_objects(&mut doc, &self.config.exclusions)?;
        report.path_count = doc.path_count();

        tracing::info!(
            paths = report.path_count,
            removed = report.pruned.removed.len(),
            nullable = report.nullable_count,
            conversions = report.conversions.len(),
            "pipeline finished"
        );
        Ok((doc, report))
    }

    fn snapshot(&self, report: &mut PipelineReport, stage: Stage, doc: &Document) {
        if self.keep_intermediate {
            report.snapshots.push((stage, doc.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StructureError};
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    fn doc(json: &str) -> Document {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_two_document_scenario() {
        let a = doc(
            r#"{"paths":{"/x":{"put":{"requestBody":{"content":{"application/json":{"schema":{
                "type":"object","properties":{"item":{"type":"object","properties":{
                    "only_key":{"type":"object","properties":{"n":{"type":"integer"}}}}}}}}}}}}}}"#,
        );
        let b = doc(
            r#"{"paths":{"/y":{"get":{"responses":{"200":{"description":"ok"}}}},
                "/config":{"get":{}}}}"#,
        );

        let (merged, report) = Pipeline::default().run(a, [&b]).unwrap();

        assert_eq!(report.path_count, 2);
        assert_eq!(report.pruned.removed, vec!["/config".to_string()]);
        assert_eq!(report.nullable_count, 1);
        assert_eq!(report.conversions.len(), 1);
        assert!(report.snapshots.is_empty());

        let item = merged
            .paths()
            .and_then(|p| p.get_map("/x"))
            .and_then(|e| e.get_map("put"))
            .and_then(|o| o.get_map("requestBody"))
            .and_then(|r| r.get_map("content"))
            .and_then(|c| c.get_map("application/json"))
            .and_then(|j| j.get_map("schema"))
            .and_then(|s| s.get_map("properties"))
            .and_then(|p| p.get("item"))
            .unwrap();
        assert_eq!(
            item,
            &from_json(
                r#"{"type":"object","properties":{},"additionalProperties":
                    {"type":"object","properties":{"n":{"type":"integer","nullable":true}}}}"#
            )
            .unwrap()
        );
        assert!(merged.paths().unwrap().has("/y"));
    }

    fn keyed_body(property: &str) -> String {
        format!(
            r#"{{"put":{{"requestBody":{{"content":{{"application/json":{{"schema":{{
                "type":"object","properties":{{"{}":{{"type":"object","properties":{{
                    "k":{{"type":"string"}}}}}}}}}}}}}}}}}}}}"#,
            property
        )
    }

    #[test]
    fn test_overlapping_request_bodies_merged_then_converted() {
        let a = doc(&format!(r#"{{"paths":{{"/x":{}}}}}"#, keyed_body("p")));
        let y = r#"{"get":{"responses":{"200":{"description":"ok"}}}}"#;
        let b = doc(&format!(r#"{{"paths":{{"/x":{},"/y":{}}}}}"#, keyed_body("q"), y));

        let (merged, report) = Pipeline::default().run(a, [&b]).unwrap();

        let converted: Vec<&str> = report.conversions.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(converted, vec!["p", "q"]);

        let properties = merged
            .paths()
            .and_then(|p| p.get_map("/x"))
            .and_then(|e| e.get_map("put"))
            .and_then(|o| o.get_map("requestBody"))
            .and_then(|r| r.get_map("content"))
            .and_then(|c| c.get_map("application/json"))
            .and_then(|j| j.get_map("schema"))
            .and_then(|s| s.get_map("properties"))
            .unwrap();
        let expected = from_json(
            r#"{"type":"object","properties":{},"additionalProperties":{"type":"string"}}"#,
        )
        .unwrap();
        assert_eq!(properties.get("p"), Some(&expected));
        assert_eq!(properties.get("q"), Some(&expected));

        assert_eq!(
            merged.paths().and_then(|p| p.get("/y")),
            Some(&from_json(y).unwrap())
        );
    }

    #[test]
    fn test_pruning_absent_endpoint_keeps_all() {
        let paths: Vec<String> = (0..10).map(|i| format!(r#""/e{}":{{"get":{{}}}}"#, i)).collect();
        let base = doc(&format!(r#"{{"paths":{{{}}}}}"#, paths.join(",")));

        let (merged, report) = Pipeline::default().run(base, []).unwrap();
        assert_eq!(merged.path_count(), 10);
        assert!(report.pruned.removed.is_empty());
    }

    #[test]
    fn test_snapshots_recorded_in_order() {
        let base = doc(r#"{"paths":{"/a":{"put":{"parameters":[{"name":"n","in":"query","schema":{"type":"integer"}}]}}}}"#);
        let (_, report) = Pipeline::default()
            .keep_intermediate(true)
            .run(base, [])
            .unwrap();

        let stages: Vec<Stage> = report.snapshots.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec![Stage::Merged, Stage::Pruned, Stage::Nullable]);

        let nullable = &report.snapshots[2].1;
        let schema = nullable
            .paths()
            .and_then(|p| p.get_map("/a"))
            .and_then(|e| e.get_map("put"))
            .and_then(|o| o.get("parameters"))
            .and_then(Value::as_list)
            .and_then(|l| l[0].as_map())
            .and_then(|p| p.get("schema"))
            .unwrap();
        assert_eq!(schema, &from_json(r#"{"type":"integer","nullable":true}"#).unwrap());
    }

    #[test]
    fn test_missing_paths_fails() {
        let err = Pipeline::default()
            .run(doc(r#"{"info":{"title":"t"}}"#), [])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Structure(StructureError::MissingSection { .. })
        ));
    }
}
