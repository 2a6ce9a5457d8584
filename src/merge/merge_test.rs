//! Document-level merge scenarios.

#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::merge::merge_documents;
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    struct MergeCase {
        name: &'static str,
        base: &'static str,
        overlay: &'static str,
        out: &'static str,
    }

    fn run_merge_cases(cases: Vec<MergeCase>) {
        for case in cases {
            let mut base = Document::from_json(case.base)
                .unwrap_or_else(|e| panic!("bad base for {}: {}", case.name, e));
            let overlay = Document::from_json(case.overlay)
                .unwrap_or_else(|e| panic!("bad overlay for {}: {}", case.name, e));
            let expected = Document::from_json(case.out)
                .unwrap_or_else(|e| panic!("bad expectation for {}: {}", case.name, e));

            merge_documents(&mut base, &overlay);
            assert_eq!(base, expected, "merge result mismatch for {}", case.name);
        }
    }

    fn operation<'a>(doc: &'a Document, endpoint: &str, method: &str) -> &'a crate::value::Map {
        doc.paths()
            .and_then(|p| p.get_map(endpoint))
            .and_then(|e| e.get_map(method))
            .unwrap_or_else(|| panic!("no {} {}", method, endpoint))
    }

    #[test]
    fn test_parameter_identity_survives_document_merge() {
        let mut base = Document::from_json(
            r#"{"paths":{"/gateways":{"get":{"parameters":[{"name":"id","in":"query"}]}}}}"#,
        )
        .unwrap();
        let overlay = Document::from_json(
            r#"{"paths":{"/gateways":{"get":{"parameters":[{"name":"id","in":"query"},{"name":"id","in":"path"}]}}}}"#,
        )
        .unwrap();

        merge_documents(&mut base, &overlay);

        let params = operation(&base, "/gateways", "get").get("parameters").unwrap();
        assert_eq!(params.as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_operation_merge_cases() {
        run_merge_cases(vec![
            MergeCase {
                name: "method only in overlay is copied",
                base: r#"{"paths":{"/a":{"get":{"operationId":"getA"}}}}"#,
                overlay: r#"{"paths":{"/a":{"patch":{"operationId":"patchA"}}}}"#,
                out: r#"{"paths":{"/a":{"get":{"operationId":"getA"},"patch":{"operationId":"patchA"}}}}"#,
            },
            MergeCase {
                name: "request body properties union",
                base: r#"{"paths":{"/a":{"put":{"requestBody":{"content":{"application/json":{"schema":
                        {"properties":{"p":{"type":"string"}}}}}}}}}}"#,
                overlay: r#"{"paths":{"/a":{"put":{"requestBody":{"content":{"application/json":{"schema":
                        {"properties":{"q":{"type":"integer"}}}}}}}}}}"#,
                out: r#"{"paths":{"/a":{"put":{"requestBody":{"content":{"application/json":{"schema":
                        {"properties":{"p":{"type":"string"},"q":{"type":"integer"}}}}}}}}}}"#,
            },
            MergeCase {
                name: "security requirements dedup",
                base: r#"{"paths":{"/a":{"get":{"security":[{"bearer":[]}]}}}}"#,
                overlay: r#"{"paths":{"/a":{"get":{"security":[{"bearer":[]},{"basic":[]}]}}}}"#,
                out: r#"{"paths":{"/a":{"get":{"security":[{"bearer":[]},{"basic":[]}]}}}}"#,
            },
            MergeCase {
                name: "security copied when base has none",
                base: r#"{"paths":{"/a":{"get":{}}}}"#,
                overlay: r#"{"paths":{"/a":{"get":{"security":[{"bearer":[]}]}}}}"#,
                out: r#"{"paths":{"/a":{"get":{"security":[{"bearer":[]}]}}}}"#,
            },
            MergeCase {
                name: "operation tags keep order",
                base: r#"{"paths":{"/a":{"get":{"tags":["switchpoints","gateways"]}}}}"#,
                overlay: r#"{"paths":{"/a":{"get":{"tags":["acls","gateways"]}}}}"#,
                out: r#"{"paths":{"/a":{"get":{"tags":["switchpoints","gateways","acls"]}}}}"#,
            },
            MergeCase {
                name: "enum lists nested in schemas are sorted unions",
                base: r#"{"paths":{"/a":{"get":{"responses":{"200":{"schema":{"enum":["z","a"]}}}}}}}"#,
                overlay: r#"{"paths":{"/a":{"get":{"responses":{"200":{"schema":{"enum":["m"]}}}}}}}"#,
                out: r#"{"paths":{"/a":{"get":{"responses":{"200":{"schema":{"enum":["a","m","z"]}}}}}}}"#,
            },
        ]);
    }

    #[test]
    fn test_merge_is_deterministic_regardless_of_key_order() {
        let overlay_a = Document::from_json(
            r#"{"paths":{"/b":{"get":{}},"/a":{"put":{"tags":["x"]}}},"components":{"schemas":{"S":{"type":"object"}}}}"#,
        )
        .unwrap();
        let overlay_b = Document::from_json(
            r#"{"components":{"schemas":{"S":{"type":"object"}}},"paths":{"/a":{"put":{"tags":["x"]}},"/b":{"get":{}}}}"#,
        )
        .unwrap();

        let mut left = Document::from_json(r#"{"paths":{"/a":{"put":{"tags":["y"]}}}}"#).unwrap();
        let mut right = left.clone();
        merge_documents(&mut left, &overlay_a);
        merge_documents(&mut right, &overlay_b);

        assert_eq!(left, right);
        assert_eq!(
            operation(&left, "/a", "put").get("tags"),
            Some(&from_json(r#"["y","x"]"#).unwrap())
        );
    }

    #[test]
    fn test_overlay_paths_of_wrong_kind_replace_base() {
        let mut base = Document::from_json(r#"{"paths":{"/a":{}}}"#).unwrap();
        let overlay = Document::from_json(r#"{"paths":[]}"#).unwrap();
        merge_documents(&mut base, &overlay);
        assert_eq!(base.root().get("paths"), Some(&Value::List(vec![])));
    }
}
