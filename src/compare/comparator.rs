//! Classifying request-body fields of two documents by mode.

use super::field::{schema_map, FieldInfo, FieldMode, Mode};
use crate::config::Exclusions;
use crate::document::Document;
use crate::error::StructureError;
use crate::schema::{SchemaNode, SchemaType};
use crate::value::{Map, Value};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Fields keyed by name.
pub type FieldMap = BTreeMap<String, FieldInfo>;

/// Field schemas keyed by name, borrowed from a document.
pub type Fields<'a> = BTreeMap<&'a str, &'a Value>;

const BODY_METHODS: [&str; 2] = ["put", "patch"];

/// FieldComparison is the three-way split of one mapping level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldComparison {
    pub common: FieldMap,
    pub datacenter_only: FieldMap,
    pub campus_only: FieldMap,
}

/// EndpointComparison holds the classified fields of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointComparison {
    pub endpoint: String,
    pub common_fields: FieldMap,
    pub datacenter_only_fields: FieldMap,
    pub campus_only_fields: FieldMap,
}

impl EndpointComparison {
    /// Returns the mode of the endpoint as a whole, or `None` if it has no
    /// fields at all.
    ///
    /// An endpoint with fields exclusive to each side counts as common.
    pub fn endpoint_mode(&self) -> Option<FieldMode> {
        let has_common = !self.common_fields.is_empty();
        let has_dc = !self.datacenter_only_fields.is_empty();
        let has_campus = !self.campus_only_fields.is_empty();

        match (has_common, has_dc, has_campus) {
            (true, _, _) | (false, true, true) => Some(FieldMode::Common),
            (false, true, false) => Some(FieldMode::Only(Mode::Datacenter)),
            (false, false, true) => Some(FieldMode::Only(Mode::Campus)),
            (false, false, false) => None,
        }
    }
}

/// Scope selects the endpoints a comparison covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every endpoint of either document.
    All,
    /// Endpoints present in both documents.
    CommonOnly,
    /// A single endpoint, which must exist in at least one document.
    Endpoint(String),
}

/// EndpointListing splits the endpoint sets of the two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointListing {
    pub datacenter_only: Vec<String>,
    pub campus_only: Vec<String>,
    pub common: Vec<String>,
    pub datacenter_total: usize,
    pub campus_total: usize,
}

/// ComparisonSummary counts endpoints by mode and top-level fields by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub endpoints: usize,
    pub common_endpoints: usize,
    pub datacenter_only_endpoints: usize,
    pub campus_only_endpoints: usize,
    pub common_fields: usize,
    pub datacenter_only_fields: usize,
    pub campus_only_fields: usize,
}

/// ComparisonReport is the result of comparing a set of endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub comparisons: Vec<EndpointComparison>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    pub fn new(comparisons: Vec<EndpointComparison>) -> Self {
        let mut summary = ComparisonSummary {
            endpoints: comparisons.len(),
            ..ComparisonSummary::default()
        };
        for comparison in &comparisons {
            match comparison.endpoint_mode() {
                Some(FieldMode::Common) => summary.common_endpoints += 1,
                Some(FieldMode::Only(Mode::Datacenter)) => summary.datacenter_only_endpoints += 1,
                Some(FieldMode::Only(Mode::Campus)) => summary.campus_only_endpoints += 1,
                None => {}
            }
            summary.common_fields += comparison.common_fields.len();
            summary.datacenter_only_fields += comparison.datacenter_only_fields.len();
            summary.campus_only_fields += comparison.campus_only_fields.len();
        }
        ComparisonReport {
            comparisons,
            summary,
        }
    }
}

/// Comparator compares a datacenter document against a campus document.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    datacenter: &'a Document,
    campus: &'a Document,
    exclusions: &'a Exclusions,
}

impl<'a> Comparator<'a> {
    pub fn new(datacenter: &'a Document, campus: &'a Document, exclusions: &'a Exclusions) -> Self {
        Comparator {
            datacenter,
            campus,
            exclusions,
        }
    }

    fn document(&self, mode: Mode) -> &'a Document {
        match mode {
            Mode::Datacenter => self.datacenter,
            Mode::Campus => self.campus,
        }
    }

    /// Returns the non-excluded endpoints of one side.
    pub fn endpoints(&self, mode: Mode) -> BTreeSet<&'a str> {
        self.document(mode)
            .paths()
            .into_iter()
            .flat_map(Map::keys)
            .map(String::as_str)
            .filter(|endpoint| !self.exclusions.is_excluded_endpoint(endpoint))
            .collect()
    }

    pub fn listing(&self) -> EndpointListing {
        let dc = self.endpoints(Mode::Datacenter);
        let campus = self.endpoints(Mode::Campus);

        EndpointListing {
            datacenter_only: dc.difference(&campus).map(|s| s.to_string()).collect(),
            campus_only: campus.difference(&dc).map(|s| s.to_string()).collect(),
            common: dc.intersection(&campus).map(|s| s.to_string()).collect(),
            datacenter_total: dc.len(),
            campus_total: campus.len(),
        }
    }

    /// Compares every endpoint in `scope`, in lexical order.
    pub fn compare(&self, scope: &Scope) -> Result<ComparisonReport, StructureError> {
        let dc = self.endpoints(Mode::Datacenter);
        let campus = self.endpoints(Mode::Campus);

        let selected: Vec<&str> = match scope {
            Scope::All => dc.union(&campus).copied().collect(),
            Scope::CommonOnly => dc.intersection(&campus).copied().collect(),
            Scope::Endpoint(endpoint) => vec![endpoint.as_str()],
        };

        let comparisons = selected
            .into_iter()
            .map(|endpoint| self.compare_endpoint(endpoint))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(endpoints = comparisons.len(), "compared endpoints");
        Ok(ComparisonReport::new(comparisons))
    }

    /// Compares a single endpoint. One-sided endpoints are classified
    /// wholesale under their side's mode.
    pub fn compare_endpoint(&self, endpoint: &str) -> Result<EndpointComparison, StructureError> {
        let in_dc = self.endpoints(Mode::Datacenter).contains(endpoint);
        let in_campus = self.endpoints(Mode::Campus).contains(endpoint);

        let dc_fields = self.body_fields(Mode::Datacenter, endpoint);
        let campus_fields = self.body_fields(Mode::Campus, endpoint);

        let fields = match (in_dc, in_campus) {
            (true, true) => compare_fields(&dc_fields, &campus_fields, ""),
            (true, false) => FieldComparison {
                datacenter_only: extract_all(&dc_fields, Mode::Datacenter),
                ..FieldComparison::default()
            },
            (false, true) => FieldComparison {
                campus_only: extract_all(&campus_fields, Mode::Campus),
                ..FieldComparison::default()
            },
            (false, false) => return Err(StructureError::unknown_endpoint(endpoint)),
        };

        tracing::debug!(
            endpoint,
            common = fields.common.len(),
            datacenter_only = fields.datacenter_only.len(),
            campus_only = fields.campus_only.len(),
            "compared endpoint"
        );

        Ok(EndpointComparison {
            endpoint: endpoint.to_string(),
            common_fields: fields.common,
            datacenter_only_fields: fields.datacenter_only,
            campus_only_fields: fields.campus_only,
        })
    }

    fn body_fields(&self, mode: Mode, endpoint: &str) -> Fields<'a> {
        self.document(mode)
            .paths()
            .and_then(|paths| paths.get_map(endpoint))
            .map(request_body_fields)
            .unwrap_or_default()
    }
}

/// Collects the fields a write request carries for one path item.
///
/// The body of `put` is used, or of `patch` when there is no `put`. Resource
/// wrappers are looked through: an object property contributes the
/// `properties` of its object `additionalProperties`, then each of its own
/// properties (object ones contribute their `properties` instead).
fn request_body_fields(item: &Map) -> Fields<'_> {
    let mut fields = Fields::new();

    let Some(properties) = BODY_METHODS
        .iter()
        .find_map(|method| item.get_map(method).filter(|op| !op.is_empty()))
        .and_then(|op| op.get_map("requestBody"))
        .and_then(|body| body.get_map("content"))
        .and_then(|content| content.get_map("application/json"))
        .and_then(|json| json.get_map("schema"))
        .and_then(|schema| schema.get_map("properties"))
    else {
        return fields;
    };

    for (resource_key, resource_schema) in properties.iter() {
        let resource = SchemaNode::new(schema_map(resource_schema));
        if resource.schema_type() != SchemaType::Object {
            fields.insert(resource_key, resource_schema);
            continue;
        }

        if let Some(props) = resource
            .additional_properties()
            .filter(|additional| additional.schema_type() == SchemaType::Object)
            .and_then(|additional| additional.properties())
        {
            fields.extend(map_fields(Some(props)));
        }

        for (key, schema) in resource.properties().into_iter().flat_map(Map::iter) {
            let node = SchemaNode::new(schema_map(schema));
            if node.schema_type() == SchemaType::Object {
                fields.extend(map_fields(node.properties()));
            } else {
                fields.insert(key, schema);
            }
        }
    }

    fields
}

fn map_fields(map: Option<&Map>) -> Fields<'_> {
    map.into_iter()
        .flat_map(Map::iter)
        .map(|(k, v)| (k.as_str(), v))
        .collect()
}

fn extract_all(fields: &Fields<'_>, mode: Mode) -> FieldMap {
    fields
        .iter()
        .map(|(name, schema)| {
            (name.to_string(), FieldInfo::extract(name, schema, FieldMode::Only(mode), ""))
        })
        .collect()
}

/// Splits two field sets by name at one mapping level.
///
/// Common fields take the datacenter schema as reference and are compared
/// again one level down; one-sided fields keep their whole subtree under
/// their side's mode.
pub fn compare_fields(dc: &Fields<'_>, campus: &Fields<'_>, parent_path: &str) -> FieldComparison {
    let mut result = FieldComparison::default();

    for (&name, &dc_schema) in dc {
        let Some(&campus_schema) = campus.get(name) else {
            result.datacenter_only.insert(
                name.to_string(),
                FieldInfo::extract(name, dc_schema, FieldMode::Only(Mode::Datacenter), parent_path),
            );
            continue;
        };

        let mut info = FieldInfo::extract(name, dc_schema, FieldMode::Common, parent_path);
        if info.nested_fields.is_some() {
            let dc_node = SchemaNode::new(schema_map(dc_schema));
            let campus_node = SchemaNode::new(schema_map(campus_schema));
            let nested = match dc_node.schema_type() {
                SchemaType::Array => Some((
                    map_fields(dc_node.items().and_then(|items| items.properties())),
                    map_fields(campus_node.items().and_then(|items| items.properties())),
                    format!("{}[]", info.path),
                )),
                SchemaType::Object => Some((
                    map_fields(dc_node.properties()),
                    map_fields(campus_node.properties()),
                    info.path.clone(),
                )),
                SchemaType::String
                | SchemaType::Integer
                | SchemaType::Number
                | SchemaType::Boolean
                | SchemaType::Null
                | SchemaType::Unknown => None,
            };

            if let Some((dc_nested, campus_nested, path)) = nested {
                let split = compare_fields(&dc_nested, &campus_nested, &path);
                let mut all = split.common;
                all.extend(split.datacenter_only);
                all.extend(split.campus_only);
                info.nested_fields = Some(all);
            }
        }
        result.common.insert(name.to_string(), info);
    }

    for (&name, &campus_schema) in campus {
        if !dc.contains_key(name) {
            result.campus_only.insert(
                name.to_string(),
                FieldInfo::extract(name, campus_schema, FieldMode::Only(Mode::Campus), parent_path),
            );
        }
    }

    result
}
