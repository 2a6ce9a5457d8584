//! Per-resource field mode lookup built from a comparison report.

use super::comparator::{ComparisonReport, EndpointComparison, FieldMap};
use super::field::{FieldMode, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// LookupMode says which modes a field applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    Both,
    Datacenter,
    Campus,
}

impl From<FieldMode> for LookupMode {
    fn from(mode: FieldMode) -> Self {
        match mode {
            FieldMode::Common => LookupMode::Both,
            FieldMode::Only(Mode::Datacenter) => LookupMode::Datacenter,
            FieldMode::Only(Mode::Campus) => LookupMode::Campus,
        }
    }
}

impl LookupMode {
    pub fn applies_to(&self, mode: Mode) -> bool {
        match self {
            LookupMode::Both => true,
            LookupMode::Datacenter => mode == Mode::Datacenter,
            LookupMode::Campus => mode == Mode::Campus,
        }
    }
}

/// LookupTable maps resource names to dotted field names and their modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    pub resources: BTreeMap<String, BTreeMap<String, LookupMode>>,
}

impl LookupTable {
    pub fn from_report(report: &ComparisonReport) -> Self {
        let mut table = LookupTable::default();
        for comparison in &report.comparisons {
            table.add(comparison);
        }
        table
    }

    fn add(&mut self, comparison: &EndpointComparison) {
        let fields = self
            .resources
            .entry(resource_name(&comparison.endpoint))
            .or_default();
        add_fields(fields, &comparison.common_fields, "");
        add_fields(fields, &comparison.datacenter_only_fields, "");
        add_fields(fields, &comparison.campus_only_fields, "");
    }

    /// Returns whether `field` of `resource` should be populated in `mode`.
    /// Unknown resources and fields apply to every mode.
    pub fn applies_to(&self, resource: &str, field: &str, mode: Mode) -> bool {
        self.resources
            .get(resource)
            .and_then(|fields| fields.get(field))
            .map_or(true, |lookup| lookup.applies_to(mode))
    }
}

/// Derives the resource name of an endpoint: `/vlan-groups/` becomes
/// `vlan_groups`.
pub fn resource_name(endpoint: &str) -> String {
    endpoint.trim_matches('/').replace('-', "_")
}

fn add_fields(out: &mut BTreeMap<String, LookupMode>, fields: &FieldMap, prefix: &str) {
    for (name, info) in fields {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        if let Some(nested) = &info.nested_fields {
            add_fields(out, nested, &key);
        }
        out.insert(key, info.mode.into());
    }
}
