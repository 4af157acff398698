use serde::Serialize;

use heaptag_contracts::{
    HEAPTAG_CATALOG_REPORT_SCHEMA_VERSION, HEAPTAG_CHECK_REPORT_SCHEMA_VERSION,
    HEAPTAG_CLASSIFY_REPORT_SCHEMA_VERSION, HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION,
};

use crate::dispatch::{DispatchEntry, DispatchGap, Op};
use crate::kind::{Boundary, Category, TagId};
use crate::scan::ScanDescriptor;
use crate::standard::StandardRanges;
use crate::tag_space::{Boundaries, KindRange, TagSpace};

#[derive(Debug, Clone, Serialize)]
pub struct KindRow {
    pub tag: TagId,
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservedRow {
    pub tag: TagId,
    pub boundary: Boundary,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedRange {
    pub name: &'static str,
    pub range: KindRange,
    pub kinds: usize,
}

impl NamedRange {
    fn new(name: &'static str, range: KindRange) -> Self {
        Self {
            name,
            range,
            kinds: range.count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub schema_version: &'static str,
    pub include_internal_tags: bool,
    pub boundaries: Boundaries,
    pub kinds: Vec<KindRow>,
    pub reserved: Vec<ReservedRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<NamedRange>,
}

impl CatalogReport {
    pub fn new(
        space: &TagSpace,
        ranges: Option<&StandardRanges>,
        only: Option<Category>,
    ) -> Self {
        let kinds = space
            .kinds()
            .filter(|k| only.map_or(true, |c| k.category == c))
            .map(|k| KindRow {
                tag: k.tag,
                name: k.name.to_string(),
                category: k.category,
            })
            .collect();
        let reserved = (0..space.last().get())
            .map(TagId::new)
            .filter_map(|tag| space.boundary_at(tag).map(|boundary| ReservedRow { tag, boundary }))
            .collect();
        let ranges = ranges
            .map(|r| {
                vec![
                    NamedRange::new("procedure", r.procedure),
                    NamedRange::new("procedure-or-struct", r.procedure_or_struct),
                    NamedRange::new("number", r.number),
                ]
            })
            .unwrap_or_default();
        Self {
            schema_version: HEAPTAG_CATALOG_REPORT_SCHEMA_VERSION,
            include_internal_tags: space.include_internal_tags(),
            boundaries: space.boundaries(),
            kinds,
            reserved,
            ranges,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub schema_version: &'static str,
    pub ok: bool,
    pub tag: TagId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifyReport {
    pub fn new(space: &TagSpace, tag: TagId, category: Result<Category, String>) -> Self {
        let (category, error) = match category {
            Ok(c) => (Some(c), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            schema_version: HEAPTAG_CLASSIFY_REPORT_SCHEMA_VERSION,
            ok: error.is_none(),
            tag,
            name: space.name_of(tag).map(str::to_string),
            category,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub schema_version: &'static str,
    pub ok: bool,
    pub tag: TagId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ops: Vec<Op>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupReport {
    pub fn new(space: &TagSpace, tag: TagId, entry: Result<&DispatchEntry, String>) -> Self {
        let name = space.name_of(tag).map(str::to_string);
        match entry {
            Ok(entry) => Self {
                schema_version: HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION,
                ok: true,
                tag,
                name,
                ops: Op::ALL.into_iter().filter(|op| entry.has(*op)).collect(),
                scan: entry.scan,
                error: None,
            },
            Err(e) => Self {
                schema_version: HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION,
                ok: false,
                tag,
                name,
                ops: Vec::new(),
                scan: None,
                error: Some(e),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_version: &'static str,
    pub ok: bool,
    pub include_internal_tags: bool,
    pub kinds: usize,
    pub boundaries: Boundaries,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gaps: Vec<DispatchGap>,
}

impl CheckReport {
    pub fn new(space: &TagSpace, gaps: Vec<DispatchGap>) -> Self {
        Self {
            schema_version: HEAPTAG_CHECK_REPORT_SCHEMA_VERSION,
            ok: gaps.is_empty(),
            include_internal_tags: space.include_internal_tags(),
            kinds: space.kinds().count(),
            boundaries: space.boundaries(),
            gaps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::standard_space;

    #[test]
    fn catalog_report_lists_reserved_slots_separately() {
        let space = standard_space(false).expect("space");
        let ranges = StandardRanges::resolve(&space).expect("ranges");
        let report = CatalogReport::new(&space, Some(&ranges), None);
        assert_eq!(report.kinds.len(), 139);
        let reserved: Vec<u32> = report.reserved.iter().map(|r| r.tag.get()).collect();
        assert_eq!(reserved, vec![16, 26]);

        let v = serde_json::to_value(&report).expect("json");
        assert_eq!(v["boundaries"]["last_normal"], 141);
        assert_eq!(v["kinds"][4]["name"], "application");
        assert_eq!(v["kinds"][4]["category"], "compiled-syntax-form");
        assert_eq!(v["ranges"][2]["name"], "number");
        assert_eq!(v["ranges"][2]["kinds"], 7);
    }

    #[test]
    fn catalog_report_can_keep_one_category() {
        let space = standard_space(true).expect("space");
        let report = CatalogReport::new(&space, None, Some(Category::InternalOnly));
        assert_eq!(report.kinds.len(), 66);
        assert!(report
            .kinds
            .iter()
            .all(|k| k.category == Category::InternalOnly));
        assert_eq!(report.kinds[0].tag, space.boundaries().last_normal);
    }

    #[test]
    fn classify_report_carries_the_error() {
        let space = standard_space(false).expect("space");
        let report = ClassifyReport::new(&space, TagId::new(9999), Err("unknown-tag".to_string()));
        let v = serde_json::to_value(&report).expect("json");
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"], "unknown-tag");
        assert!(v.get("category").is_none());
    }
}
