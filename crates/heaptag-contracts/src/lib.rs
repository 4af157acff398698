//! Shared, version-pinned identifiers.
//!
//! These constants are the single source of truth for schema/version strings that
//! appear in machine-readable output, and for the environment variables the
//! object model reads at startup.

pub const HEAPTAG_CATALOG_REPORT_SCHEMA_VERSION: &str = "heaptag.catalog.report@0.1.0";
pub const HEAPTAG_CLASSIFY_REPORT_SCHEMA_VERSION: &str = "heaptag.classify.report@0.1.0";
pub const HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION: &str = "heaptag.lookup.report@0.1.0";
pub const HEAPTAG_CHECK_REPORT_SCHEMA_VERSION: &str = "heaptag.check.report@0.1.0";

pub const ENV_INTERNAL_TAGS: &str = "HEAPTAG_INTERNAL_TAGS";
