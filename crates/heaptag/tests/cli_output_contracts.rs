use std::process::{Command, Output};

use heaptag_contracts::{
    ENV_INTERNAL_TAGS, HEAPTAG_CATALOG_REPORT_SCHEMA_VERSION, HEAPTAG_CHECK_REPORT_SCHEMA_VERSION,
    HEAPTAG_CLASSIFY_REPORT_SCHEMA_VERSION, HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION,
};

fn run(args: &[&str], internal_env: Option<&str>) -> Output {
    let bin = env!("CARGO_BIN_EXE_heaptag");
    let mut cmd = Command::new(bin);
    cmd.args(args);
    match internal_env {
        Some(v) => cmd.env(ENV_INTERNAL_TAGS, v),
        None => cmd.env_remove(ENV_INTERNAL_TAGS),
    };
    cmd.output().expect("run heaptag")
}

fn report(out: &Output) -> serde_json::Value {
    serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
        panic!(
            "parse report json: {e}\nstdout={}\nstderr={}",
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        )
    })
}

#[test]
fn cli_catalog_report_is_stable() {
    let out = run(&["catalog"], None);
    assert!(
        out.status.success(),
        "status={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stderr)
    );
    let v = report(&out);
    assert_eq!(
        v.get("schema_version").and_then(|s| s.as_str()),
        Some(HEAPTAG_CATALOG_REPORT_SCHEMA_VERSION)
    );
    assert_eq!(v.get("include_internal_tags").and_then(|b| b.as_bool()), Some(false));
    let b = &v["boundaries"];
    assert_eq!(b["values"].as_u64(), Some(16));
    assert_eq!(b["compiled_values"].as_u64(), Some(26));
    assert_eq!(b["last_normal"].as_u64(), Some(141));
    assert_eq!(b["last"].as_u64(), Some(141));
    assert_eq!(v["kinds"].as_array().map(|a| a.len()), Some(139));
    assert_eq!(v["reserved"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn cli_catalog_filters_by_category() {
    let out = run(&["catalog", "--category", "compiled-syntax-form"], None);
    assert!(out.status.success());
    let v = report(&out);
    let kinds = v["kinds"].as_array().expect("kinds");
    assert_eq!(kinds.len(), 16);
    assert!(kinds
        .iter()
        .all(|k| k["category"].as_str() == Some("compiled-syntax-form")));

    let out = run(&["catalog", "--category", "value"], None);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown category"), "stderr={stderr}");
}

#[test]
fn cli_internal_tags_from_flag_or_env() {
    let flag = report(&run(&["catalog", "--internal-tags"], None));
    assert_eq!(flag["boundaries"]["last"].as_u64(), Some(141 + 66));

    let env = report(&run(&["catalog"], Some("1")));
    assert_eq!(env["boundaries"]["last"].as_u64(), Some(141 + 66));

    let flag_over_bad_env = run(&["catalog", "--internal-tags"], Some("maybe"));
    assert!(
        flag_over_bad_env.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&flag_over_bad_env.stderr)
    );
    assert_eq!(
        report(&flag_over_bad_env)["boundaries"]["last"].as_u64(),
        Some(141 + 66)
    );

    let bad = run(&["catalog"], Some("maybe"));
    assert_eq!(bad.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&bad.stderr);
    assert!(stderr.contains(ENV_INTERNAL_TAGS), "stderr={stderr}");
}

#[test]
fn cli_classify_reports_category_or_unknown_tag() {
    let out = run(&["classify", "44"], None);
    assert!(out.status.success());
    let v = report(&out);
    assert_eq!(
        v.get("schema_version").and_then(|s| s.as_str()),
        Some(HEAPTAG_CLASSIFY_REPORT_SCHEMA_VERSION)
    );
    assert_eq!(v["name"].as_str(), Some("char-string"));
    assert_eq!(v["category"].as_str(), Some("runtime-kind"));

    let out = run(&["classify", "141", "--internal-tags"], None);
    assert!(out.status.success());
    assert_eq!(report(&out)["category"].as_str(), Some("internal-only"));

    let out = run(&["classify", "9999"], None);
    assert_eq!(out.status.code(), Some(1));
    let v = report(&out);
    assert_eq!(v["ok"].as_bool(), Some(false));
    assert!(
        v["error"].as_str().is_some_and(|e| e.starts_with("unknown-tag:")),
        "{v}"
    );
}

#[test]
fn cli_lookup_lists_operations() {
    let out = run(&["lookup", "51"], None);
    assert!(out.status.success());
    let v = report(&out);
    assert_eq!(
        v.get("schema_version").and_then(|s| s.as_str()),
        Some(HEAPTAG_LOOKUP_REPORT_SCHEMA_VERSION)
    );
    assert_eq!(v["name"].as_str(), Some("pair"));
    let ops: Vec<&str> = v["ops"]
        .as_array()
        .expect("ops")
        .iter()
        .filter_map(|o| o.as_str())
        .collect();
    assert_eq!(ops, vec!["describe", "equals_and_hash", "scan"]);
    assert_eq!(v["scan"]["layout"].as_str(), Some("fixed"));

    let out = run(&["lookup", "9999"], None);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_check_passes_for_the_standard_subsystems() {
    for args in [&["check"][..], &["check", "--internal-tags"][..]] {
        let out = run(args, None);
        assert!(out.status.success(), "{args:?}");
        let v = report(&out);
        assert_eq!(
            v.get("schema_version").and_then(|s| s.as_str()),
            Some(HEAPTAG_CHECK_REPORT_SCHEMA_VERSION)
        );
        assert_eq!(v["ok"].as_bool(), Some(true));
        assert!(v.get("gaps").is_none());
    }
}
