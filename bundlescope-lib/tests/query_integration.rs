//! Integration tests for the query engine over normalized fixture files.

use bundlescope_lib::model::StatsDocument;
use bundlescope_lib::normalize::normalize_file;
use bundlescope_lib::query::{MethodSet, Query, QueryEngine};
use camino::Utf8Path;
use serde_json::json;

const WEBPACK4: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/webpack4.json");
const WEBPACK5: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/webpack5.json");

fn documents() -> Vec<StatsDocument> {
    [WEBPACK5, WEBPACK4]
        .into_iter()
        .map(|path| normalize_file(Utf8Path::new(path), Vec::new()).unwrap())
        .collect()
}

fn engine() -> QueryEngine {
    QueryEngine::new(&documents(), MethodSet::new()).unwrap()
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_files_and_compilations() {
    let engine = engine();

    assert_eq!(engine.query("files.map(f, f.id)", None).unwrap(), json!(["c0ffee01", "4f2b9c1d"]));
    assert_eq!(
        engine.query("compilations.map(c, c.id)", None).unwrap(),
        json!(["c0ffee01", "4f2b9c1d", "9a8b7c6d"])
    );
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_package_queries() {
    let engine = engine();

    let duplicated = engine
        .query("files[0].packages.filter(p, size(p.versions) > 1).map(p, p.name)", None)
        .unwrap();
    assert_eq!(duplicated, json!(["lodash"]));

    let react = engine
        .query("semverSatisfies(files[0].packages.filter(p, p.name == 'react')[0].version, '^18.0.0')", None)
        .unwrap();
    assert_eq!(react, json!(true));
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_sizes_with_helpers() {
    let engine = engine();

    let text = engine
        .query("formatSize(files[0].entrypoints.filter(e, e.name == 'main')[0].size.raw)", None)
        .unwrap();
    assert_eq!(text, json!("19.53 kb"));
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_module_graph_across_compilations() {
    let engine = engine();

    let paths = engine
        .query(
            "graph_getPaths('c0ffee01', '/app/src/index.js', '/app/node_modules/legacy-lib/node_modules/lodash/map.js')",
            None,
        )
        .unwrap();
    assert_eq!(
        paths,
        json!({"paths": [[
            "/app/src/index.js",
            "/app/src/app.js",
            "/app/node_modules/legacy-lib/index.js",
            "/app/node_modules/legacy-lib/node_modules/lodash/map.js"
        ]]})
    );

    let node = engine.query("graph_getNode('9a8b7c6d', '/app/src/worker.js')", None).unwrap();
    assert_eq!(node["name"], json!("./src/worker.js"));
    assert_eq!(node["dependencies"], json!([]));
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_rule_style_query_with_data() {
    let engine = engine();
    let query = Query::new(
        "large-modules",
        Some("Modules above a size threshold".to_string()),
        "files[0].modules.filter(m, m.size.raw > data.limit).map(m, {'type': 'warn', 'message': m.name})",
    )
    .unwrap();

    let result = engine.execute(&query, Some(&json!({"limit": 2900}))).unwrap();
    assert_eq!(
        result,
        json!([
            {"type": "warn", "message": "./node_modules/react/index.js"},
            {"type": "warn", "message": "./node_modules/lodash/map.js"}
        ])
    );
}
