//! Integration tests for stats normalization over complete fixture files.

use bundlescope_lib::model::StatsDocument;
use bundlescope_lib::normalize::{RawShapeVersion, load_files, normalize_file};
use camino::{Utf8Path, Utf8PathBuf};

const WEBPACK4: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/webpack4.json");
const WEBPACK5: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/webpack5.json");
const WEBPACK5_NEXT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/webpack5-next.json");

fn load(path: &str) -> StatsDocument {
    normalize_file(Utf8Path::new(path), Vec::new()).unwrap()
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_webpack4_layout() {
    let doc = load(WEBPACK4);

    assert_eq!(doc.shape(), RawShapeVersion::Webpack4);
    assert_eq!(doc.id(), "4f2b9c1d");
    assert_eq!(doc.bundler_version(), Some("4.46.0"));
    assert_eq!(doc.modules().len(), 4);

    // modules are keyed by identifier; numeric ids remain usable as aliases in reasons
    let util = doc.module("/app/src/util.js").unwrap();
    assert_eq!(util.dependents, vec!["/app/node_modules/babel-loader/lib/index.js!/app/src/index.js".to_string()]);
    assert_eq!(util.dependencies, vec!["/app/node_modules/lodash/map.js".to_string()]);

    let index = doc.module("/app/node_modules/babel-loader/lib/index.js!/app/src/index.js").unwrap();
    assert_eq!(index.resource.as_deref(), Some("./src/index.js"));
    assert_eq!(index.dependencies.len(), 2);

    let entry = doc.entrypoint("main").unwrap();
    assert_eq!(entry.assets, vec!["main.js".to_string()]);
    assert_eq!(entry.size.raw, 6600);

    let lazy = doc.chunk("1").unwrap();
    assert_eq!(lazy.parents, vec!["0".to_string()]);
    assert_eq!(lazy.modules, vec!["/app/src/lazy.js".to_string()]);
    assert!(!lazy.initial);

    let lodash = doc.package("lodash").unwrap();
    assert_eq!(lodash.instances.len(), 1);
    assert!(lodash.version.is_none());
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_webpack4_child_compilations() {
    let doc = load(WEBPACK4);

    assert_eq!(doc.children().len(), 1);
    let worker = &doc.children()[0];
    assert_eq!(worker.id(), "9a8b7c6d");
    assert_eq!(worker.name(), Some("worker"));
    assert_eq!(worker.file(), doc.file());

    let ids: Vec<&str> = doc.compilations().iter().map(|c| c.id()).collect();
    assert_eq!(ids, ["4f2b9c1d", "9a8b7c6d"]);
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_webpack5_layout_and_extensions() {
    let doc = load(WEBPACK5);

    assert_eq!(doc.shape(), RawShapeVersion::Webpack5);
    assert_eq!(doc.context(), Some("/app"));
    assert_eq!(doc.modules().len(), 7);

    let app = doc.module("/app/src/app.js").unwrap();
    assert_eq!(app.resource.as_deref(), Some("./src/app.js"));
    assert_eq!(app.module_type.as_deref(), Some("javascript/auto"));
    assert_eq!(app.size.raw, 2500);
    assert_eq!(app.size.get(Some("gzip")), Some(833));
    assert_eq!(app.dependencies.len(), 4);

    let main = doc.chunk("main").unwrap();
    assert_eq!(main.modules.len(), 6);
    assert_eq!(main.size.raw, 17_700);
    assert_eq!(main.children, vec!["lazy".to_string()]);

    let entry = doc.entrypoint("main").unwrap();
    assert_eq!(entry.size.raw, 20_000);
    assert_eq!(entry.size.get(Some("gzip")), Some(6000));
    assert_eq!(entry.size.get(Some("brotli")), None);
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_webpack5_packages() {
    let doc = load(WEBPACK5);

    let react = doc.package("react").unwrap();
    assert_eq!(react.version.as_deref(), Some("18.2.0"));

    let lodash = doc.package("lodash").unwrap();
    assert_eq!(lodash.instances.len(), 2);
    assert_eq!(lodash.version.as_deref(), Some("4.17.21"));
    assert_eq!(lodash.versions, vec!["3.10.1".to_string(), "4.17.21".to_string()]);

    let nested = lodash
        .instances
        .iter()
        .find(|instance| instance.path == "./node_modules/legacy-lib/node_modules/lodash")
        .unwrap();
    assert_eq!(nested.version.as_deref(), Some("3.10.1"));
    assert_eq!(nested.modules, vec!["/app/node_modules/legacy-lib/node_modules/lodash/map.js".to_string()]);

    let module = doc.module("/app/node_modules/react/index.js").unwrap();
    assert_eq!(doc.module_package(module).map(|p| p.name.as_str()), Some("react"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_load_files_in_input_order() {
    let paths = [Utf8PathBuf::from(WEBPACK5_NEXT), Utf8PathBuf::from(WEBPACK4), Utf8PathBuf::from(WEBPACK5)];
    let docs: Vec<StatsDocument> = load_files(&paths, &[]).await.into_iter().map(Result::unwrap).collect();

    let ids: Vec<&str> = docs.iter().map(StatsDocument::id).collect();
    assert_eq!(ids, ["c0ffee02", "4f2b9c1d", "c0ffee01"]);
}
