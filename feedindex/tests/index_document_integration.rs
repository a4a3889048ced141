//! Integration tests for the package index on a file store.
//!
//! These tests verify the complete index flow against real files:
//! - add/remove round trips through the JSON document
//! - byte-identical rewrites of the same logical state
//! - legacy documents without a symbols node
//! - empty-document policy and apply-operations batches
//!
//! Run with: `cargo test --test index_document_integration`

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use feedindex::index::{PersistMetrics, TracingObserver};
use feedindex::{
    FileIndexStore, IndexConfig, IndexDocument, IndexError, IndexOperations, PackageIdentity,
    PackageSets, PackageVersion,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("feedindex=debug")
        .with_test_writer()
        .try_init();
}

fn identity(id: &str, version: &str) -> PackageIdentity {
    PackageIdentity::new(id, PackageVersion::parse(version).unwrap())
}

fn v(s: &str) -> PackageVersion {
    PackageVersion::parse(s).unwrap()
}

fn open(path: &Path) -> IndexDocument {
    IndexDocument::new(Arc::new(FileIndexStore::new(path))).with_observer(Arc::new(TracingObserver))
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_publish_session_roundtrip() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    let doc = open(&path);

    assert!(doc.is_empty().await.unwrap());
    assert!(!path.exists());

    doc.add_packages(vec![
        identity("Newtonsoft.Json", "13.0.1"),
        identity("Newtonsoft.Json", "12.0.3"),
        identity("Serilog", "3.0.0-beta.1"),
    ])
    .await
    .unwrap();
    doc.add_symbols_package(identity("Serilog", "3.0.0-beta.1"))
        .await
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        r#"{
  "packages": {
    "Newtonsoft.Json": [
      "13.0.1",
      "12.0.3"
    ],
    "Serilog": [
      "3.0.0-beta.1"
    ]
  },
  "symbols": {
    "Serilog": [
      "3.0.0-beta.1"
    ]
  }
}
"#
    );

    // A fresh document on the same file sees everything
    let reopened = open(&path);
    assert_eq!(
        reopened.get_package_versions("newtonsoft.json").await.unwrap(),
        vec![v("12.0.3"), v("13.0.1")]
    );
    assert!(reopened
        .symbols_exists("SERILOG", &v("3.0.0-beta.1"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_scenario_add_between_versions() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    fs::write(
        &path,
        r#"{ "packages": { "A": ["1.0.0", "2.0.0"], "B": ["1.0.0"] } }"#,
    )
    .unwrap();

    open(&path).add_package(identity("A", "1.5.0")).await.unwrap();

    let json = read_json(&path);
    assert_eq!(
        json["packages"]["A"],
        serde_json::json!(["2.0.0", "1.5.0", "1.0.0"])
    );
    assert_eq!(json["symbols"], serde_json::json!({}));
}

#[tokio::test]
async fn test_scenario_remove_absent_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    let original = r#"{"packages":{"A":["1.0.0"]}}"#;
    fs::write(&path, original).unwrap();

    let metrics = Arc::new(PersistMetrics::new());
    let doc = IndexDocument::new(Arc::new(FileIndexStore::new(&path))).with_observer(metrics.clone());

    assert!(!doc.remove_package(&identity("A", "9.9.9")).await.unwrap());

    assert_eq!(metrics.snapshot().started, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[tokio::test]
async fn test_repeated_writes_are_byte_identical() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first.json");
    let second = temp.path().join("second.json");

    open(&first)
        .add_packages(vec![
            identity("b", "1.0.0"),
            identity("A", "1.0.0"),
            identity("A", "2.0.0"),
        ])
        .await
        .unwrap();

    let doc = open(&second);
    doc.add_package(identity("A", "2.0.0")).await.unwrap();
    doc.add_package(identity("b", "1.0.0")).await.unwrap();
    doc.add_package(identity("A", "1.0.0")).await.unwrap();

    let before = fs::read(&second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), before);

    // Re-adding an existing identity rewrites the same bytes
    doc.add_package(identity("a", "1.0.0")).await.unwrap();
    assert_eq!(fs::read(&second).unwrap(), before);
}

#[tokio::test]
async fn test_legacy_document_gains_symbols_node() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    fs::write(&path, r#"{ "packages": { "A": ["1.0.0"] } }"#).unwrap();

    let doc = open(&path);
    assert!(doc.get_symbols_packages().await.unwrap().is_empty());

    doc.add_symbols_package(identity("A", "1.0.0")).await.unwrap();

    let json = read_json(&path);
    assert_eq!(json["packages"]["A"], serde_json::json!(["1.0.0"]));
    assert_eq!(json["symbols"]["A"], serde_json::json!(["1.0.0"]));
}

#[tokio::test]
async fn test_missing_packages_node_is_fatal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    let original = r#"{ "symbols": { "A": ["1.0.0"] } }"#;
    fs::write(&path, original).unwrap();

    let doc = open(&path);
    let err = doc.add_package(identity("A", "1.0.0")).await.unwrap_err();

    assert!(matches!(err, IndexError::DataFormat(_)));
    // The unusable document is not reset
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[tokio::test]
async fn test_invalid_version_is_fatal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    fs::write(&path, r#"{ "packages": { "A": ["one"] } }"#).unwrap();

    let err = open(&path).get_packages().await.unwrap_err();
    assert!(matches!(err, IndexError::InvalidVersion { .. }));
}

#[tokio::test]
async fn test_empty_index_removed_when_configured() {
    let temp = TempDir::new().unwrap();
    let config = IndexConfig::new(temp.path().join("packageindex.json")).with_persist_when_empty(false);
    let doc = config.open(CancellationToken::new());

    doc.add_package(identity("A", "1.0.0")).await.unwrap();
    assert!(config.index_path.exists());

    doc.remove_package(&identity("a", "1.0.0")).await.unwrap();
    assert!(!config.index_path.exists());
    assert!(doc.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_empty_index_kept_by_default() {
    let temp = TempDir::new().unwrap();
    let config = IndexConfig::new(temp.path().join("packageindex.json"));
    let doc = config.open(CancellationToken::new());

    doc.create(&PackageSets::new()).await.unwrap();

    assert_eq!(
        read_json(&config.index_path),
        serde_json::json!({ "packages": {}, "symbols": {} })
    );
}

#[tokio::test]
async fn test_apply_operations_from_diff() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    let doc = open(&path);

    doc.add_packages(vec![identity("A", "1.0.0"), identity("B", "1.0.0")])
        .await
        .unwrap();

    let current = doc.load().await.unwrap();
    let mut desired = current.clone();
    desired.packages.remove(&identity("B", "1.0.0"));
    desired.packages.insert(identity("C", "2.0.0"));
    desired.symbols.insert(identity("C", "2.0.0"));

    doc.apply_operations(&IndexOperations::from_diff(&current, &desired))
        .await
        .unwrap();

    assert_eq!(doc.load().await.unwrap(), desired);
}

#[tokio::test]
async fn test_cancellation_stops_before_write() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("packageindex.json");
    let token = CancellationToken::new();
    let doc = open(&path).with_cancellation(token.clone());

    token.cancel();

    let err = doc.add_package(identity("A", "1.0.0")).await.unwrap_err();
    assert!(matches!(err, IndexError::Cancelled));
    assert!(!path.exists());
}
