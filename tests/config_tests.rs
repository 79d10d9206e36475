//! Static configuration loading tests

use deeplinker::config::{ParamBinding, StaticConfig};
use deeplinker::link::{Document, FieldMappingExtractor, ParamExtractor, sanitize};
use serde_json::json;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[link]
base_url = "https://x.test/l"
branch_key = "key_test_abc"
timeout_secs = 3

[[params.fields]]
key = "channel"
pointer = "/channel"

[[params.data]]
key = "foo"
pointer = "/foo"

[[params.data]]
key = "alias"
pointer = "/alias"

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deeplinker.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = StaticConfig::load(Some(path.to_str().unwrap()));

    assert_eq!(config.link.base_url, "https://x.test/l");
    assert_eq!(config.link.branch_key.as_deref(), Some("key_test_abc"));
    assert_eq!(config.link.timeout_secs, 3);
    assert_eq!(config.link.api_url, "https://api2.branch.io");
    assert_eq!(config.params.fields, vec![ParamBinding::new("channel", "/channel")]);
    assert_eq!(config.params.data.len(), 2);
    assert_eq!(config.logging.format, "json");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = StaticConfig::load(Some(path.to_str().unwrap()));

    assert_eq!(config.link.base_url, "https://example.app.link/open");
    assert!(config.params.data.is_empty());
}

#[test]
fn test_save_to_file_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    StaticConfig::sample().save_to_file(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[link]"));
    assert!(written.contains("base_url"));
}

#[tokio::test]
async fn test_configured_mapping_feeds_long_link_params() {
    let config: StaticConfig = toml::from_str(SAMPLE).unwrap();
    let extractor = FieldMappingExtractor::new(config.params.clone());
    let doc: Document = serde_json::from_value(json!({
        "_id": "d1",
        "channel": "",
        "foo": "bar",
        "alias": "a1"
    }))
    .unwrap();

    let params = sanitize(&extractor.extract(&doc).await.unwrap());

    assert!(!params.contains_key("channel"));
    assert_eq!(params.get("alias"), Some(&json!("a1")));
    assert_eq!(params.data().unwrap().len(), 1);
}
