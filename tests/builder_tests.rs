//! LinkBuilder tests
//!
//! Long/short link building through the public API, with a mock remote SDK.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use deeplinker::errors::{DeepLinkError, Result};
use deeplinker::link::{Document, FnExtractor, LinkBuilder, LinkMode, LinkParams};
use deeplinker::sdk::{InitOptions, RemoteLinkSdk, SdkLifecycle};
use serde_json::json;

// =============================================================================
// Test Setup
// =============================================================================

/// Mock SDK that records the params it receives
#[derive(Default)]
struct MockSdk {
    received: Mutex<Vec<LinkParams>>,
    responses: Mutex<VecDeque<Result<String>>>,
}

impl MockSdk {
    fn with_responses(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        })
    }
}

#[async_trait]
impl RemoteLinkSdk for MockSdk {
    async fn initialize(&self, _key: &str, _options: &InitOptions) -> Result<()> {
        Ok(())
    }

    async fn generate_short_link(&self, params: &LinkParams) -> Result<String> {
        self.received.lock().unwrap().push(params.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("https://x.app.link/default".to_string()))
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

fn scenario_extractor() -> FnExtractor<impl Fn(&Document) -> Result<LinkParams> + Send + Sync> {
    FnExtractor::new(|_doc: &Document| {
        Ok(serde_json::from_value(json!({
            "channel": "",
            "feature": null,
            "data": {"foo": "bar", "alias": "a1"}
        }))?)
    })
}

async fn ready_builder(sdk: Arc<MockSdk>, base_url: &str) -> LinkBuilder {
    let lifecycle = Arc::new(SdkLifecycle::new(sdk));
    lifecycle.initialize(Some("key_test_123")).await.unwrap();
    LinkBuilder::new(base_url, lifecycle)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_long_link_scenario() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk.clone(), "https://x.test/l").await;
    let extractor = scenario_extractor();

    let link = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Long)
        .await
        .unwrap();

    // 提升到顶层的 alias 不进入查询串
    assert_eq!(link.as_deref(), Some("https://x.test/l?foo=bar"));
    assert!(sdk.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_long_link_is_deterministic() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk, "https://x.test/l").await;
    let extractor = FnExtractor::new(|doc: &Document| {
        Ok(LinkParams::new()
            .with_data("id", doc.id.clone().unwrap_or_default())
            .with_data("title", "Spring & Summer")
            .with_data("page", 2))
    });
    let doc = Document::new("d1");

    let first = builder.build(&doc, Some(&extractor), LinkMode::Long).await.unwrap();
    let second = builder.build(&doc, Some(&extractor), LinkMode::Long).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.as_deref(),
        Some("https://x.test/l?id=d1&title=Spring+%26+Summer&page=2")
    );
}

#[tokio::test]
async fn test_short_link_delegates_sanitized_params() {
    let sdk = MockSdk::with_responses(vec![Ok("https://x.app.link/abc".to_string())]);
    let builder = ready_builder(sdk.clone(), "https://x.test/l").await;
    let extractor = scenario_extractor();

    let link = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Short)
        .await
        .unwrap();

    assert_eq!(link.as_deref(), Some("https://x.app.link/abc"));
    let received = sdk.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let expected: LinkParams =
        serde_json::from_value(json!({"data": {"foo": "bar"}, "alias": "a1"})).unwrap();
    assert_eq!(received[0], expected);
}

#[tokio::test]
async fn test_short_link_failure_is_remote_link_error() {
    let sdk = MockSdk::with_responses(vec![Err(DeepLinkError::remote_link("quota exceeded"))]);
    let builder = ready_builder(sdk, "https://x.test/l").await;
    let extractor = scenario_extractor();

    let err = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Short)
        .await
        .unwrap_err();

    assert_eq!(err, DeepLinkError::remote_link("quota exceeded"));
}

#[tokio::test]
async fn test_short_link_requires_initialized_sdk() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = LinkBuilder::new("https://x.test/l", Arc::new(SdkLifecycle::new(sdk.clone())));
    let extractor = scenario_extractor();

    let err = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Short)
        .await
        .unwrap_err();

    assert!(matches!(err, DeepLinkError::Initialization(_)));
    assert!(sdk.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_document_without_id_yields_empty_string() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk.clone(), "https://x.test/l").await;
    let extractor = scenario_extractor();

    for mode in [LinkMode::Short, LinkMode::Long] {
        let link = builder
            .build(&Document::default(), Some(&extractor), mode)
            .await
            .unwrap();
        assert_eq!(link.as_deref(), Some(""));
    }
    assert!(sdk.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_extractor_yields_none() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk, "https://x.test/l").await;

    for mode in [LinkMode::Short, LinkMode::Long] {
        let link = builder.build(&Document::new("d1"), None, mode).await.unwrap();
        assert_eq!(link, None);
    }
}

#[tokio::test]
async fn test_extraction_error_propagates() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk, "https://x.test/l").await;
    let extractor =
        FnExtractor::new(|_doc: &Document| Err(DeepLinkError::extraction("slug missing")));

    let err = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Long)
        .await
        .unwrap_err();

    assert_eq!(err, DeepLinkError::extraction("slug missing"));
}

#[tokio::test]
async fn test_long_link_keeps_blank_data_values() {
    let sdk = MockSdk::with_responses(vec![]);
    let builder = ready_builder(sdk, "https://x.test/l").await;
    let extractor = FnExtractor::new(|_doc: &Document| {
        Ok(LinkParams::new()
            .with("channel", "")
            .with_data("ref", "")
            .with_data("slug", "x"))
    });

    let link = builder
        .build(&Document::new("d1"), Some(&extractor), LinkMode::Long)
        .await
        .unwrap();

    assert_eq!(link.as_deref(), Some("https://x.test/l?ref=&slug=x"));
}
