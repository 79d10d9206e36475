//! 文档 → 链接参数
//!
//! 提取逻辑由调用方提供，可以是同步闭包、异步闭包，
//! 或由配置驱动的字段映射（[`FieldMappingExtractor`]）。

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use super::document::Document;
use super::params::LinkParams;
use crate::config::ParamsConfig;
use crate::errors::Result;

/// 参数提取 trait
#[async_trait]
pub trait ParamExtractor: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<LinkParams>;
}

/// 同步闭包提取器
pub struct FnExtractor<F> {
    f: F,
}

impl<F> FnExtractor<F>
where
    F: Fn(&Document) -> Result<LinkParams> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ParamExtractor for FnExtractor<F>
where
    F: Fn(&Document) -> Result<LinkParams> + Send + Sync,
{
    async fn extract(&self, document: &Document) -> Result<LinkParams> {
        (self.f)(document)
    }
}

/// 异步闭包提取器，闭包拿到文档的副本
pub struct AsyncFnExtractor<F> {
    f: F,
}

impl<F, Fut> AsyncFnExtractor<F>
where
    F: Fn(Document) -> Fut + Send + Sync,
    Fut: Future<Output = Result<LinkParams>> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ParamExtractor for AsyncFnExtractor<F>
where
    F: Fn(Document) -> Fut + Send + Sync,
    Fut: Future<Output = Result<LinkParams>> + Send,
{
    async fn extract(&self, document: &Document) -> Result<LinkParams> {
        (self.f)(document.clone()).await
    }
}

/// 按配置的 JSON Pointer 从文档中取值
///
/// 找不到的顶层字段写入 `null`，交给清洗阶段删除；
/// `data` 中找不到的字段直接跳过，不进入查询串。
pub struct FieldMappingExtractor {
    config: ParamsConfig,
}

impl FieldMappingExtractor {
    pub fn new(config: ParamsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ParamExtractor for FieldMappingExtractor {
    async fn extract(&self, document: &Document) -> Result<LinkParams> {
        let mut params = LinkParams::new();
        for binding in &self.config.fields {
            let value = document.pointer(&binding.pointer).cloned();
            params.insert(binding.key.clone(), value.unwrap_or(Value::Null));
        }
        for binding in &self.config.data {
            if let Some(value) = document.pointer(&binding.pointer) {
                params.insert_data(binding.key.clone(), value.clone());
            }
        }
        trace!(
            "Extracted {} link params for document {:?}",
            params.as_map().len(),
            document.identity()
        );
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamBinding;
    use crate::errors::DeepLinkError;
    use serde_json::json;

    #[tokio::test]
    async fn test_field_mapping_extractor() {
        let extractor = FieldMappingExtractor::new(ParamsConfig {
            fields: vec![ParamBinding::new("feature", "/feature")],
            data: vec![
                ParamBinding::new("slug", "/slug/current"),
                ParamBinding::new("alias", "/alias"),
            ],
        });
        let doc = Document::new("d1")
            .with_field("slug", json!({"current": "spring-sale"}))
            .with_field("feature", "marketing");

        let params = extractor.extract(&doc).await.unwrap();

        assert_eq!(params.get("feature"), Some(&json!("marketing")));
        let data = params.data().unwrap();
        assert_eq!(data.get("slug"), Some(&json!("spring-sale")));
        assert!(!data.contains_key("alias"));
    }

    #[tokio::test]
    async fn test_fn_extractor_propagates_errors() {
        let extractor = FnExtractor::new(|_doc: &Document| {
            Err(DeepLinkError::extraction("slug is required"))
        });
        let err = extractor.extract(&Document::new("d1")).await.unwrap_err();
        assert_eq!(err, DeepLinkError::extraction("slug is required"));
    }

    #[tokio::test]
    async fn test_async_fn_extractor() {
        let extractor = AsyncFnExtractor::new(|doc: Document| async move {
            Ok(LinkParams::new().with_data("id", doc.id.unwrap_or_default()))
        });
        let params = extractor.extract(&Document::new("d9")).await.unwrap();
        assert_eq!(params.data().unwrap().get("id"), Some(&json!("d9")));
    }
}
