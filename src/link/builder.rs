//! 链接构建
//!
//! 文档 → 参数 → 清洗 → 按模式生成链接：
//! - `Short`：交给远程 SDK 生成短链接
//! - `Long`：把 `data` 序列化为查询串拼在 base URL 后面

use std::sync::Arc;

use serde_json::{Map, Value};
use strum::{AsRefStr, Display};
use tracing::{debug, trace};
use url::form_urlencoded;

use super::document::Document;
use super::extractor::ParamExtractor;
use super::params::{LinkParams, sanitize};
use crate::errors::{DeepLinkError, Result};
use crate::sdk::SdkLifecycle;

/// 链接模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum LinkMode {
    Short,
    Long,
}

impl LinkMode {
    pub fn from_shorten(shorten: bool) -> Self {
        if shorten { Self::Short } else { Self::Long }
    }

    pub fn is_short(self) -> bool {
        matches!(self, Self::Short)
    }
}

pub struct LinkBuilder {
    base_url: String,
    lifecycle: Arc<SdkLifecycle>,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>, lifecycle: Arc<SdkLifecycle>) -> Self {
        Self {
            base_url: base_url.into(),
            lifecycle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 为文档生成链接
    ///
    /// - 没有提取器：`Ok(None)`
    /// - 文档没有身份：`Ok(Some(""))`
    /// - 否则按模式生成链接
    pub async fn build(
        &self,
        document: &Document,
        extractor: Option<&dyn ParamExtractor>,
        mode: LinkMode,
    ) -> Result<Option<String>> {
        let Some(extractor) = extractor else {
            trace!("No param extractor configured, skipping link build");
            return Ok(None);
        };

        let Some(id) = document.identity() else {
            return Ok(Some(String::new()));
        };

        let raw = extractor.extract(document).await?;
        let params = sanitize(&raw);
        debug!("Building {} link for document {}", mode, id);

        let link = match mode {
            LinkMode::Short => self.short_link(&params).await?,
            LinkMode::Long => self.long_link(&params),
        };
        Ok(Some(link))
    }

    async fn short_link(&self, params: &LinkParams) -> Result<String> {
        if !self.lifecycle.is_ready() {
            return Err(DeepLinkError::initialization(format!(
                "{} SDK is not initialized",
                self.lifecycle.sdk().name()
            )));
        }

        self.lifecycle
            .sdk()
            .generate_short_link(params)
            .await
            .map_err(|e| match e {
                DeepLinkError::RemoteLink(_) | DeepLinkError::Initialization(_) => e,
                other => DeepLinkError::remote_link(other.message()),
            })
    }

    /// `{base_url}?{query}`，query 来自 `data`，按插入顺序
    pub fn long_link(&self, params: &LinkParams) -> String {
        let empty = Map::new();
        let data = params.data().unwrap_or(&empty);
        format!("{}?{}", self.base_url, query_string(data))
    }
}

/// 按 `application/x-www-form-urlencoded` 序列化
///
/// 字符串原样写入（包括空串），`null`、数字和布尔用其文本形式，
/// 数组和对象写成紧凑 JSON。
pub fn query_string(data: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in data {
        match value {
            Value::String(s) => {
                serializer.append_pair(key, s);
            }
            other => {
                serializer.append_pair(key, &other.to_string());
            }
        }
    }
    serializer.finish()
}
