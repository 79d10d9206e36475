//! 链接更新协调
//!
//! 一个字段实例对应一个 `LinkUpdateCoordinator`，决定何时重建链接：
//! - 值为空且文档有身份时自动触发
//! - 手动 Update
//! - 切换 shorten 开关（总是立即按新模式重建）
//!
//! 并发的更新按请求顺序编号，只有最近一次请求的结果会被写回，
//! 较早请求的结果即使更晚返回也会被丢弃。

use std::sync::Arc;

use parking_lot::Mutex;
use strum::{AsRefStr, Display};
use tracing::{debug, info, warn};

use super::builder::{LinkBuilder, LinkMode};
use super::document::Document;
use super::extractor::{FieldMappingExtractor, ParamExtractor};
use crate::config::StaticConfig;
use crate::errors::DeepLinkError;
use crate::sdk::{RemoteLinkSdk, SdkLifecycle};

/// 已有值短于该长度（UTF-16 码元）时，默认认为它是短链接
pub const SHORT_LINK_THRESHOLD: usize = 43;

/// 交给宿主的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchEvent {
    Set(String),
    Unset,
}

impl PatchEvent {
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            Self::Unset
        } else {
            Self::Set(value.to_string())
        }
    }
}

/// 宿主的变更通知钩子
pub trait ChangeSink: Send + Sync {
    fn on_change(&self, patch: PatchEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum LinkStatus {
    Idle,
    Updating,
    Error,
}

/// 一次更新的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 生成了新链接并通知了宿主
    Changed(String),
    /// 生成的链接与当前值相同
    Unchanged,
    /// 没有生成链接（无提取器或文档无身份）
    Empty,
    /// 期间有更新的请求，结果被丢弃
    Stale,
    Failed(DeepLinkError),
    /// 条件不满足，未触发更新
    NotTriggered,
}

/// 字段配置
#[derive(Clone)]
pub struct FieldOptions {
    pub base_url: String,
    pub branch_key: Option<String>,
    pub extractor: Option<Arc<dyn ParamExtractor>>,
}

impl FieldOptions {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            base_url: config.link.base_url.clone(),
            branch_key: config.link.branch_key.clone(),
            extractor: Some(Arc::new(FieldMappingExtractor::new(config.params.clone()))),
        }
    }
}

/// 字段当前状态的快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub value: Option<String>,
    pub shorten: bool,
    pub status: LinkStatus,
    pub error: Option<String>,
}

type SyncDeps = (Option<String>, Option<String>);

struct Inner {
    document: Option<Document>,
    value: Option<String>,
    shorten: bool,
    status: LinkStatus,
    error: Option<String>,
    last_sync: Option<SyncDeps>,
    generation: u64,
}

pub struct LinkUpdateCoordinator {
    builder: LinkBuilder,
    lifecycle: Arc<SdkLifecycle>,
    extractor: Option<Arc<dyn ParamExtractor>>,
    branch_key: Mutex<Option<String>>,
    sink: Arc<dyn ChangeSink>,
    inner: Mutex<Inner>,
}

impl LinkUpdateCoordinator {
    pub fn new(
        options: FieldOptions,
        sdk: Arc<dyn RemoteLinkSdk>,
        sink: Arc<dyn ChangeSink>,
        value: Option<String>,
    ) -> Self {
        let value = value.filter(|v| !v.is_empty());
        let shorten = value
            .as_ref()
            .is_some_and(|v| v.encode_utf16().count() < SHORT_LINK_THRESHOLD);

        let error = options.extractor.is_none().then(|| {
            DeepLinkError::configuration("options.getLinkParams required").to_string()
        });
        let status = if error.is_some() {
            LinkStatus::Error
        } else {
            LinkStatus::Idle
        };

        let lifecycle = Arc::new(SdkLifecycle::new(sdk));
        Self {
            builder: LinkBuilder::new(options.base_url, lifecycle.clone()),
            lifecycle,
            extractor: options.extractor,
            branch_key: Mutex::new(options.branch_key),
            sink,
            inner: Mutex::new(Inner {
                document: None,
                value,
                shorten,
                status,
                error,
                last_sync: None,
                generation: 0,
            }),
        }
    }

    /// 挂载：初始化 SDK，然后按当前值同步文档
    pub async fn mount(&self, document: Document) -> UpdateOutcome {
        self.initialize_sdk().await;
        let value = self.inner.lock().value.clone();
        self.sync(document, value).await
    }

    /// 更换 Branch key；同一个 key 不会重复初始化
    pub async fn set_branch_key(&self, key: Option<String>) {
        *self.branch_key.lock() = key;
        self.initialize_sdk().await;
    }

    async fn initialize_sdk(&self) {
        let key = self.branch_key.lock().clone();
        if let Err(e) = self.lifecycle.initialize(key.as_deref()).await {
            let mut inner = self.inner.lock();
            inner.error = Some(e.to_string());
            if inner.status == LinkStatus::Idle {
                inner.status = LinkStatus::Error;
            }
        }
    }

    /// 宿主传入新的文档和值
    ///
    /// (文档身份, 值) 与上次不同，且值为空、文档有身份时自动更新。
    pub async fn sync(&self, document: Document, value: Option<String>) -> UpdateOutcome {
        let value = value.filter(|v| !v.is_empty());
        let triggered = {
            let mut inner = self.inner.lock();
            let deps: SyncDeps = (document.identity().map(str::to_string), value.clone());
            let changed = inner.last_sync.as_ref() != Some(&deps);
            let triggered = changed && value.is_none() && deps.0.is_some();
            inner.last_sync = Some(deps);
            inner.document = Some(document);
            inner.value = value;
            triggered
        };

        if !triggered {
            return UpdateOutcome::NotTriggered;
        }
        debug!("Link value is empty, generating automatically");
        self.run_update().await
    }

    /// 手动 Update
    pub async fn update(&self) -> UpdateOutcome {
        self.run_update().await
    }

    /// 切换 shorten 并按新模式立即重建
    pub async fn toggle_shorten(&self) -> UpdateOutcome {
        let shorten = {
            let mut inner = self.inner.lock();
            inner.shorten = !inner.shorten;
            inner.shorten
        };
        debug!("Shorten toggled to {}", shorten);
        self.run_update().await
    }

    /// 输入框直接编辑
    ///
    /// 手动输入优先：进行中的更新返回后会被视为过期。
    pub fn handle_input(&self, text: &str) {
        let patch = PatchEvent::from_value(text);
        {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            if inner.status == LinkStatus::Updating {
                inner.status = if inner.error.is_some() {
                    LinkStatus::Error
                } else {
                    LinkStatus::Idle
                };
            }
            inner.value = match &patch {
                PatchEvent::Set(v) => Some(v.clone()),
                PatchEvent::Unset => None,
            };
        }
        self.sink.on_change(patch);
    }

    async fn run_update(&self) -> UpdateOutcome {
        let (generation, document, mode) = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.status = LinkStatus::Updating;
            (
                inner.generation,
                inner.document.clone(),
                LinkMode::from_shorten(inner.shorten),
            )
        };

        let result = match document {
            Some(document) => {
                self.builder
                    .build(&document, self.extractor.as_deref(), mode)
                    .await
            }
            None => Ok(None),
        };

        let (outcome, patch) = {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                debug!("Discarding stale link update #{}", generation);
                return UpdateOutcome::Stale;
            }

            match result {
                Ok(Some(link)) if !link.is_empty() => {
                    inner.status = LinkStatus::Idle;
                    inner.error = None;
                    if inner.value.as_deref() == Some(link.as_str()) {
                        (UpdateOutcome::Unchanged, None)
                    } else {
                        inner.value = Some(link.clone());
                        (
                            UpdateOutcome::Changed(link.clone()),
                            Some(PatchEvent::Set(link)),
                        )
                    }
                }
                Ok(_) => {
                    inner.status = if inner.error.is_some() {
                        LinkStatus::Error
                    } else {
                        LinkStatus::Idle
                    };
                    (UpdateOutcome::Empty, None)
                }
                Err(e) => {
                    warn!("Link update failed: {}", e);
                    inner.status = LinkStatus::Error;
                    inner.error = Some(e.to_string());
                    (UpdateOutcome::Failed(e), None)
                }
            }
        };

        if let Some(patch) = patch {
            if let PatchEvent::Set(link) = &patch {
                info!("Proposing {} link: {}", mode, link);
            }
            self.sink.on_change(patch);
        }
        outcome
    }

    pub fn snapshot(&self) -> FieldState {
        let inner = self.inner.lock();
        FieldState {
            value: inner.value.clone(),
            shorten: inner.shorten,
            status: inner.status,
            error: inner.error.clone(),
        }
    }

    /// 要展示的错误：宿主校验错误优先，其次是最近一次的错误
    pub fn expressed_error(&self, validation_message: Option<&str>) -> Option<String> {
        validation_message
            .map(str::to_string)
            .or_else(|| self.inner.lock().error.clone())
    }

    pub fn is_shortened(&self) -> bool {
        self.inner.lock().shorten
    }

    pub fn lifecycle(&self) -> &Arc<SdkLifecycle> {
        &self.lifecycle
    }
}
