//! SDK 初始化生命周期
//!
//! 每个字段实例持有一个 `SdkLifecycle`。是否重新初始化只看 key 是否变化：
//! 同一个 key 不会再次尝试（即使上次失败），换 key 才会重新初始化。

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{InitOptions, RemoteLinkSdk};
use crate::errors::{DeepLinkError, Result};

#[derive(Debug, Default)]
struct LifecycleState {
    last_key: Option<String>,
    ready: bool,
}

pub struct SdkLifecycle {
    sdk: Arc<dyn RemoteLinkSdk>,
    state: Mutex<LifecycleState>,
}

impl SdkLifecycle {
    pub fn new(sdk: Arc<dyn RemoteLinkSdk>) -> Self {
        Self {
            sdk,
            state: Mutex::new(LifecycleState::default()),
        }
    }

    /// 用 key 初始化远程 SDK
    ///
    /// - key 缺失或为空：`Configuration` 错误，不发起初始化
    /// - key 与上次相同：直接返回
    /// - 新 key：调用 SDK 初始化，失败时返回 `Initialization` 错误
    pub async fn initialize(&self, key: Option<&str>) -> Result<()> {
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DeepLinkError::configuration("options.branchKey required"))?;

        {
            let mut state = self.state.lock();
            if state.last_key.as_deref() == Some(key) {
                debug!("{} SDK already initialized for this key, skipping", self.sdk.name());
                return Ok(());
            }
            state.last_key = Some(key.to_string());
            state.ready = false;
        }

        match self.sdk.initialize(key, &InitOptions::embedded()).await {
            Ok(()) => {
                let mut state = self.state.lock();
                // 初始化期间 key 可能已被替换
                if state.last_key.as_deref() == Some(key) {
                    state.ready = true;
                }
                info!("{} SDK initialized", self.sdk.name());
                Ok(())
            }
            Err(e) => {
                warn!("{} SDK initialization failed: {}", self.sdk.name(), e);
                Err(match e {
                    DeepLinkError::Initialization(_) => e,
                    other => DeepLinkError::initialization(other.message()),
                })
            }
        }
    }

    /// 最近一次初始化是否成功
    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    pub fn current_key(&self) -> Option<String> {
        self.state.lock().last_key.clone()
    }

    pub fn sdk(&self) -> &Arc<dyn RemoteLinkSdk> {
        &self.sdk
    }
}
