//! 远程短链接能力
//!
//! `RemoteLinkSdk` 是不透明的远程能力：初始化一次，然后按参数生成短链接。
//! [`SdkLifecycle`] 负责“每个 key 只初始化一次”的约束，
//! [`BranchApiClient`] 是基于 HTTP API 的实现。

mod branch;
mod lifecycle;

pub use branch::BranchApiClient;
pub use lifecycle::SdkLifecycle;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;
use crate::link::LinkParams;

/// 初始化选项
///
/// 字段嵌入在编辑工具中，不是面向终端用户的页面，
/// 因此 journeys、追踪和动画全部关闭。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitOptions {
    pub no_journeys: bool,
    pub tracking_disabled: bool,
    pub disable_exit_animation: bool,
    pub disable_entry_animation: bool,
}

impl InitOptions {
    pub const fn embedded() -> Self {
        Self {
            no_journeys: true,
            tracking_disabled: true,
            disable_exit_animation: true,
            disable_entry_animation: true,
        }
    }
}

impl Default for InitOptions {
    fn default() -> Self {
        Self::embedded()
    }
}

/// 远程短链接 SDK trait
#[async_trait]
pub trait RemoteLinkSdk: Send + Sync {
    /// 使用 key 初始化 SDK
    async fn initialize(&self, key: &str, options: &InitOptions) -> Result<()>;

    /// 按（已清洗的）参数生成短链接
    async fn generate_short_link(&self, params: &LinkParams) -> Result<String>;

    /// 实现名称（用于日志）
    fn name(&self) -> &'static str;
}
