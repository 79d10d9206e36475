//! Branch HTTP API 实现
//!
//! 短链接通过 `POST {api_url}/v1/url` 生成，请求体是清洗后的参数
//! 加上 `branch_key`。ureq 是同步客户端，请求放在 spawn_blocking 中执行。

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::{InitOptions, RemoteLinkSdk};
use crate::config::LinkConfig;
use crate::errors::{DeepLinkError, Result};
use crate::link::LinkParams;

const KEY_PREFIXES: &[&str] = &["key_live_", "key_test_"];

#[derive(Debug, Deserialize)]
struct UrlResponse {
    url: String,
}

#[derive(Debug, Clone)]
struct Session {
    key: String,
    options: InitOptions,
}

pub struct BranchApiClient {
    agent: Agent,
    endpoint: String,
    session: RwLock<Option<Session>>,
}

impl BranchApiClient {
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            endpoint: format!("{}/v1/url", api_url.trim_end_matches('/')),
            session: RwLock::new(None),
        }
    }

    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 生成请求体：`branch_key` 在前，其余参数按原顺序
    fn request_body(key: &str, params: &LinkParams) -> Value {
        let mut body = serde_json::Map::new();
        body.insert("branch_key".to_string(), Value::String(key.to_string()));
        for (k, v) in params.as_map() {
            body.insert(k.clone(), v.clone());
        }
        Value::Object(body)
    }

    fn post_sync(agent: Agent, endpoint: String, body: Value) -> Result<String> {
        let resp = agent
            .post(&endpoint)
            .send_json(&body)
            .map_err(|e| DeepLinkError::remote_link(format!("request failed: {}", e)))?;

        let parsed: UrlResponse = resp
            .into_body()
            .read_json()
            .map_err(|e| DeepLinkError::remote_link(format!("invalid response: {}", e)))?;

        Ok(parsed.url)
    }
}

#[async_trait]
impl RemoteLinkSdk for BranchApiClient {
    async fn initialize(&self, key: &str, options: &InitOptions) -> Result<()> {
        if !KEY_PREFIXES.iter().any(|p| key.starts_with(p)) {
            return Err(DeepLinkError::initialization(format!(
                "invalid Branch key: expected one of {:?}",
                KEY_PREFIXES
            )));
        }

        debug!(
            "Branch session opened (journeys: {}, tracking: {})",
            !options.no_journeys, !options.tracking_disabled
        );
        *self.session.write() = Some(Session {
            key: key.to_string(),
            options: *options,
        });
        Ok(())
    }

    async fn generate_short_link(&self, params: &LinkParams) -> Result<String> {
        let session = self
            .session
            .read()
            .clone()
            .ok_or_else(|| DeepLinkError::initialization("Branch SDK not initialized"))?;

        let body = Self::request_body(&session.key, params);
        trace!(
            "POST {} (tracking disabled: {})",
            self.endpoint, session.options.tracking_disabled
        );

        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        tokio::task::spawn_blocking(move || Self::post_sync(agent, endpoint, body))
            .await
            .unwrap_or_else(|e| {
                warn!("Branch spawn_blocking failed: {}", e);
                Err(DeepLinkError::remote_link(e.to_string()))
            })
    }

    fn name(&self) -> &'static str {
        "Branch"
    }
}
