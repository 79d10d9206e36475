use serde::{Deserialize, Serialize};

use crate::errors::{DeepLinkError, Result};
use crate::utils::url_validator::validate_url;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - link: 链接生成配置（base URL、Branch key、远程 API）
/// - params: 文档字段到链接参数的映射
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub params: ParamsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：DL，分隔符：__
    /// 示例：DL__LINK__BASE_URL=https://example.app.link/open
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("DL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 校验启动所需的配置项
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.link.base_url).map_err(|e| {
            DeepLinkError::configuration(format!("link.base_url is invalid: {}", e))
        })?;
        if self.link.timeout_secs == 0 {
            return Err(DeepLinkError::configuration(
                "link.timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::sample();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DeepLinkError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 带示例参数映射的配置，用于 `config generate`
    pub fn sample() -> Self {
        Self {
            params: ParamsConfig {
                fields: vec![ParamBinding::new("feature", "/feature")],
                data: vec![
                    ParamBinding::new("slug", "/slug/current"),
                    ParamBinding::new("alias", "/alias"),
                    ParamBinding::new("$og_title", "/title"),
                ],
            },
            ..Self::default()
        }
    }
}

/// 链接生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// 长链接的基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Branch key，缺失时短链接不可用
    #[serde(default)]
    pub branch_key: Option<String>,
    /// 远程短链接 API 地址
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// 文档字段到链接参数的映射
///
/// `fields` 写入顶层参数（channel、feature、alias 等），
/// `data` 写入嵌套的 data 对象；顺序即参数顺序。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParamsConfig {
    #[serde(default)]
    pub fields: Vec<ParamBinding>,
    #[serde(default)]
    pub data: Vec<ParamBinding>,
}

/// 单个参数绑定：参数名 + 文档中的 JSON Pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBinding {
    pub key: String,
    pub pointer: String,
}

impl ParamBinding {
    pub fn new(key: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pointer: pointer.into(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_base_url() -> String {
    "https://example.app.link/open".to_string()
}

fn default_api_url() -> String {
    "https://api2.branch.io".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            branch_key: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
