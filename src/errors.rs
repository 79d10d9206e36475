use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkError {
    Configuration(String),
    Initialization(String),
    RemoteLink(String),
    Extraction(String),
    Serialization(String),
    FileOperation(String),
}

impl DeepLinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DeepLinkError::Configuration(_) => "E001",
            DeepLinkError::Initialization(_) => "E002",
            DeepLinkError::RemoteLink(_) => "E003",
            DeepLinkError::Extraction(_) => "E004",
            DeepLinkError::Serialization(_) => "E005",
            DeepLinkError::FileOperation(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DeepLinkError::Configuration(_) => "Configuration Error",
            DeepLinkError::Initialization(_) => "Initialization Error",
            DeepLinkError::RemoteLink(_) => "Remote Link Error",
            DeepLinkError::Extraction(_) => "Parameter Extraction Error",
            DeepLinkError::Serialization(_) => "Serialization Error",
            DeepLinkError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DeepLinkError::Configuration(msg)
            | DeepLinkError::Initialization(msg)
            | DeepLinkError::RemoteLink(msg)
            | DeepLinkError::Extraction(msg)
            | DeepLinkError::Serialization(msg)
            | DeepLinkError::FileOperation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    #[cfg(feature = "cli")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于字段内的错误提示）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DeepLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DeepLinkError {}

// 便捷的构造函数
impl DeepLinkError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::Configuration(msg.into())
    }

    pub fn initialization<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::Initialization(msg.into())
    }

    pub fn remote_link<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::RemoteLink(msg.into())
    }

    pub fn extraction<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::Extraction(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        DeepLinkError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for DeepLinkError {
    fn from(err: std::io::Error) -> Self {
        DeepLinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DeepLinkError {
    fn from(err: serde_json::Error) -> Self {
        DeepLinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeepLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            DeepLinkError::configuration("a"),
            DeepLinkError::initialization("b"),
            DeepLinkError::remote_link("c"),
            DeepLinkError::extraction("d"),
            DeepLinkError::serialization("e"),
            DeepLinkError::file_operation("f"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = DeepLinkError::configuration("options.branchKey required");
        assert_eq!(
            err.to_string(),
            "Configuration Error: options.branchKey required"
        );
        assert_eq!(err.message(), "options.branchKey required");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DeepLinkError = parse_err.into();
        assert!(matches!(err, DeepLinkError::Serialization(_)));
    }
}
