//! Base URL 验证模块
//!
//! 长链接直接以 `{base_url}?{query}` 拼接，因此 base URL 必须是
//! 不带查询串和片段的 http(s) 地址。

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
    HasQuery,
    HasFragment,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::HasQuery => write!(f, "Base URL must not contain a query string"),
            Self::HasFragment => write!(f, "Base URL must not contain a fragment"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证长链接的 base URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 必须是 http:// 或 https://
/// 3. URL 格式有效
/// 4. 不含查询串或片段
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();
    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if parsed.query().is_some() {
        return Err(UrlValidationError::HasQuery);
    }
    if parsed.fragment().is_some() {
        return Err(UrlValidationError::HasFragment);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://x.test/l").is_ok());
        assert!(validate_url("http://localhost:8080/open").is_ok());
        assert!(validate_url("HTTPS://example.app.link").is_ok());
    }

    #[test]
    fn test_invalid_protocols() {
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_query_and_fragment_rejected() {
        assert_eq!(
            validate_url("https://x.test/l?a=1"),
            Err(UrlValidationError::HasQuery)
        );
        assert_eq!(
            validate_url("https://x.test/l#top"),
            Err(UrlValidationError::HasFragment)
        );
    }
}
