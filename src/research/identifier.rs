//! 从URL推断公司名称

use url::Url;

/// 补全URL协议头，未携带 http(s) 协议时默认使用 https
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// 取主机名第一段（去掉开头的 `www.`）作为公司名称
///
/// 例如 `https://www.salesforce.com/products` 得到 `salesforce`。
/// 空输入或无法解析时返回空字符串。
/// 注意：该启发式规则不识别 `co.uk` 这类多段公共后缀。
pub fn extract_company_name(url: &str) -> String {
    if url.trim().is_empty() {
        return String::new();
    }

    let Ok(parsed) = Url::parse(&normalize_url(url)) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or_default().to_string()
}
