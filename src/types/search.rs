/// 订阅源结果的来源标签
pub const GOOGLE_NEWS_LABEL: &str = "Google News RSS";

/// 单条检索结果，由某一个检索任务创建，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    /// 结果链接，非空时作为去重键
    pub link: String,
    /// 摘要
    pub snippet: String,
    /// 来源标签，通用网页检索不设置
    pub source_label: Option<String>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
            source_label: None,
        }
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// 去重键：非空链接按原样比较，不做任何规范化
    pub fn dedup_key(&self) -> Option<&str> {
        if self.link.is_empty() {
            None
        } else {
            Some(&self.link)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_uses_link_as_given() {
        assert_eq!(SearchResult::new("t", "", "s").dedup_key(), None);
        assert_eq!(
            SearchResult::new("t", "https://a.example", "s").dedup_key(),
            Some("https://a.example")
        );
        assert_eq!(
            SearchResult::new("t", " https://a.example", "s").dedup_key(),
            Some(" https://a.example")
        );
        assert_eq!(SearchResult::new("t", "  ", "s").dedup_key(), Some("  "));
    }
}
