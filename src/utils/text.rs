//! 文本工具

/// 统计随笔字数（以空白分隔的词元数）
pub fn word_count(content: &str) -> i32 {
    content.split_whitespace().count() as i32
}

/// 搜索关键词截断上限（字符数）
pub const SEARCH_TERM_MAX_CHARS: usize = 100;

/// 截断搜索关键词，避免超长子串查询
pub fn truncate_search_term(term: &str) -> String {
    term.chars().take(SEARCH_TERM_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_basic() {
        assert_eq!(word_count("the cat sat on the mat"), 6);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
    }

    #[test]
    fn test_word_count_mixed_whitespace() {
        assert_eq!(word_count("a\tb\nc  d"), 4);
    }

    #[test]
    fn test_truncate_search_term() {
        assert_eq!(truncate_search_term("short"), "short");
        let long = "x".repeat(500);
        assert_eq!(truncate_search_term(&long).chars().count(), 100);
        // 多字节字符按字符截断，不产生半个码点
        let cjk = "字".repeat(200);
        assert_eq!(truncate_search_term(&cjk).chars().count(), 100);
    }
}
