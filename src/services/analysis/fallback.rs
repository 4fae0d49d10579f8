//! 本地确定性分析生成器
//!
//! 后端不可用或未启用时的兜底：从简单文本统计推导六项评分，
//! 同一篇输入永远得到同一份输出。不做违规判定（恒为干净）。

use super::backend::AnalysisOutcome;
use crate::utils::word_count;

fn clamp_score(value: i64) -> i32 {
    value.clamp(0, 200) as i32
}

fn sentence_count(content: &str) -> i64 {
    content
        .split(['.', '!', '?', '。', '！', '？'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1) as i64
}

fn paragraph_count(content: &str) -> i64 {
    content
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count()
        .max(1) as i64
}

/// 生成确定性分析结果
pub fn generate(title: &str, content: &str) -> AnalysisOutcome {
    let words = word_count(content) as i64;
    let sentences = sentence_count(content);
    let paragraphs = paragraph_count(content);
    let avg_sentence_len = words / sentences;

    AnalysisOutcome {
        grammar_score: clamp_score(90 + words.min(400) / 8),
        style_score: clamp_score(80 + avg_sentence_len * 3),
        clarity_score: clamp_score(150 - (avg_sentence_len - 18).abs() * 4),
        structure_score: clamp_score(70 + paragraphs * 15),
        content_score: clamp_score(60 + words.min(500) / 5),
        research_score: clamp_score(50 + title.chars().count().min(60) as i64 + words.min(450) / 9),
        is_offensive: false,
        offense_reason: None,
        corrections: Vec::new(),
        review_comment: Some(format!(
            "自动分析完成：全文 {words} 词、{sentences} 句、{paragraphs} 段。评分由文本统计推导，仅供参考。"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Rust makes systems programming safer. Ownership rules catch bugs early.\n\nThe borrow checker is strict but fair. Most programs compile on the second try.";

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate("On Rust", SAMPLE);
        let b = generate("On Rust", SAMPLE);
        assert_eq!(a.grammar_score, b.grammar_score);
        assert_eq!(a.style_score, b.style_score);
        assert_eq!(a.clarity_score, b.clarity_score);
        assert_eq!(a.structure_score, b.structure_score);
        assert_eq!(a.content_score, b.content_score);
        assert_eq!(a.research_score, b.research_score);
        assert_eq!(a.review_comment, b.review_comment);
    }

    #[test]
    fn test_scores_within_nominal_range() {
        for (title, content) in [
            ("", ""),
            ("t", "one"),
            ("long", &"word ".repeat(5000)),
            ("cjk", "句子一。句子二。\n\n第二段。"),
        ] {
            let outcome = generate(title, content);
            for score in [
                outcome.grammar_score,
                outcome.style_score,
                outcome.clarity_score,
                outcome.structure_score,
                outcome.content_score,
                outcome.research_score,
            ] {
                assert!((0..=200).contains(&score), "score {score} out of range");
            }
        }
    }

    #[test]
    fn test_never_flags_offensive() {
        let outcome = generate("anything", "whatever the content says");
        assert!(!outcome.is_offensive);
        assert!(outcome.offense_reason.is_none());
        assert!(outcome.corrections.is_empty());
    }
}
