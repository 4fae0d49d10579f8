//! OpenAI 兼容分析后端
//!
//! 调用 chat-completions 接口，以严格 JSON 返回六项评分、违规裁决与
//! 引用式批注。任何网络或解析错误都以 `AnalysisBackend` 错误上抛，
//! 由管线回退到本地生成器。

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{EssayHubError, Result};

/// 分析结果（后端与本地生成器共用的形状）
///
/// 线格式沿用 camelCase（与前端生成类型一致）。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub grammar_score: i32,
    pub style_score: i32,
    pub clarity_score: i32,
    pub structure_score: i32,
    pub content_score: i32,
    pub research_score: i32,
    #[serde(default)]
    pub is_offensive: bool,
    #[serde(default)]
    pub offense_reason: Option<String>,
    #[serde(default)]
    pub corrections: Vec<QuotedCorrection>,
    #[serde(default)]
    pub review_comment: Option<String>,
}

/// 引用式批注：后端只返回原文引用，偏移由我们事后定位
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedCorrection {
    pub category: String,
    pub exact_quote: String,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = r#"You are an expert academic writing tutor and content moderator. Analyze the essay and respond with a single JSON object, nothing else.

Scoring Guide:
- Evaluate 6 categories: grammar, style, clarity, structure, content, research.
- Assign a score from 0 to 200 for EACH category.
- Be rigorous but fair.

Moderation Guide:
- Set "isOffensive" to true only for hate speech, harassment, or content clearly unfit for a public essay platform; give a short "offenseReason" in that case.

Corrections Guide:
- Identify specific issues in the text. Focus on the most impactful errors.
- Aim for 3 to 10 high-quality corrections.
- For "exactQuote", copy-paste the text segment you are referring to. It must match the essay text exactly.

Output JSON Schema:
{
  "grammarScore": number,
  "styleScore": number,
  "clarityScore": number,
  "structureScore": number,
  "contentScore": number,
  "researchScore": number,
  "isOffensive": boolean,
  "offenseReason": string | null,
  "reviewComment": string,
  "corrections": [
    { "category": "grammar"|"style"|"clarity"|"structure"|"content"|"research", "exactQuote": "string", "comment": "string" }
  ]
}"#;

/// 去掉模型偶尔包裹的 Markdown 代码围栏
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

/// 调用分析后端
pub async fn analyze_with_backend(title: &str, content: &str) -> Result<AnalysisOutcome> {
    let config = AppConfig::get();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.ai.timeout))
        .build()?;

    let body = json!({
        "model": config.ai.model,
        "temperature": 0.2,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": format!("Title: {title}\n\nEssay Content:\n{content}") }
        ],
    });

    let response = client
        .post(format!(
            "{}/chat/completions",
            config.ai.base_url.trim_end_matches('/')
        ))
        .bearer_auth(&config.ai.api_key)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let completion: ChatCompletionResponse = response.json().await?;

    let message = completion
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .ok_or_else(|| EssayHubError::analysis_backend("分析后端返回空响应"))?;

    serde_json::from_str(strip_code_fences(message))
        .map_err(|e| EssayHubError::analysis_backend(format!("分析结果解析失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_outcome_deserializes_camel_case() {
        let raw = r#"{
            "grammarScore": 150, "styleScore": 140, "clarityScore": 130,
            "structureScore": 120, "contentScore": 110, "researchScore": 100,
            "isOffensive": false,
            "reviewComment": "solid draft",
            "corrections": [
                { "category": "grammar", "exactQuote": "the cat", "comment": "article" }
            ]
        }"#;
        let outcome: AnalysisOutcome = serde_json::from_str(raw).unwrap();
        assert_eq!(outcome.grammar_score, 150);
        assert!(!outcome.is_offensive);
        assert_eq!(outcome.corrections.len(), 1);
        assert_eq!(outcome.corrections[0].exact_quote, "the cat");
    }

    #[test]
    fn test_outcome_moderation_fields_optional() {
        // 缺省的审核字段按干净内容处理
        let raw = r#"{
            "grammarScore": 1, "styleScore": 2, "clarityScore": 3,
            "structureScore": 4, "contentScore": 5, "researchScore": 6
        }"#;
        let outcome: AnalysisOutcome = serde_json::from_str(raw).unwrap();
        assert!(!outcome.is_offensive);
        assert!(outcome.offense_reason.is_none());
        assert!(outcome.corrections.is_empty());
    }
}
