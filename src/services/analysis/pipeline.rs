//! 分析与审核管线
//!
//! 获取分析结果（后端优先、本地兜底）、锚定引用式批注、按违规裁决
//! 折算可见性补丁，最终以单事务 upsert AI 评审。

use std::sync::Arc;
use tracing::{info, warn};

use super::backend::{self, AnalysisOutcome};
use super::fallback;
use crate::config::AppConfig;
use crate::errors::{EssayHubError, Result};
use crate::models::essays::{
    entities::{Essay, ModerationPatch},
    requests::EssayListQuery,
};
use crate::models::reviews::{
    entities::{AutomatedReview, Correction, PeerReview, ReviewCategory, Reviewer},
    responses::BatchAnalyzeResponse,
};
use crate::storage::Storage;

/// 批量扫描单次处理的公开随笔上限
const BATCH_SWEEP_LIMIT: u64 = 1000;

/// 获取分析结果：启用后端则先调后端，失败回退本地生成器
pub(crate) async fn obtain_outcome(title: &str, content: &str) -> AnalysisOutcome {
    let config = AppConfig::get();

    if config.ai.enabled {
        match backend::analyze_with_backend(title, content).await {
            Ok(outcome) => return outcome,
            Err(e) => {
                warn!("分析后端调用失败，回退到本地生成器: {}", e);
            }
        }
    }

    fallback::generate(title, content)
}

/// 将分析结果落库
///
/// 违规内容：随笔转为私有，AI 评审总分强制为 0，评语携带原因。
/// 干净内容：随笔公开，总分为六项之和。两种裁决都将 is_analyzed
/// 置位，且与评审 upsert、聚合刷新同事务。
pub(crate) async fn apply_outcome(
    storage: &Arc<dyn Storage>,
    essay: &Essay,
    outcome: AnalysisOutcome,
) -> Result<PeerReview> {
    let mut corrections = Vec::new();
    for quoted in outcome.corrections {
        let category: ReviewCategory = quoted.category.parse().unwrap_or_else(|e| {
            warn!("随笔 {} 的批注类别无法识别（{}），归入 content", essay.id, e);
            ReviewCategory::Content
        });
        match Correction::anchor(category, &quoted.exact_quote, quoted.comment, &essay.content) {
            Some(correction) => corrections.push(correction),
            None => {
                warn!(
                    "引用文本在随笔 {} 中不存在，丢弃批注: {:?}",
                    essay.id, quoted.exact_quote
                );
            }
        }
    }
    corrections.sort_by_key(|c| c.text_start_index);

    let sum = outcome.grammar_score
        + outcome.style_score
        + outcome.clarity_score
        + outcome.structure_score
        + outcome.content_score
        + outcome.research_score;

    let (patch, overall_score, review_comment) = if outcome.is_offensive {
        let reason = outcome
            .offense_reason
            .unwrap_or_else(|| "内容不符合社区规范".to_string());
        info!("随笔 {} 被判定违规，转为私有: {}", essay.id, reason);
        (
            ModerationPatch {
                is_public: false,
                is_analyzed: true,
            },
            0,
            format!("内容审核未通过：{reason}。该随笔已被隐藏，请修改后重新提交。"),
        )
    } else {
        (
            ModerationPatch {
                is_public: true,
                is_analyzed: true,
            },
            sum,
            outcome
                .review_comment
                .unwrap_or_else(|| "自动分析完成，六项评分已生成。".to_string()),
        )
    };

    let review = AutomatedReview {
        grammar_score: outcome.grammar_score,
        style_score: outcome.style_score,
        clarity_score: outcome.clarity_score,
        structure_score: outcome.structure_score,
        content_score: outcome.content_score,
        research_score: outcome.research_score,
        overall_score,
        corrections,
        review_comment,
    };

    storage.upsert_ai_review(essay.id, review, patch).await
}

/// 分析单篇随笔（创建/刷新它的 AI 评审）
pub async fn analyze_essay(storage: &Arc<dyn Storage>, essay_id: i64) -> Result<PeerReview> {
    let essay = storage
        .get_essay_by_id(essay_id)
        .await?
        .ok_or_else(|| EssayHubError::essay_not_found("随笔不存在"))?;

    let outcome = obtain_outcome(&essay.title, &essay.content).await;
    apply_outcome(storage, &essay, outcome).await
}

/// 批量扫描公开随笔
///
/// 已有 AI 评审的跳过；单篇失败只计入统计，不中断扫描。
pub async fn batch_analyze(storage: &Arc<dyn Storage>) -> Result<BatchAnalyzeResponse> {
    let essays = storage
        .list_essays(
            EssayListQuery {
                public: Some(true),
                ..Default::default()
            },
            BATCH_SWEEP_LIMIT,
        )
        .await?;

    let mut stats = BatchAnalyzeResponse {
        total: essays.len() as i64,
        success: 0,
        failed: 0,
        skipped: 0,
    };

    for essay in &essays {
        match storage.get_peer_review(essay.id, Reviewer::Automated).await {
            Ok(Some(_)) => {
                stats.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("随笔 {} 的 AI 评审查询失败: {}", essay.id, e);
                stats.failed += 1;
                continue;
            }
        }

        let outcome = obtain_outcome(&essay.title, &essay.content).await;
        match apply_outcome(storage, essay, outcome).await {
            Ok(_) => stats.success += 1,
            Err(e) => {
                warn!("随笔 {} 的批量分析失败: {}", essay.id, e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
