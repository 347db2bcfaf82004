//! Exercise Record
//!
//! 一次音频生成调用的不可变输入

use serde::{Deserialize, Serialize};

/// 选项字母（Option A, Option B, ...）
pub const OPTION_LETTERS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// 字段分隔符（ASCII Unit Separator），避免字段拼接后产生歧义
const FIELD_SEPARATOR: u8 = 0x1f;

/// 听力练习记录
///
/// 字段与上游生成器输出的 JSON 一致：
/// `introduction` 可选，`conversation` 与 `question` 必填，`options` 为有序列表
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExerciseRecord {
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub conversation: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl ExerciseRecord {
    pub fn new(
        introduction: Option<&str>,
        conversation: impl Into<String>,
        question: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            introduction: introduction.map(str::to_string),
            conversation: conversation.into(),
            question: question.into(),
            options,
        }
    }

    /// 非空的介绍文本
    pub fn introduction_text(&self) -> Option<&str> {
        self.introduction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 问题 + 带字母编号的选项，拼成一段旁白
    ///
    /// 例如 `¿Qué pide el cliente?. Option A: paella. Option B: pasta`
    pub fn question_narration(&self) -> String {
        let mut parts = vec![self.question.trim().to_string()];
        if self.options.len() > OPTION_LETTERS.len() {
            tracing::warn!(
                options = self.options.len(),
                narrated = OPTION_LETTERS.len(),
                "Options beyond the letter range are not narrated"
            );
        }
        for (letter, option) in OPTION_LETTERS.iter().zip(self.options.iter()) {
            parts.push(format!("Option {}: {}", letter, option.trim()));
        }
        parts.join(". ")
    }

    /// 内容哈希
    ///
    /// md5(introduction, conversation, question, options)，
    /// 相同内容的练习总是得到同一个哈希，用作最终音频的缓存 key
    pub fn content_hash(&self) -> String {
        let mut ctx = md5::Context::new();
        ctx.consume(self.introduction.as_deref().unwrap_or_default().as_bytes());
        ctx.consume([FIELD_SEPARATOR]);
        ctx.consume(self.conversation.as_bytes());
        ctx.consume([FIELD_SEPARATOR]);
        ctx.consume(self.question.as_bytes());
        for option in &self.options {
            ctx.consume([FIELD_SEPARATOR]);
            ctx.consume(option.as_bytes());
        }
        format!("{:x}", ctx.compute())
    }

    /// 最终音频文件名
    pub fn artifact_file_name(&self, extension: &str) -> String {
        format!("question_{}.{}", self.content_hash(), extension)
    }
}
