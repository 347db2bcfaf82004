//! 对话解析器
//!
//! 生成器不会给出逐轮分隔符，同一行里可能出现多个 `说话人: 台词`。
//! 解析器按行扫描，以冒号确定当前说话人，再用已知说话人标签做前瞻，
//! 找到下一个说话人的起点作为当前台词的结束位置。

use thiserror::Error;

/// 默认的已知说话人标签（不含冒号）
pub const DEFAULT_KNOWN_SPEAKERS: &[&str] = &[
    "Turista", "Taxista", "Hombre", "Mujer", "Camarero", "Camarera", "Cliente", "Clienta",
    "Vendedor", "Vendedora", "Empleado", "Empleada", "Cajero", "Cajera", "Señor", "Señora",
    "Chico", "Chica", "Narrador", "Narradora",
];

/// 解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Conversation text is empty")]
    EmptyInput,

    #[error("No dialogue turns found in {lines} line(s)")]
    NoTurns { lines: usize },
}

/// 对话轮次
///
/// 只能由 [`DialogueParser`] 产生，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueTurn {
    speaker: String,
    utterance: String,
    position: usize,
}

impl DialogueTurn {
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    /// 0-based，保持解析顺序
    pub fn position(&self) -> usize {
        self.position
    }
}

/// 解析配置
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// 用于前瞻的已知说话人标签
    pub known_speakers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            known_speakers: DEFAULT_KNOWN_SPEAKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 对话解析器
#[derive(Debug, Clone)]
pub struct DialogueParser {
    /// `标签:` 形式的前瞻 token
    tokens: Vec<String>,
}

impl Default for DialogueParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl DialogueParser {
    pub fn new(config: &ParserConfig) -> Self {
        let tokens = config
            .known_speakers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("{}:", s))
            .collect();
        Self { tokens }
    }

    /// 解析整段对话
    ///
    /// 没有冒号的行被整行忽略（不会接到上一位说话人后面）；
    /// 一个轮次都没有时返回 [`ParseError::NoTurns`]
    pub fn parse(&self, conversation: &str) -> Result<Vec<DialogueTurn>, ParseError> {
        if conversation.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let lines: Vec<&str> = conversation
            .lines()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let mut turns = Vec::new();
        for line in &lines {
            for (speaker, utterance) in self.split_line(line) {
                tracing::debug!(
                    position = turns.len(),
                    speaker = %speaker,
                    utterance = %utterance,
                    "Parsed dialogue turn"
                );
                turns.push(DialogueTurn {
                    speaker,
                    utterance,
                    position: turns.len(),
                });
            }
        }

        if turns.is_empty() {
            return Err(ParseError::NoTurns { lines: lines.len() });
        }

        Ok(turns)
    }

    /// 切分单行中的所有 (说话人, 台词)
    pub fn split_line(&self, line: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut remaining = line.trim();

        while let Some(colon) = remaining.find(':') {
            let speaker = remaining[..colon].trim();
            let rest = remaining[colon + 1..].trim();

            let (text, tail) = match self.next_speaker_pos(rest) {
                Some(pos) => (rest[..pos].trim(), rest[pos..].trim()),
                None => (rest, ""),
            };

            if let Some(utterance) = normalize_utterance(text) {
                if !speaker.is_empty() {
                    pairs.push((speaker.to_string(), utterance));
                }
            }

            if tail.is_empty() {
                break;
            }
            remaining = tail;
        }

        pairs
    }

    /// 剩余文本中最早出现的已知说话人标签位置
    fn next_speaker_pos(&self, text: &str) -> Option<usize> {
        self.tokens.iter().filter_map(|token| text.find(token.as_str())).min()
    }
}

/// 去掉首尾的句点和空格，并以句点结尾；清理后为空则丢弃
fn normalize_utterance(text: &str) -> Option<String> {
    let trimmed = text.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{}.", trimmed))
    }
}
