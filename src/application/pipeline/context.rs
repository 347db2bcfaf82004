//! Generation Context - 单次生成调用的上下文
//!
//! 引擎档位与音色分配只存在于一次调用内，调用之间没有共享可变状态

use crate::domain::{DialogueTurn, EngineTier, ExerciseRecord, VoiceAssigner, VoiceAssignment};
use crate::domain::voice::VoiceError;

use super::segment_synthesizer::SegmentJob;

/// 介绍段播报标签
pub const INTRODUCTION_LABEL: &str = "Introduction";
/// 问题段播报标签
pub const QUESTION_LABEL: &str = "Question";

/// 生成阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Init,
    Intro,
    Conversation,
    Question,
    Assemble,
    Done,
    Failed,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Intro => "intro",
            Self::Conversation => "conversation",
            Self::Question => "question",
            Self::Assemble => "assemble",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单次调用上下文
#[derive(Debug, Clone)]
pub struct GenerationContext {
    tier: EngineTier,
    assignment: VoiceAssignment,
}

impl GenerationContext {
    /// 在任何合成调用之前一次性算好音色分配
    pub fn new(tier: EngineTier, turns: &[DialogueTurn]) -> Self {
        Self {
            tier,
            assignment: VoiceAssigner.assign_turns(turns, tier),
        }
    }

    pub fn tier(&self) -> EngineTier {
        self.tier
    }

    pub fn assignment(&self) -> &VoiceAssignment {
        &self.assignment
    }

    pub fn narrator_voice(&self) -> &'static str {
        self.tier.catalog().narrator()
    }

    /// 构建完整的合成计划：介绍 → 对话 → 问题
    ///
    /// ordinal 在这里分配，决定最终拼接顺序
    pub fn plan(
        &self,
        record: &ExerciseRecord,
        turns: &[DialogueTurn],
    ) -> Result<Vec<SegmentJob>, VoiceError> {
        let mut jobs = Vec::with_capacity(turns.len() + 2);

        if let Some(intro) = record.introduction_text() {
            jobs.push(SegmentJob {
                ordinal: jobs.len(),
                speaker: INTRODUCTION_LABEL.to_string(),
                voice_id: self.narrator_voice().to_string(),
                text: intro.to_string(),
            });
        }

        for turn in turns {
            jobs.push(SegmentJob {
                ordinal: jobs.len(),
                speaker: turn.speaker().to_string(),
                voice_id: self.assignment.require(turn.speaker())?.to_string(),
                text: turn.utterance().to_string(),
            });
        }

        jobs.push(SegmentJob {
            ordinal: jobs.len(),
            speaker: QUESTION_LABEL.to_string(),
            voice_id: self.narrator_voice().to_string(),
            text: record.question_narration(),
        });

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DialogueParser;

    #[test]
    fn test_plan_orders_intro_turns_question() {
        let record = ExerciseRecord::new(
            Some("Un cliente y un camarero hablan."),
            "Cliente: ¿Cuál es el especial? Camarero: Paella por 15 euros.",
            "¿Qué pide el cliente?",
            vec!["paella".into(), "pasta".into()],
        );
        let turns = DialogueParser::default().parse(&record.conversation).unwrap();
        let context = GenerationContext::new(EngineTier::Standard, &turns);

        let jobs = context.plan(&record, &turns).unwrap();

        let labels: Vec<&str> = jobs.iter().map(|j| j.speaker.as_str()).collect();
        assert_eq!(labels, vec!["Introduction", "Cliente", "Camarero", "Question"]);
        let ordinals: Vec<usize> = jobs.iter().map(|j| j.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(jobs[0].voice_id, "Conchita");
        assert_eq!(jobs[1].voice_id, "Enrique");
        assert_eq!(jobs[2].voice_id, "Lucia");
        assert_eq!(jobs[3].voice_id, "Conchita");
        assert!(jobs[3].text.contains("Option B: pasta"));
    }

    #[test]
    fn test_plan_without_introduction() {
        let record = ExerciseRecord::new(None, "Hombre: Hola.", "¿Quién?", vec![]);
        let turns = DialogueParser::default().parse(&record.conversation).unwrap();
        let context = GenerationContext::new(EngineTier::LongForm, &turns);

        let jobs = context.plan(&record, &turns).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].speaker, "Hombre");
        assert_eq!(jobs[0].voice_id, "Raul");
        assert_eq!(jobs[1].voice_id, "Alba");
    }
}
