//! Voice Assigner - 说话人音色分配
//!
//! 一次生成调用内，同一说话人始终对应同一个音色

use std::collections::HashSet;

use crate::domain::dialogue::DialogueTurn;

use super::engine::EngineTier;
use super::errors::VoiceError;
use super::role::{RoleClassifier, SpeakerRoleType};

/// 说话人的角色与音色
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerVoice {
    pub speaker: String,
    pub role: SpeakerRoleType,
    pub voice_id: String,
    /// 音色已被先出现的说话人使用
    pub reused: bool,
}

/// 音色分配表
///
/// 只在单次调用内有效，不持久化；按说话人首次出现的顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceAssignment {
    tier: EngineTier,
    entries: Vec<SpeakerVoice>,
}

impl VoiceAssignment {
    pub fn tier(&self) -> EngineTier {
        self.tier
    }

    pub fn entries(&self) -> &[SpeakerVoice] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn voice_for(&self, speaker: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.speaker == speaker)
            .map(|e| e.voice_id.as_str())
    }

    /// 每个轮次都必须有音色
    pub fn require(&self, speaker: &str) -> Result<&str, VoiceError> {
        self.voice_for(speaker)
            .ok_or_else(|| VoiceError::Unassigned(speaker.to_string()))
    }
}

/// 按首次出现顺序去重并分类说话人
pub fn classify_speakers(turns: &[DialogueTurn]) -> Vec<(String, SpeakerRoleType)> {
    let mut classifier = RoleClassifier::default();
    let mut seen = HashSet::new();
    let mut roles = Vec::new();

    for turn in turns {
        if seen.insert(turn.speaker()) {
            let role = classifier.classify(turn.speaker());
            tracing::info!(speaker = %turn.speaker(), role = %role, "Role detection");
            roles.push((turn.speaker().to_string(), role));
        }
    }

    roles
}

/// 音色分配器
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceAssigner;

impl VoiceAssigner {
    /// 分配音色
    ///
    /// 优先使用未被占用的角色首选音色；已被占用时照样复用，不报错。
    /// 旁白角色始终使用档位的旁白音色。
    pub fn assign(
        &self,
        classifications: &[(String, SpeakerRoleType)],
        tier: EngineTier,
    ) -> VoiceAssignment {
        let catalog = tier.catalog();
        let mut used: HashSet<&'static str> = HashSet::new();
        let mut entries: Vec<SpeakerVoice> = Vec::with_capacity(classifications.len());

        for (speaker, role) in classifications {
            if entries.iter().any(|e| &e.speaker == speaker) {
                continue;
            }

            let voice = match role {
                SpeakerRoleType::Narrator => catalog.narrator(),
                other => catalog.voice_for(*other),
            };
            let reused = !used.insert(voice);

            tracing::info!(
                speaker = %speaker,
                role = %role,
                voice = voice,
                reused,
                engine = %tier,
                "Voice assignment"
            );

            entries.push(SpeakerVoice {
                speaker: speaker.clone(),
                role: *role,
                voice_id: voice.to_string(),
                reused,
            });
        }

        VoiceAssignment { tier, entries }
    }

    /// 分类 + 分配
    pub fn assign_turns(&self, turns: &[DialogueTurn], tier: EngineTier) -> VoiceAssignment {
        self.assign(&classify_speakers(turns), tier)
    }
}
