//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Exercise Context: 听力练习记录与内容哈希
//! - Dialogue Context: 对话解析
//! - Voice Context: 角色识别与音色分配

pub mod dialogue;
pub mod exercise;
pub mod voice;

pub use dialogue::{DialogueParser, DialogueTurn, ParseError, ParserConfig};
pub use exercise::ExerciseRecord;
pub use voice::{EngineTier, SpeakerRoleType, VoiceAssigner, VoiceAssignment};
