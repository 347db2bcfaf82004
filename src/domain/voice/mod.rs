//! Voice Context - 角色识别与音色分配
//!
//! RoleClassifier → VoiceAssigner，均为单次调用作用域

mod assigner;
mod engine;
mod errors;
mod role;

pub use assigner::{classify_speakers, SpeakerVoice, VoiceAssigner, VoiceAssignment};
pub use engine::{EngineTier, VoiceCatalog};
pub use errors::VoiceError;
pub use role::{RoleClassifier, RoleRule, SpeakerRoleType, DEFAULT_ROLE_RULES};
