//! Exercise Context - 听力练习
//!
//! 上游内容生成器产出的练习记录，以及最终音频的内容哈希

mod record;

pub use record::{ExerciseRecord, OPTION_LETTERS};
