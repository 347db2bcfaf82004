//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("No voice assigned for speaker: {0}")]
    Unassigned(String),
}
