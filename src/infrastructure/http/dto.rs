//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::{EngineTier, ExerciseRecord};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Exercise DTOs
// ============================================================================

/// 生成请求：练习记录字段平铺，外加可选的引擎档位
#[derive(Debug, Deserialize)]
pub struct GenerateExerciseAudioRequest {
    #[serde(flatten)]
    pub record: ExerciseRecord,
    #[serde(default)]
    pub engine: Option<EngineTier>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseAudioResponse {
    pub path: String,
    pub url: String,
    pub engine: EngineTier,
    pub segment_count: usize,
    pub failed_segments: usize,
    pub dropped_segments: usize,
    pub cached: bool,
}
