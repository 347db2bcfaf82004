//! Engine Tier - TTS 引擎档位与音色目录

use serde::{Deserialize, Serialize};

use super::role::SpeakerRoleType;

/// TTS 引擎档位
///
/// 每个档位拥有自己的音色目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineTier {
    #[default]
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "neural")]
    Neural,
    #[serde(rename = "long-form")]
    LongForm,
}

impl EngineTier {
    pub const ALL: [EngineTier; 3] = [Self::Standard, Self::Neural, Self::LongForm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::LongForm => "long-form",
        }
    }

    /// 该档位的音色目录
    pub fn catalog(&self) -> &'static VoiceCatalog {
        match self {
            Self::Standard => &STANDARD_CATALOG,
            Self::Neural => &NEURAL_CATALOG,
            Self::LongForm => &LONG_FORM_CATALOG,
        }
    }
}

impl std::fmt::Display for EngineTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 音色目录：每个角色对应一个首选音色
///
/// 目录刻意保持很小，不是开放的音色池
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    pub male_customer: &'static str,
    pub male_staff: &'static str,
    pub female_customer: &'static str,
    pub female_staff: &'static str,
    pub narrator: &'static str,
}

impl VoiceCatalog {
    /// 角色的首选音色
    pub fn voice_for(&self, role: SpeakerRoleType) -> &'static str {
        match role {
            SpeakerRoleType::MaleCustomer => self.male_customer,
            SpeakerRoleType::MaleStaff => self.male_staff,
            SpeakerRoleType::FemaleCustomer => self.female_customer,
            SpeakerRoleType::FemaleStaff => self.female_staff,
            SpeakerRoleType::Narrator => self.narrator,
        }
    }

    pub fn narrator(&self) -> &'static str {
        self.narrator
    }
}

static STANDARD_CATALOG: VoiceCatalog = VoiceCatalog {
    male_customer: "Enrique",
    male_staff: "Lucia",
    female_customer: "Conchita",
    female_staff: "Lucia",
    narrator: "Conchita",
};

static NEURAL_CATALOG: VoiceCatalog = VoiceCatalog {
    male_customer: "Sergio",
    male_staff: "Sergio",
    female_customer: "Lucia",
    female_staff: "Lucia",
    narrator: "Lucia",
};

static LONG_FORM_CATALOG: VoiceCatalog = VoiceCatalog {
    male_customer: "Raul",
    male_staff: "Raul",
    female_customer: "Alba",
    female_staff: "Alba",
    narrator: "Alba",
};
