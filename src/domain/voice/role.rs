//! Speaker Role - 说话人角色分类
//!
//! 优先级固定：精确匹配 > 包含匹配 > 词尾形态 > 奇偶交替兜底

use serde::{Deserialize, Serialize};

/// 说话人角色（性别 × 顾客/店员/旁白）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRoleType {
    MaleCustomer,
    MaleStaff,
    FemaleCustomer,
    FemaleStaff,
    Narrator,
}

impl SpeakerRoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaleCustomer => "male_customer",
            Self::MaleStaff => "male_staff",
            Self::FemaleCustomer => "female_customer",
            Self::FemaleStaff => "female_staff",
            Self::Narrator => "narrator",
        }
    }
}

impl std::fmt::Display for SpeakerRoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 角色规则：小写关键词 → 角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRule {
    pub keyword: &'static str,
    pub role: SpeakerRoleType,
}

const fn rule(keyword: &'static str, role: SpeakerRoleType) -> RoleRule {
    RoleRule { keyword, role }
}

/// 默认角色表
pub const DEFAULT_ROLE_RULES: &[RoleRule] = &[
    // 店员
    rule("camarero", SpeakerRoleType::MaleStaff),
    rule("camarera", SpeakerRoleType::FemaleStaff),
    rule("vendedor", SpeakerRoleType::MaleStaff),
    rule("vendedora", SpeakerRoleType::FemaleStaff),
    rule("empleado", SpeakerRoleType::MaleStaff),
    rule("empleada", SpeakerRoleType::FemaleStaff),
    rule("cajero", SpeakerRoleType::MaleStaff),
    rule("cajera", SpeakerRoleType::FemaleStaff),
    // 顾客
    rule("hombre", SpeakerRoleType::MaleCustomer),
    rule("mujer", SpeakerRoleType::FemaleCustomer),
    rule("señor", SpeakerRoleType::MaleCustomer),
    rule("señora", SpeakerRoleType::FemaleCustomer),
    rule("chico", SpeakerRoleType::MaleCustomer),
    rule("chica", SpeakerRoleType::FemaleCustomer),
    rule("turista", SpeakerRoleType::MaleCustomer),
    rule("taxista", SpeakerRoleType::MaleStaff),
    // 旁白
    rule("narrador", SpeakerRoleType::Narrator),
    rule("narradora", SpeakerRoleType::Narrator),
    rule("announcer", SpeakerRoleType::Narrator),
];

/// 角色分类器
///
/// 单次生成调用内使用；`classified` 只影响最后的奇偶兜底
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    rules: &'static [RoleRule],
    classified: usize,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_RULES)
    }
}

impl RoleClassifier {
    pub fn new(rules: &'static [RoleRule]) -> Self {
        Self {
            rules,
            classified: 0,
        }
    }

    pub fn classify(&mut self, speaker: &str) -> SpeakerRoleType {
        let role = self.resolve(speaker);
        self.classified += 1;
        role
    }

    fn resolve(&self, speaker: &str) -> SpeakerRoleType {
        let label = speaker.trim().to_lowercase();

        if let Some(rule) = self.rules.iter().find(|r| r.keyword == label) {
            return rule.role;
        }

        // 子串命中时取最长的关键词，而不是规则表里的第一条：
        // "Señora García" 归为 female_customer，不会被排在前面的 "señor" 抢先
        if let Some(rule) = self
            .rules
            .iter()
            .filter(|r| label.contains(r.keyword))
            .max_by_key(|r| r.keyword.len())
        {
            return rule.role;
        }

        if let Some(role) = morphological_role(&label) {
            return role;
        }

        if self.classified % 2 == 0 {
            SpeakerRoleType::MaleCustomer
        } else {
            SpeakerRoleType::FemaleCustomer
        }
    }
}

/// 按西语词尾推断性别
fn morphological_role(label: &str) -> Option<SpeakerRoleType> {
    if label.ends_with('a') {
        if label.contains("turista") {
            return Some(SpeakerRoleType::FemaleCustomer);
        }
        if label.contains("taxista") {
            return Some(SpeakerRoleType::FemaleStaff);
        }
        return Some(SpeakerRoleType::FemaleCustomer);
    }
    if label.ends_with('o') || label.ends_with("or") || label.ends_with("er") {
        return Some(SpeakerRoleType::MaleCustomer);
    }
    None
}
