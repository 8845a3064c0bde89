//! Best-effort skill kind classification from free-text category names.
//!
//! Categories are free text, so this is substring matching in a fixed order:
//! technical, office, language, soft. "编程语言" is technical, not language.

use serde::{Deserialize, Serialize};

use crate::skills::models::{ProficiencyLevel, SelectedSkill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Technical,
    Office,
    Language,
    Soft,
    Other,
}

const TECHNICAL_MARKERS: &[&str] = &[
    "编程",
    "开发",
    "数据库",
    "技术",
    "框架",
    "算法",
    "运维",
    "云",
    "数据分析",
    "programming",
    "development",
    "database",
    "framework",
    "engineering",
    "technical",
    "cloud",
    "devops",
    "data",
];

const OFFICE_MARKERS: &[&str] = &["办公", "文档", "表格", "office", "productivity"];

const LANGUAGE_MARKERS: &[&str] = &["外语", "语言", "language"];

const SOFT_MARKERS: &[&str] = &[
    "沟通",
    "管理",
    "团队",
    "领导",
    "软技能",
    "communication",
    "management",
    "leadership",
    "teamwork",
    "soft",
];

pub fn classify_category(category: &str) -> SkillKind {
    let category = category.trim().to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| category.contains(m));

    if has_any(TECHNICAL_MARKERS) {
        SkillKind::Technical
    } else if has_any(OFFICE_MARKERS) {
        SkillKind::Office
    } else if has_any(LANGUAGE_MARKERS) {
        SkillKind::Language
    } else if has_any(SOFT_MARKERS) {
        SkillKind::Soft
    } else {
        SkillKind::Other
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub total: usize,
    pub technical: usize,
    pub office: usize,
    pub language: usize,
    pub soft: usize,
    pub other: usize,
    pub expert: usize,
    pub proficient: usize,
    pub familiar: usize,
}

/// Counts of a selection per kind and per level, for the step's summary panel.
pub fn summarize(selection: &[SelectedSkill]) -> SkillSummary {
    let mut summary = SkillSummary {
        total: selection.len(),
        ..SkillSummary::default()
    };
    for skill in selection {
        match classify_category(&skill.category) {
            SkillKind::Technical => summary.technical += 1,
            SkillKind::Office => summary.office += 1,
            SkillKind::Language => summary.language += 1,
            SkillKind::Soft => summary.soft += 1,
            SkillKind::Other => summary.other += 1,
        }
        match skill.level {
            ProficiencyLevel::Expert => summary.expert += 1,
            ProficiencyLevel::Proficient => summary.proficient += 1,
            ProficiencyLevel::Familiar => summary.familiar += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::models::SkillOrigin;

    fn pick(name: &str, category: &str, level: ProficiencyLevel) -> SelectedSkill {
        SelectedSkill {
            name: name.to_string(),
            level,
            category: category.to_string(),
            description: None,
            origin: SkillOrigin::Recommended,
        }
    }

    #[test]
    fn test_programming_language_is_technical() {
        assert_eq!(classify_category("编程语言"), SkillKind::Technical);
        assert_eq!(classify_category("Programming Language"), SkillKind::Technical);
    }

    #[test]
    fn test_office_and_language_categories() {
        assert_eq!(classify_category("办公软件"), SkillKind::Office);
        assert_eq!(classify_category("外语能力"), SkillKind::Language);
        assert_eq!(classify_category("Foreign Language"), SkillKind::Language);
    }

    #[test]
    fn test_soft_and_unknown_categories() {
        assert_eq!(classify_category("团队协作"), SkillKind::Soft);
        assert_eq!(classify_category("Leadership"), SkillKind::Soft);
        assert_eq!(classify_category("摄影"), SkillKind::Other);
        assert_eq!(classify_category(""), SkillKind::Other);
    }

    #[test]
    fn test_summarize_counts_kinds_and_levels() {
        let selection = vec![
            pick("Python", "编程语言", ProficiencyLevel::Expert),
            pick("SQL", "数据库", ProficiencyLevel::Proficient),
            pick("Excel", "办公软件", ProficiencyLevel::Expert),
            pick("英语", "外语", ProficiencyLevel::Familiar),
            pick("摄影", "爱好", ProficiencyLevel::Proficient),
        ];
        let summary = summarize(&selection);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.technical, 2);
        assert_eq!(summary.office, 1);
        assert_eq!(summary.language, 1);
        assert_eq!(summary.other, 1);
        assert_eq!(summary.expert, 2);
        assert_eq!(summary.familiar, 1);
    }

    #[test]
    fn test_summarize_empty_selection() {
        assert_eq!(summarize(&[]), SkillSummary::default());
    }
}
