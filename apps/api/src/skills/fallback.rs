//! Built-in candidates used when the generation service fails.
//! Callers still run these through the same duplicate filtering as generated output.

use crate::skills::models::{Priority, ProficiencyLevel, RecommendedSkill};

/// (name, category, level, priority, reason)
const FALLBACK_SKILLS: &[(&str, &str, ProficiencyLevel, Priority, &str)] = &[
    (
        "Excel",
        "办公软件",
        ProficiencyLevel::Proficient,
        Priority::High,
        "Spreadsheet work is expected in almost every office role",
    ),
    (
        "PowerPoint",
        "办公软件",
        ProficiencyLevel::Proficient,
        Priority::Medium,
        "Presenting results clearly is a common interview topic",
    ),
    (
        "Python",
        "编程语言",
        ProficiencyLevel::Familiar,
        Priority::Medium,
        "Basic scripting speeds up repetitive data tasks",
    ),
    (
        "SQL",
        "数据库",
        ProficiencyLevel::Familiar,
        Priority::Medium,
        "Querying data directly is valued across business functions",
    ),
    (
        "项目管理",
        "管理能力",
        ProficiencyLevel::Proficient,
        Priority::High,
        "Shows you can plan work and deliver on schedule",
    ),
    (
        "沟通协调",
        "软技能",
        ProficiencyLevel::Proficient,
        Priority::High,
        "Cross-team coordination appears in most job descriptions",
    ),
    (
        "英语",
        "外语",
        ProficiencyLevel::Proficient,
        Priority::Low,
        "Reading English documentation widens the roles you qualify for",
    ),
];

/// The fixed fallback list. High-priority entries start selected.
pub fn fallback_skills() -> Vec<RecommendedSkill> {
    FALLBACK_SKILLS
        .iter()
        .map(|&(name, category, level, priority, reason)| RecommendedSkill {
            name: name.to_string(),
            category: category.to_string(),
            level,
            reason: reason.to_string(),
            priority,
            selected: priority == Priority::High,
            salary_impact: None,
            learning_time: None,
            trend: None,
            description: None,
        })
        .collect()
}
