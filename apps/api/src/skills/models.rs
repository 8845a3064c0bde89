use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::skills::identity::SkillLike;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    Familiar,
    #[default]
    Proficient,
    Expert,
}

impl ProficiencyLevel {
    /// Lenient mapping used for generated output. Unknown labels land on `Proficient`.
    pub fn parse_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "familiar" | "basic" | "beginner" | "了解" | "熟悉" => ProficiencyLevel::Familiar,
            "expert" | "advanced" | "精通" => ProficiencyLevel::Expert,
            _ => ProficiencyLevel::Proficient,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Familiar => "familiar",
            ProficiencyLevel::Proficient => "proficient",
            ProficiencyLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" | "高" => Priority::High,
            "low" | "低" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

/// A skill produced by the generation service (or the built-in fallback list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSkill {
    pub name: String,
    pub category: String,
    pub level: ProficiencyLevel,
    pub reason: String,
    pub priority: Priority,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SkillLike for RecommendedSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// A skill authored directly by the user. Survives recommendation resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSkill {
    pub id: Uuid,
    pub name: String,
    pub level: ProficiencyLevel,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl SkillLike for CustomSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// Request body for adding a custom skill. Previously saved custom skills may
/// carry their id; new ones get one assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomSkill {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub level: ProficiencyLevel,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl NewCustomSkill {
    pub fn into_custom(self) -> CustomSkill {
        CustomSkill {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name.trim().to_string(),
            level: self.level,
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

impl SkillLike for NewCustomSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// In-place edit of a recommended candidate. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<ProficiencyLevel>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillOrigin {
    Recommended,
    Custom,
}

/// One entry of the final selection handed to downstream rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSkill {
    pub name: String,
    pub level: ProficiencyLevel,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub origin: SkillOrigin,
}

impl SkillLike for SelectedSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

impl From<&RecommendedSkill> for SelectedSkill {
    fn from(skill: &RecommendedSkill) -> Self {
        SelectedSkill {
            name: skill.name.clone(),
            level: skill.level,
            category: skill.category.clone(),
            description: skill.description.clone(),
            origin: SkillOrigin::Recommended,
        }
    }
}

impl From<&CustomSkill> for SelectedSkill {
    fn from(skill: &CustomSkill) -> Self {
        SelectedSkill {
            name: skill.name.clone(),
            level: skill.level,
            category: skill.category.clone(),
            description: (!skill.description.is_empty()).then(|| skill.description.clone()),
            origin: SkillOrigin::Custom,
        }
    }
}

/// What the earlier wizard steps know about the user. Rendered into the
/// generation prompt as free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileContext {
    #[serde(default)]
    pub target_position: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl ProfileContext {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let position = self.target_position.trim();
        out.push_str(&format!(
            "Target position: {}\n",
            if position.is_empty() { "not specified" } else { position }
        ));
        if let Some(industry) = self.industry.as_deref().filter(|s| !s.trim().is_empty()) {
            out.push_str(&format!("Industry: {}\n", industry.trim()));
        }
        if let Some(years) = self.years_of_experience {
            out.push_str(&format!("Years of experience: {years}\n"));
        }
        if let Some(education) = self.education.as_deref().filter(|s| !s.trim().is_empty()) {
            out.push_str(&format!("Education: {}\n", education.trim()));
        }
        let highlights: Vec<&str> = self
            .highlights
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();
        if !highlights.is_empty() {
            out.push_str("Background:\n");
            for h in highlights {
                out.push_str(&format!("- {h}\n"));
            }
        }
        out
    }
}
