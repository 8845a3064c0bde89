//! Skill generation: the external content-generation service seen through a trait.
//!
//! `LlmSkillGenerator` is the production backend (Claude via `llm_client`).
//! The pool manager only knows `dyn SkillGenerator`, so tests script it.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::{with_suffix, JSON_ONLY_SUFFIX};
use crate::llm_client::{extract_json_payload, LlmClient, LlmError};
use crate::skills::models::{Priority, ProficiencyLevel, RecommendedSkill};
use crate::skills::prompts::{
    DESCRIBE_PROMPT_TEMPLATE, DESCRIBE_SYSTEM, RECOMMEND_PROMPT_TEMPLATE, RECOMMEND_SYSTEM,
};

/// Why a generation call produced nothing usable. Every variant sends the
/// pool manager down the fallback path.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Transport(String),

    #[error("malformed generation response: {0}")]
    Parse(String),

    #[error("generation service returned no usable skills")]
    Empty,
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => GenerationError::Empty,
            other => GenerationError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Rendered profile context.
    pub profile: String,
    /// Rendered list of skills the service should not repeat. Advisory only.
    pub avoid: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeRequest {
    pub name: String,
    pub category: String,
    pub level: ProficiencyLevel,
    pub profile: String,
}

#[async_trait]
pub trait SkillGenerator: Send + Sync {
    async fn recommend(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RecommendedSkill>, GenerationError>;

    async fn describe(&self, request: &DescribeRequest) -> Result<String, GenerationError>;
}

pub struct LlmSkillGenerator {
    llm: LlmClient,
}

impl LlmSkillGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillGenerator for LlmSkillGenerator {
    async fn recommend(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RecommendedSkill>, GenerationError> {
        let prompt = RECOMMEND_PROMPT_TEMPLATE
            .replace("{count}", &request.count.to_string())
            .replace("{profile}", &request.profile)
            .replace("{avoid}", &request.avoid);
        let system = with_suffix(RECOMMEND_SYSTEM, JSON_ONLY_SUFFIX);

        let text = self.llm.complete_text(&prompt, &system).await?;
        let skills = parse_candidates(&text)?;
        debug!("Parsed {} recommended skills", skills.len());
        Ok(skills)
    }

    async fn describe(&self, request: &DescribeRequest) -> Result<String, GenerationError> {
        let prompt = DESCRIBE_PROMPT_TEMPLATE
            .replace("{name}", &request.name)
            .replace("{category}", &request.category)
            .replace("{level}", request.level.as_str())
            .replace("{profile}", &request.profile);

        let text = self.llm.complete_text(&prompt, DESCRIBE_SYSTEM).await?;
        clean_description(&text).ok_or(GenerationError::Empty)
    }
}

/// Shape of one generated entry before normalization. Everything is optional
/// so that one sloppy field does not sink the whole batch.
#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    level: Option<String>,
    #[serde(default, alias = "rationale", deserialize_with = "lenient_text")]
    reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    selected: Option<bool>,
    #[serde(default, deserialize_with = "lenient_text")]
    salary_impact: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    learning_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    trend: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
}

/// Accepts strings, numbers and booleans as text; null and blanks become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Ok(None),
    };
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

impl RawCandidate {
    fn into_skill(self) -> Option<RecommendedSkill> {
        let name = self.name?;
        let priority = self
            .priority
            .as_deref()
            .map(Priority::parse_loose)
            .unwrap_or_default();
        Some(RecommendedSkill {
            name,
            category: self.category.unwrap_or_default(),
            level: self
                .level
                .as_deref()
                .map(ProficiencyLevel::parse_loose)
                .unwrap_or_default(),
            reason: self.reason.unwrap_or_default(),
            selected: self.selected.unwrap_or(priority == Priority::High),
            priority,
            salary_impact: self.salary_impact,
            learning_time: self.learning_time,
            trend: self.trend,
            description: self.description,
        })
    }
}

/// Parses a generation response. The payload must be a JSON array; entries
/// that are not objects or lack a name are dropped.
pub fn parse_candidates(text: &str) -> Result<Vec<RecommendedSkill>, GenerationError> {
    let payload = extract_json_payload(text);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| GenerationError::Parse(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(GenerationError::Parse(
            "expected a JSON array of skills".to_string(),
        ));
    };

    let total = items.len();
    let skills: Vec<RecommendedSkill> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawCandidate>(item).ok())
        .filter_map(RawCandidate::into_skill)
        .collect();

    if skills.len() < total {
        warn!(
            "Dropped {} malformed entries from generation response",
            total - skills.len()
        );
    }
    if skills.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(skills)
}

fn clean_description(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
