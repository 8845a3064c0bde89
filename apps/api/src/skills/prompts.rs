// All LLM prompt constants for the skill recommendation step.
// Reuses the JSON-only fragment from llm_client::prompts.

/// System prompt for skill recommendation.
pub const RECOMMEND_SYSTEM: &str = "You are an experienced career coach and resume reviewer. \
    You recommend concrete, resume-worthy skills for a candidate's target position. \
    You MUST respond with a JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Recommendation prompt. Replace `{profile}`, `{avoid}` and `{count}` before sending.
pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"Recommend {count} skills this candidate should list on their resume.

CANDIDATE PROFILE:
{profile}
SKILLS ALREADY SHOWN OR ADDED (do NOT suggest any of these again):
{avoid}

Return a JSON array with exactly this shape:
[
  {
    "name": "SQL",
    "category": "数据库",
    "level": "proficient",
    "reason": "Why this skill matters for the target position",
    "priority": "high",
    "selected": true,
    "salary_impact": "+10% typical offer",
    "learning_time": "2-3 months",
    "trend": "rising",
    "description": "One sentence describing what the candidate can do with it"
  }
]

Rules:
- "level" is one of: "familiar", "proficient", "expert".
- "priority" is one of: "high", "medium", "low".
- Set "selected" to true only for high-priority skills.
- Use short category names and reuse the same category for related skills.
- Each skill must appear once. Do not return any skill from the list above."#;

/// System prompt for the single-skill description rewrite.
pub const DESCRIBE_SYSTEM: &str = "You write one-sentence resume skill descriptions. \
    Respond with the sentence only: no quotes, no labels, no markdown.";

/// Description prompt. Replace `{name}`, `{category}`, `{level}` and `{profile}`.
pub const DESCRIBE_PROMPT_TEMPLATE: &str = r#"Write one sentence (at most 40 words) describing the candidate's ability in this skill, suitable for a resume skills section.

Skill: {name}
Category: {category}
Proficiency: {level}

CANDIDATE PROFILE:
{profile}"#;

/// Rendered into `{avoid}` when nothing has been shown yet.
pub const NOTHING_TO_AVOID: &str = "(none)";
