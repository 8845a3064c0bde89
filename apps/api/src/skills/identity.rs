//! Identity Normalizer: the canonical key that decides whether two skill
//! records are "the same skill".
//!
//! Identity is `(name, category)` after trimming and case-folding. Level,
//! description, rationale and every other field are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bucket used when a record carries no category. The generation service
/// occasionally omits it, so this is a normal case, not an error.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Normalized `(name, category)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillIdentity {
    pub name: String,
    pub category: String,
}

impl fmt::Display for SkillIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.category)
    }
}

/// Derives the identity of a skill. Pure and total.
pub fn identity(name: &str, category: &str) -> SkillIdentity {
    let category = normalize(category);
    SkillIdentity {
        name: normalize(name),
        category: if category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            category
        },
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Anything with a name and a category can be deduplicated, merged and
/// projected into the final selection.
pub trait SkillLike {
    fn name(&self) -> &str;
    fn category(&self) -> &str;

    fn identity(&self) -> SkillIdentity {
        identity(self.name(), self.category())
    }
}

impl SkillLike for SkillIdentity {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_trims_and_case_folds() {
        assert_eq!(identity("  Python ", "Programming"), identity("python", " programming  "));
    }

    #[test]
    fn test_identity_ignores_case_for_non_ascii_categories() {
        assert_eq!(identity("Excel", "办公软件"), identity("EXCEL", " 办公软件"));
    }

    #[test]
    fn test_empty_category_falls_into_uncategorized_bucket() {
        let id = identity("Git", "   ");
        assert_eq!(id.category, UNCATEGORIZED);
        assert_eq!(id, identity("git", ""));
        assert_eq!(id, identity("git", "Uncategorized"));
    }

    #[test]
    fn test_same_name_different_category_is_a_different_skill() {
        assert_ne!(identity("Python", "编程语言"), identity("Python", "数据分析"));
    }

    #[test]
    fn test_identity_is_total_on_empty_input() {
        let id = identity("", "");
        assert_eq!(id.name, "");
        assert_eq!(id.category, UNCATEGORIZED);
    }

    #[test]
    fn test_identity_of_identity_is_stable() {
        let id = identity(" SQL ", "Database");
        assert_eq!(SkillLike::identity(&id), id);
    }
}
