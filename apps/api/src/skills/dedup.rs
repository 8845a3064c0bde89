//! Deduplication Set: uniqueness by identity, first occurrence wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::skills::identity::{SkillIdentity, SkillLike};
use crate::skills::models::{CustomSkill, RecommendedSkill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Recommended,
    Custom,
}

/// Reported when a user-authored skill collides with an existing one.
/// Carries the colliding record's own spelling so the message reads naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConflict {
    pub name: String,
    pub category: String,
    pub pool: PoolKind,
}

impl IdentityConflict {
    pub fn message(&self) -> String {
        let pool = match self.pool {
            PoolKind::Recommended => "recommended skills",
            PoolKind::Custom => "your custom skills",
        };
        let category = if self.category.trim().is_empty() {
            "uncategorized"
        } else {
            self.category.as_str()
        };
        format!(
            "'{}' ({}) already exists in {}",
            self.name, category, pool
        )
    }
}

/// Hash set of identities drawn from one or more pools.
#[derive(Debug, Default, Clone)]
pub struct IdentitySet {
    seen: HashSet<SkillIdentity>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pool<T: SkillLike>(pool: &[T]) -> Self {
        let mut set = Self::new();
        set.extend_from(pool);
        set
    }

    pub fn extend_from<T: SkillLike>(&mut self, pool: &[T]) {
        self.seen.extend(pool.iter().map(SkillLike::identity));
    }

    pub fn contains<T: SkillLike + ?Sized>(&self, skill: &T) -> bool {
        self.seen.contains(&skill.identity())
    }

    /// Returns `true` if the identity was not present yet.
    pub fn insert<T: SkillLike + ?Sized>(&mut self, skill: &T) -> bool {
        self.seen.insert(skill.identity())
    }

}

/// A reference collection that can answer "is this identity already here?".
pub trait IdentityPool {
    fn holds(&self, id: &SkillIdentity) -> bool;
}

impl<T: SkillLike> IdentityPool for Vec<T> {
    fn holds(&self, id: &SkillIdentity) -> bool {
        self.iter().any(|existing| &existing.identity() == id)
    }
}

impl IdentityPool for IdentitySet {
    fn holds(&self, id: &SkillIdentity) -> bool {
        self.seen.contains(id)
    }
}

/// Keeps exactly one record per identity, preserving first-seen order. Idempotent.
pub fn dedupe<T: SkillLike>(items: Vec<T>) -> Vec<T> {
    let mut seen = IdentitySet::new();
    items.into_iter().filter(|item| seen.insert(item)).collect()
}

/// Keeps the records whose identity is absent from `existing` and unique among
/// themselves. Returns `(admitted, rejected_count)`.
pub fn filter_new<T: SkillLike>(candidates: Vec<T>, existing: &IdentitySet) -> (Vec<T>, usize) {
    let total = candidates.len();
    let mut seen = existing.clone();
    let admitted: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate))
        .collect();
    let rejected = total - admitted.len();
    (admitted, rejected)
}

/// Whether `candidate`'s identity already exists in any of `pools`.
pub fn contains_identity<C: SkillLike + ?Sized>(
    candidate: &C,
    pools: &[&dyn IdentityPool],
) -> bool {
    let id = candidate.identity();
    pools.iter().any(|pool| pool.holds(&id))
}

/// Finds the record a new user-authored skill would collide with, checking the
/// recommended pool first and then the custom pool.
pub fn find_conflict<C: SkillLike + ?Sized>(
    candidate: &C,
    recommended: &[RecommendedSkill],
    custom: &[CustomSkill],
) -> Option<IdentityConflict> {
    let id = candidate.identity();
    if let Some(existing) = recommended.iter().find(|r| r.identity() == id) {
        return Some(IdentityConflict {
            name: existing.name.clone(),
            category: existing.category.clone(),
            pool: PoolKind::Recommended,
        });
    }
    custom
        .iter()
        .find(|c| c.identity() == id)
        .map(|existing| IdentityConflict {
            name: existing.name.clone(),
            category: existing.category.clone(),
            pool: PoolKind::Custom,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::identity::identity;
    use crate::skills::models::ProficiencyLevel;
    use crate::skills::test_support::{custom, recommended};

    #[test]
    fn test_dedupe_keeps_first_occurrence_in_order() {
        let list = vec![
            recommended("Python", "编程语言"),
            recommended("SQL", "数据库"),
            recommended(" python ", "编程语言"),
            recommended("Excel", "办公软件"),
        ];
        let out = dedupe(list);
        let names: Vec<&str> = out.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let list = vec![
            recommended("Git", ""),
            recommended("git", "uncategorized"),
            recommended("Docker", "运维"),
            recommended("DOCKER", "运维"),
            recommended("Docker", "容器"),
        ];
        let once = dedupe(list);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_dedupe_ignores_non_identity_fields() {
        let mut a = recommended("Tableau", "数据可视化");
        a.level = ProficiencyLevel::Expert;
        let mut b = recommended("Tableau", "数据可视化");
        b.reason = "different rationale".to_string();
        assert_eq!(dedupe(vec![a.clone(), b]), vec![a]);
    }

    #[test]
    fn test_filter_new_rejects_existing_and_internal_duplicates() {
        let existing = IdentitySet::from_pool(&[recommended("Python", "编程语言")]);
        let (admitted, rejected) = filter_new(
            vec![
                recommended("Python", "编程语言"),
                recommended("SQL", "数据库"),
                recommended("sql", "数据库"),
            ],
            &existing,
        );
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].name, "SQL");
        assert_eq!(rejected, 2);
    }

    #[test]
    fn test_contains_identity_across_record_types() {
        let pool = vec![custom("Excel", "办公软件")];
        assert!(contains_identity(&recommended("excel", " 办公软件 "), &[&pool]));
        assert!(!contains_identity(&identity("Excel", "数据分析"), &[&pool]));
    }

    #[test]
    fn test_contains_identity_checks_every_pool() {
        let rec = vec![recommended("SQL", "数据库")];
        let cus = vec![custom("Figma", "设计")];
        let pools: [&dyn IdentityPool; 2] = [&rec, &cus];
        assert!(contains_identity(&identity("figma", "设计"), &pools));
        assert!(contains_identity(&identity(" sql", "数据库"), &pools));
        assert!(!contains_identity(&identity("Sketch", "设计"), &pools));
        assert!(!contains_identity(&identity("SQL", "数据库"), &[]));
    }

    #[test]
    fn test_find_conflict_prefers_recommended_pool() {
        let rec = vec![recommended("Excel", "办公软件")];
        let cus = vec![custom("Excel", "办公软件")];
        let conflict = find_conflict(&identity("EXCEL", "办公软件"), &rec, &cus).unwrap();
        assert_eq!(conflict.pool, PoolKind::Recommended);
        assert!(conflict.message().contains("'Excel' (办公软件)"));
    }

    #[test]
    fn test_find_conflict_in_custom_pool() {
        let cus = vec![custom("Figma", "")];
        let conflict = find_conflict(&identity("figma", ""), &[], &cus).unwrap();
        assert_eq!(conflict.pool, PoolKind::Custom);
        assert!(conflict.message().contains("uncategorized"));
        assert!(find_conflict(&identity("Sketch", ""), &[], &cus).is_none());
    }

    #[test]
    fn test_identity_set_insert_reports_new_identities() {
        let mut set = IdentitySet::new();
        assert!(set.insert(&identity("A", "x")));
        assert!(!set.insert(&identity(" a ", "X")));
        assert!(set.holds(&identity("a", "x")));
        assert!(contains_identity(&identity("A", "X"), &[&set]));
    }
}
