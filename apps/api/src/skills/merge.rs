//! Merge Strategies: pure functions over pools.
//!
//! - `replace`: start over with the fresh candidates.
//! - `supplement`: append candidates that are new to both pools.
//! - `select`: project the final selection (custom skills win on conflict).

use crate::skills::dedup::{dedupe, filter_new, IdentitySet};
use crate::skills::models::{CustomSkill, RecommendedSkill, SelectedSkill};

/// New recommended pool and history after a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub recommended: Vec<RecommendedSkill>,
    pub history: Vec<RecommendedSkill>,
    /// Candidates that made it into the pool.
    pub admitted: usize,
    /// Candidates dropped as duplicates.
    pub rejected: usize,
}

/// Discards the previous pool and history. The result is exactly `dedupe(candidates)`.
pub fn replace(candidates: Vec<RecommendedSkill>) -> Merged {
    let total = candidates.len();
    let recommended = dedupe(candidates);
    Merged {
        admitted: recommended.len(),
        rejected: total - recommended.len(),
        history: recommended.clone(),
        recommended,
    }
}

/// Appends the candidates whose identity is in neither the recommended pool
/// nor the custom pool. The pool never shrinks; history grows by the same set.
pub fn supplement(
    recommended: &[RecommendedSkill],
    history: &[RecommendedSkill],
    custom: &[CustomSkill],
    candidates: Vec<RecommendedSkill>,
) -> Merged {
    let mut existing = IdentitySet::from_pool(recommended);
    existing.extend_from(custom);
    let (fresh, rejected) = filter_new(candidates, &existing);

    let mut next_pool = recommended.to_vec();
    next_pool.extend(fresh.iter().cloned());

    Merged {
        history: extend_history(history, &fresh),
        admitted: fresh.len(),
        rejected,
        recommended: next_pool,
    }
}

/// Appends to `history` the records whose identity it does not hold yet.
pub fn extend_history(
    history: &[RecommendedSkill],
    additions: &[RecommendedSkill],
) -> Vec<RecommendedSkill> {
    let known = IdentitySet::from_pool(history);
    let (new_entries, _) = filter_new(additions.to_vec(), &known);
    let mut next = history.to_vec();
    next.extend(new_entries);
    next
}

/// Final Selection: selected recommended skills plus every custom skill,
/// one entry per identity. A custom skill shadows a recommended one with the
/// same identity.
pub fn select(recommended: &[RecommendedSkill], custom: &[CustomSkill]) -> Vec<SelectedSkill> {
    let custom = dedupe(custom.to_vec());
    let authored = IdentitySet::from_pool(&custom);

    let picked = recommended
        .iter()
        .filter(|r| r.selected && !authored.contains(*r))
        .map(SelectedSkill::from);
    let owned = custom.iter().map(SelectedSkill::from);

    dedupe(picked.chain(owned).collect())
}
